use model::interaction::InteractionType;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("error while decoding interaction payload: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("application command interaction had no command name")]
    MissingCommandName,

    #[error("application command interaction had no invoking user")]
    MissingUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Ping,
    ApplicationCommand,
    /// Any other type code, kept for logging
    Unknown(u64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandOption {
    pub name: String,
    pub value: Option<Value>,
}

/// A single inbound interaction, reduced to what the command handlers read.
///
/// Ids are opaque and copied through exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub kind: InteractionKind,
    pub command_name: Option<String>,
    pub invoking_user_id: Option<String>,
    pub guild_id: Option<String>,
    pub channel_id: Option<String>,
    pub options: Vec<CommandOption>,
    pub id: Option<String>,
    pub application_id: Option<String>,
    pub token: Option<String>,
}

impl Interaction {
    pub fn ping() -> Interaction {
        Interaction::new(InteractionKind::Ping)
    }

    pub fn command(name: impl Into<String>, invoking_user_id: impl Into<String>) -> Interaction {
        Interaction {
            command_name: Some(name.into()),
            invoking_user_id: Some(invoking_user_id.into()),
            ..Interaction::new(InteractionKind::ApplicationCommand)
        }
    }

    fn new(kind: InteractionKind) -> Interaction {
        Interaction {
            kind,
            command_name: None,
            invoking_user_id: None,
            guild_id: None,
            channel_id: None,
            options: Vec::new(),
            id: None,
            application_id: None,
            token: None,
        }
    }

    pub fn in_guild(mut self, guild_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        self.guild_id = Some(guild_id.into());
        self.channel_id = Some(channel_id.into());
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: Value) -> Self {
        self.options.push(CommandOption {
            name: name.into(),
            value: Some(value),
        });
        self
    }

    /// No guild id means the command was run in a direct message
    pub fn is_direct_message(&self) -> bool {
        self.guild_id.is_none()
    }

    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options
            .iter()
            .find(|option| option.name == name)
            .and_then(|option| option.value.as_ref())
    }

    /// User, channel and role options arrive as snowflake strings
    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.option(name).and_then(Value::as_str)
    }
}

#[derive(Deserialize, Debug)]
struct RawInteraction {
    #[serde(default, deserialize_with = "id_opt")]
    id: Option<String>,
    #[serde(default, deserialize_with = "id_opt")]
    application_id: Option<String>,
    #[serde(default)]
    token: Option<String>,
    r#type: u64,
    #[serde(default)]
    data: Option<RawCommandData>,
    #[serde(default, deserialize_with = "id_opt")]
    guild_id: Option<String>,
    #[serde(default, deserialize_with = "id_opt")]
    channel_id: Option<String>,
    #[serde(default)]
    member: Option<RawMember>,
    #[serde(default)]
    user: Option<RawUser>,
}

#[derive(Deserialize, Debug)]
struct RawCommandData {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    options: Vec<RawOption>,
}

#[derive(Deserialize, Debug)]
struct RawOption {
    name: String,
    #[serde(default)]
    value: Option<Value>,
}

#[derive(Deserialize, Debug)]
struct RawMember {
    #[serde(default)]
    user: Option<RawUser>,
}

#[derive(Deserialize, Debug)]
struct RawUser {
    #[serde(deserialize_with = "id")]
    id: String,
}

/// Decodes a raw webhook body. The bytes are never re-serialized, signature checks happen on
/// the original buffer before this is called.
pub fn parse(raw_body: &[u8]) -> Result<Interaction, ParseError> {
    let raw: RawInteraction = serde_json::from_slice(raw_body)?;
    from_raw(raw)
}

/// Same as [`parse`], for payloads already decoded, e.g. the `d` field of a gateway dispatch
pub fn parse_value(value: Value) -> Result<Interaction, ParseError> {
    let raw: RawInteraction = serde_json::from_value(value)?;
    from_raw(raw)
}

fn from_raw(raw: RawInteraction) -> Result<Interaction, ParseError> {
    let kind = match InteractionType::try_from(raw.r#type) {
        Ok(InteractionType::Ping) => InteractionKind::Ping,
        Ok(InteractionType::ApplicationCommand) => InteractionKind::ApplicationCommand,
        _ => InteractionKind::Unknown(raw.r#type),
    };

    let mut interaction = Interaction {
        guild_id: raw.guild_id,
        channel_id: raw.channel_id,
        id: raw.id,
        application_id: raw.application_id,
        token: raw.token,
        ..Interaction::new(kind)
    };

    if kind != InteractionKind::ApplicationCommand {
        return Ok(interaction);
    }

    let data = raw.data.ok_or(ParseError::MissingCommandName)?;
    let name = data.name.ok_or(ParseError::MissingCommandName)?;

    // guild invocations carry the user inside member, DMs at the top level
    let user = raw
        .member
        .and_then(|member| member.user)
        .or(raw.user)
        .ok_or(ParseError::MissingUser)?;

    interaction.command_name = Some(name);
    interaction.invoking_user_id = Some(user.id);
    interaction.options = data
        .options
        .into_iter()
        .map(|option| CommandOption {
            name: option.name,
            value: option.value,
        })
        .collect();

    Ok(interaction)
}

fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) if n.is_u64() => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or integer id, got {}",
            other
        ))),
    }
}

fn id_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) if n.is_u64() => Ok(Some(n.to_string())),
        other => Err(D::Error::custom(format!(
            "expected a string or integer id, got {}",
            other
        ))),
    }
}
