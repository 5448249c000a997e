use crate::http::response::{CommandResponse, HealthResponse, RootResponse};
use crate::{Error, Result, Verifier};
use common::commands::PING_ACK;
use common::CommandRegistry;
use model::channel::message::CreateMessage;
use model::Snowflake;
use serde::Deserialize;
use serde_json::{Map, Value};
use sharder::{RestClient, SessionStatus};
use std::sync::Arc;
use tracing::{debug, info};
use warp::http::HeaderMap;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Rejection, Reply};

/// Body of `POST /command`, a command run outside of Discord that posts into a channel
#[derive(Deserialize, Debug)]
pub struct CommandRequest {
    pub command: String,
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
    pub user_id: String,
    #[serde(default)]
    pub guild_id: Option<String>,
    pub channel_id: String,
}

pub async fn root() -> Result<Response, Rejection> {
    let response = RootResponse {
        message: "Discord interactions bridge",
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
    };

    Ok(warp::reply::json(&response).into_response())
}

pub async fn health(status: Arc<SessionStatus>) -> Result<Response, Rejection> {
    let response = HealthResponse {
        status: "healthy",
        bot_ready: status.is_ready(),
    };

    Ok(warp::reply::json(&response).into_response())
}

pub async fn bot_status(status: Arc<SessionStatus>) -> Result<Response, Rejection> {
    Ok(warp::reply::json(&status.snapshot()).into_response())
}

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

pub async fn interactions(
    verifier: Arc<Verifier>,
    registry: Arc<CommandRegistry>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, Rejection> {
    let signature = header_str(&headers, SIGNATURE_HEADER);
    let timestamp = header_str(&headers, TIMESTAMP_HEADER);

    verifier.check(&body[..], signature, timestamp)?;

    respond(&registry, &body[..])
}

/// A header that isn't visible ASCII can't carry a valid signature, so it counts as missing
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(feature = "test-endpoint")]
pub async fn test_interaction(
    registry: Arc<CommandRegistry>,
    body: Bytes,
) -> Result<Response, Rejection> {
    respond(&registry, &body[..])
}

fn respond(registry: &CommandRegistry, body: &[u8]) -> Result<Response, Rejection> {
    let interaction = common::parse(body).map_err(Error::from)?;

    debug!(
        kind = ?interaction.kind,
        command = ?interaction.command_name,
        guild = ?interaction.guild_id,
        "Handling interaction"
    );

    let response = registry.dispatch(&interaction);
    Ok(warp::reply::json(&common::format(&response)).into_response())
}

pub async fn command(
    rest: Option<Arc<RestClient>>,
    status: Arc<SessionStatus>,
    body: Bytes,
) -> Result<Response, Rejection> {
    let rest = rest.ok_or(Error::BotUnavailable)?;
    let request: CommandRequest = serde_json::from_slice(&body[..]).map_err(Error::from)?;

    let response = run_command(&rest, &status, &request).await?;
    Ok(warp::reply::json(&response).into_response())
}

/// A `/command` request that passed validation, nothing has been sent to Discord yet
#[derive(Debug, PartialEq, Eq)]
enum ApiCommand {
    Ping,
    Hello,
    ServerInfo { guild_id: Snowflake },
}

#[derive(Debug)]
struct ValidatedRequest {
    command: ApiCommand,
    channel_id: Snowflake,
    user_id: Snowflake,
}

fn validate(request: &CommandRequest) -> Result<ValidatedRequest> {
    let command = match request.command.as_str() {
        "ping" => ApiCommand::Ping,
        "hello" => ApiCommand::Hello,
        "serverinfo" => {
            let guild_id = request.guild_id.as_deref().ok_or(Error::MissingGuildId)?;
            ApiCommand::ServerInfo {
                guild_id: parse_id(guild_id)?,
            }
        }
        other => return Err(Error::UnknownCommand(other.to_owned())),
    };

    Ok(ValidatedRequest {
        command,
        channel_id: parse_id(&request.channel_id)?,
        user_id: parse_id(&request.user_id)?,
    })
}

async fn run_command(
    rest: &RestClient,
    status: &SessionStatus,
    request: &CommandRequest,
) -> Result<CommandResponse> {
    let validated = validate(request)?;
    let user = rest.get_user(validated.user_id).await?;

    let message = match validated.command {
        ApiCommand::Ping => match status.latency() {
            Some(latency) => CreateMessage::content(format!(
                "{} Latency: {}ms (sent through the API)",
                PING_ACK,
                latency.as_millis()
            )),
            None => CreateMessage::content(format!("{} (sent through the API)", PING_ACK)),
        },

        ApiCommand::Hello => CreateMessage::content(format!(
            "Hello, {}! (sent through the API)",
            user.mention()
        )),

        ApiCommand::ServerInfo { guild_id } => {
            CreateMessage::embed(sharder::fetch_server_embed(rest, guild_id).await?)
        }
    };

    rest.create_message(validated.channel_id, &message).await?;

    info!(
        command = %request.command,
        channel = %validated.channel_id,
        user = %user.id,
        parameters = request.parameters.as_ref().map_or(0, Map::len),
        "Executed command through the API"
    );

    Ok(CommandResponse {
        message: format!("Executed command '{}'", request.command),
    })
}

fn parse_id(raw: &str) -> Result<Snowflake> {
    raw.trim()
        .parse()
        .map_err(|_| Error::InvalidId(raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(command: &str, guild_id: Option<&str>) -> CommandRequest {
        CommandRequest {
            command: command.to_owned(),
            parameters: None,
            user_id: String::from("42"),
            guild_id: guild_id.map(str::to_owned),
            channel_id: String::from("7"),
        }
    }

    #[test]
    fn test_validate_known_commands() {
        let validated = validate(&request("hello", None)).unwrap();
        assert_eq!(validated.command, ApiCommand::Hello);
        assert_eq!(validated.channel_id, Snowflake(7));
        assert_eq!(validated.user_id, Snowflake(42));

        let validated = validate(&request("serverinfo", Some("99"))).unwrap();
        assert_eq!(
            validated.command,
            ApiCommand::ServerInfo {
                guild_id: Snowflake(99)
            }
        );
    }

    #[test]
    fn test_validate_rejects_before_any_request() {
        assert!(matches!(
            validate(&request("xyzzy", None)),
            Err(Error::UnknownCommand(name)) if name == "xyzzy"
        ));
        assert!(matches!(
            validate(&request("serverinfo", None)),
            Err(Error::MissingGuildId)
        ));
        assert!(matches!(
            validate(&request("serverinfo", Some("g1"))),
            Err(Error::InvalidId(..))
        ));
    }
}
