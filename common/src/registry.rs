use crate::{commands, Interaction, InteractionKind, InteractionResponse};
use async_trait::async_trait;
use model::interaction::{
    ApplicationCommandOption, ApplicationCommandOptionType, ApplicationCommandType,
    CreateApplicationCommand, InteractionResponse as WireResponse,
};
use std::collections::HashMap;
use tracing::debug;

pub type Handler = fn(&Interaction) -> InteractionResponse;

#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ApplicationCommandOptionType,
    pub required: bool,
}

#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub options: &'static [OptionSpec],
    pub handler: Handler,
}

impl Command {
    /// The definition published to Discord for this command
    pub fn definition(&self) -> CreateApplicationCommand {
        CreateApplicationCommand {
            r#type: ApplicationCommandType::ChatInput,
            name: Box::from(self.name),
            description: Box::from(self.description),
            options: self
                .options
                .iter()
                .map(|option| ApplicationCommandOption {
                    r#type: option.kind,
                    name: Box::from(option.name),
                    description: Box::from(option.description),
                    required: option.required,
                })
                .collect(),
        }
    }
}

/// Capability the gateway session offers on top of the plain handlers, e.g. embeds built from
/// live guild data. Returning `None` falls back to the registry handler.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, interaction: &Interaction) -> Option<WireResponse>;
}

/// Static table of commands, built once at startup and only read afterwards
pub struct CommandRegistry {
    commands: HashMap<&'static str, Command>,
}

const USER_OPTION: &[OptionSpec] = &[OptionSpec {
    name: "user",
    description: "The user to show, defaults to you",
    kind: ApplicationCommandOptionType::User,
    required: false,
}];

impl CommandRegistry {
    pub fn empty() -> CommandRegistry {
        CommandRegistry {
            commands: HashMap::new(),
        }
    }

    pub fn builtin() -> CommandRegistry {
        let mut registry = CommandRegistry::empty();

        registry.register(Command {
            name: "ping",
            description: "Checks that the bot is responding",
            options: &[],
            handler: commands::ping,
        });

        registry.register(Command {
            name: "hello",
            description: "Says hello",
            options: &[],
            handler: commands::hello,
        });

        registry.register(Command {
            name: "here",
            description: "Shows where this command was run",
            options: &[],
            handler: commands::here,
        });

        registry.register(Command {
            name: "serverinfo",
            description: "Shows information about this server",
            options: &[],
            handler: commands::serverinfo,
        });

        registry.register(Command {
            name: "userinfo",
            description: "Shows information about a user",
            options: USER_OPTION,
            handler: commands::userinfo,
        });

        registry
    }

    pub fn register(&mut self, command: Command) {
        self.commands.insert(command.name, command);
    }

    /// Exact, case sensitive lookup
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Sorted by name so published command lists are stable
    pub fn commands(&self) -> Vec<&Command> {
        let mut commands: Vec<&Command> = self.commands.values().collect();
        commands.sort_by_key(|command| command.name);
        commands
    }

    pub fn definitions(&self) -> Vec<CreateApplicationCommand> {
        self.commands()
            .into_iter()
            .map(Command::definition)
            .collect()
    }

    pub fn dispatch(&self, interaction: &Interaction) -> InteractionResponse {
        match interaction.kind {
            InteractionKind::Ping => InteractionResponse::Pong,

            InteractionKind::ApplicationCommand => {
                let name = interaction.command_name.as_deref().unwrap_or_default();

                match self.get(name) {
                    Some(command) => (command.handler)(interaction),
                    None => {
                        debug!(command = %name, "Received unregistered command");
                        commands::unknown_command(name)
                    }
                }
            }

            InteractionKind::Unknown(code) => {
                debug!(code, "Received unknown interaction type");
                InteractionResponse::message(commands::UNKNOWN_INTERACTION_TYPE)
            }
        }
    }

    /// Dispatches through the enricher first, for registered commands only
    pub async fn dispatch_enriched(
        &self,
        interaction: &Interaction,
        enricher: &dyn Enricher,
    ) -> WireResponse {
        let registered = interaction.kind == InteractionKind::ApplicationCommand
            && interaction
                .command_name
                .as_deref()
                .map_or(false, |name| self.commands.contains_key(name));

        if registered {
            if let Some(response) = enricher.enrich(interaction).await {
                return response;
            }
        }

        self.dispatch(interaction).into()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        CommandRegistry::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{format, parse};
    use model::interaction::{InteractionApplicationCommandCallbackData, InteractionResponseType};
    use serde_json::json;

    struct EmbedEverything;

    #[async_trait]
    impl Enricher for EmbedEverything {
        async fn enrich(&self, _: &Interaction) -> Option<WireResponse> {
            Some(WireResponse::new_channel_message_with_source(
                InteractionApplicationCommandCallbackData::content("enriched"),
            ))
        }
    }

    struct NoEnrichment;

    #[async_trait]
    impl Enricher for NoEnrichment {
        async fn enrich(&self, _: &Interaction) -> Option<WireResponse> {
            None
        }
    }

    #[test]
    fn test_ping_interaction_always_pongs() {
        let registry = CommandRegistry::builtin();

        let mut interaction = Interaction::ping();
        interaction.command_name = Some(String::from("xyzzy"));

        assert_eq!(registry.dispatch(&interaction), InteractionResponse::Pong);
        assert_eq!(
            format(&registry.dispatch(&parse(br#"{"type":1}"#).unwrap())),
            json!({ "type": 1 })
        );
    }

    #[test]
    fn test_ping_command() {
        let registry = CommandRegistry::builtin();
        let response = registry.dispatch(&Interaction::command("ping", "1"));

        let content = response.content().unwrap();
        assert!(!content.is_empty());
        assert!(content.contains(commands::PING_ACK));
    }

    #[test]
    fn test_unknown_command_is_named() {
        let registry = CommandRegistry::builtin();
        let response = registry.dispatch(&Interaction::command("xyzzy", "1"));

        assert!(response.content().unwrap().contains("xyzzy"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = CommandRegistry::builtin();
        let response = registry.dispatch(&Interaction::command("PING", "1"));

        assert_eq!(response, commands::unknown_command("PING"));
    }

    #[test]
    fn test_unknown_interaction_type() {
        let registry = CommandRegistry::builtin();
        let response = registry.dispatch(&parse(br#"{"type":5}"#).unwrap());

        assert_eq!(response.content(), Some(commands::UNKNOWN_INTERACTION_TYPE));
    }

    #[test]
    fn test_hello_round_trip_mentions_member() {
        let registry = CommandRegistry::builtin();
        let body = json!({
            "type": 2,
            "data": { "name": "hello" },
            "member": { "user": { "id": "42" } }
        });

        let interaction = parse(body.to_string().as_bytes()).unwrap();
        let json = format(&registry.dispatch(&interaction));

        assert_eq!(json["type"], 4);
        assert!(json["data"]["content"].as_str().unwrap().contains("<@42>"));
    }

    #[test]
    fn test_definitions_are_sorted() {
        let definitions = CommandRegistry::builtin().definitions();
        let names: Vec<&str> = definitions.iter().map(|d| &*d.name).collect();

        assert_eq!(names, ["hello", "here", "ping", "serverinfo", "userinfo"]);

        let userinfo = serde_json::to_value(&definitions[4]).unwrap();
        assert_eq!(userinfo["type"], 1);
        assert_eq!(userinfo["options"][0]["type"], 6);
        assert_eq!(userinfo["options"][0]["required"], false);
    }

    #[tokio::test]
    async fn test_enricher_only_applies_to_registered_commands() {
        let registry = CommandRegistry::builtin();

        let enriched = registry
            .dispatch_enriched(&Interaction::command("serverinfo", "1"), &EmbedEverything)
            .await;
        let enriched = serde_json::to_value(enriched).unwrap();
        assert_eq!(enriched["data"]["content"], "enriched");

        let unknown = registry
            .dispatch_enriched(&Interaction::command("xyzzy", "1"), &EmbedEverything)
            .await;
        let unknown = serde_json::to_value(unknown).unwrap();
        assert!(unknown["data"]["content"].as_str().unwrap().contains("xyzzy"));

        let pong = registry
            .dispatch_enriched(&Interaction::ping(), &EmbedEverything)
            .await;
        assert_eq!(pong.response_type(), InteractionResponseType::Pong);
    }

    #[tokio::test]
    async fn test_enricher_falls_back_to_handler() {
        let registry = CommandRegistry::builtin();

        let response = registry
            .dispatch_enriched(&Interaction::command("hello", "42"), &NoEnrichment)
            .await;

        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json, json!({ "type": 4, "data": { "content": "Hello, <@42>!" } }));
    }
}
