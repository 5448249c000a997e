//! Bodies of the built-in commands. Each one only reads the interaction it is given.

use crate::{Interaction, InteractionResponse};

pub const PING_ACK: &str = "🏓 Pong!";
pub const UNKNOWN_INTERACTION_TYPE: &str = "Unrecognized interaction type.";

pub fn ping(_: &Interaction) -> InteractionResponse {
    InteractionResponse::message(format!(
        "{} Answered through the interactions endpoint.",
        PING_ACK
    ))
}

pub fn hello(interaction: &Interaction) -> InteractionResponse {
    InteractionResponse::message(format!(
        "Hello, {}!",
        mention(interaction.invoking_user_id.as_deref())
    ))
}

pub fn here(interaction: &Interaction) -> InteractionResponse {
    let user = mention(interaction.invoking_user_id.as_deref());

    let content = match (&interaction.guild_id, &interaction.channel_id) {
        (Some(guild_id), Some(channel_id)) => format!(
            "You are {} in <#{}> on server `{}`.",
            user, channel_id, guild_id
        ),
        (Some(guild_id), None) => format!("You are {} on server `{}`.", user, guild_id),
        (None, Some(channel_id)) => {
            format!("You are {} in a direct message (<#{}>).", user, channel_id)
        }
        (None, None) => format!("You are {} in a direct message.", user),
    };

    InteractionResponse::message(content)
}

pub fn serverinfo(interaction: &Interaction) -> InteractionResponse {
    match &interaction.guild_id {
        Some(guild_id) => InteractionResponse::message(format!("Server ID: `{}`", guild_id)),
        None => InteractionResponse::message("This command can only be used in a server."),
    }
}

pub fn userinfo(interaction: &Interaction) -> InteractionResponse {
    let target = interaction
        .option_str("user")
        .or(interaction.invoking_user_id.as_deref());

    match target {
        Some(user_id) => InteractionResponse::message(format!(
            "User: <@{}>\nUser ID: `{}`",
            user_id, user_id
        )),
        None => InteractionResponse::message("Could not resolve a user."),
    }
}

pub fn unknown_command(name: &str) -> InteractionResponse {
    InteractionResponse::message(format!("Command '{}' was not recognized.", name))
}

fn mention(user_id: Option<&str>) -> String {
    match user_id {
        Some(id) => format!("<@{}>", id),
        None => String::from("there"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_here_in_guild() {
        let interaction = Interaction::command("here", "u1").in_guild("g1", "c1");
        let content = here(&interaction).content().unwrap().to_owned();

        assert!(content.contains("<@u1>"));
        assert!(content.contains("<#c1>"));
        assert!(content.contains("g1"));
    }

    #[test]
    fn test_here_in_dm() {
        let interaction = Interaction::command("here", "u1");
        assert_eq!(
            here(&interaction).content(),
            Some("You are <@u1> in a direct message.")
        );
    }

    #[test]
    fn test_serverinfo_outside_guild() {
        let interaction = Interaction::command("serverinfo", "u1");
        assert_eq!(
            serverinfo(&interaction).content(),
            Some("This command can only be used in a server.")
        );
    }

    #[test]
    fn test_userinfo_prefers_option() {
        let interaction = Interaction::command("userinfo", "u1").with_option("user", json!("u2"));
        let content = userinfo(&interaction).content().unwrap().to_owned();

        assert!(content.contains("<@u2>"));
        assert!(!content.contains("u1"));
    }
}
