use crate::{RestClient, RestError, SessionStatus};
use async_trait::async_trait;
use common::commands::PING_ACK;
use common::{Enricher, Interaction};
use model::channel::message::embed::COLOR_BLUE;
use model::channel::message::Embed;
use model::guild::{Guild, Member};
use model::interaction::{InteractionApplicationCommandCallbackData, InteractionResponse};
use model::user::User;
use model::Snowflake;
use std::sync::Arc;
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Upgrades the plain command replies with data only the bot session can see
pub struct GatewayEnricher {
    rest: Arc<RestClient>,
    status: Arc<SessionStatus>,
}

impl GatewayEnricher {
    pub fn new(rest: Arc<RestClient>, status: Arc<SessionStatus>) -> GatewayEnricher {
        GatewayEnricher { rest, status }
    }

    fn ping(&self) -> Option<InteractionResponse> {
        let latency = self.status.latency()?;

        Some(message(format!(
            "{} Latency: {}ms",
            PING_ACK,
            latency.as_millis()
        )))
    }

    async fn serverinfo(
        &self,
        interaction: &Interaction,
    ) -> Result<Option<InteractionResponse>, RestError> {
        let guild_id = match parse_id(interaction.guild_id.as_deref()) {
            Some(guild_id) => guild_id,
            None => return Ok(None),
        };

        let embed = fetch_server_embed(&self.rest, guild_id).await?;
        Ok(Some(embed_message(embed)))
    }

    async fn userinfo(
        &self,
        interaction: &Interaction,
    ) -> Result<Option<InteractionResponse>, RestError> {
        let target = interaction
            .option_str("user")
            .or(interaction.invoking_user_id.as_deref());

        let user_id = match parse_id(target) {
            Some(user_id) => user_id,
            None => return Ok(None),
        };

        let embed = match parse_id(interaction.guild_id.as_deref()) {
            Some(guild_id) => {
                let member = self.rest.get_guild_member(guild_id, user_id).await?;
                let user = match &member.user {
                    Some(user) => user.clone(),
                    None => self.rest.get_user(user_id).await?,
                };

                user_embed(&user, Some(&member))
            }
            None => user_embed(&self.rest.get_user(user_id).await?, None),
        };

        Ok(Some(embed_message(embed)))
    }
}

#[async_trait]
impl Enricher for GatewayEnricher {
    async fn enrich(&self, interaction: &Interaction) -> Option<InteractionResponse> {
        let name = interaction.command_name.as_deref()?;

        let res = match name {
            "ping" => return self.ping(),
            "serverinfo" => self.serverinfo(interaction).await,
            "userinfo" => self.userinfo(interaction).await,
            _ => return None,
        };

        match res {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, command = name, "Failed to enrich command, using plain reply");
                None
            }
        }
    }
}

pub async fn fetch_server_embed(rest: &RestClient, guild_id: Snowflake) -> Result<Embed, RestError> {
    let guild = rest.get_guild(guild_id).await?;
    let channels = rest.get_guild_channels(guild_id).await?;

    Ok(server_embed(&guild, channels.len()))
}

pub fn server_embed(guild: &Guild, channel_count: usize) -> Embed {
    let members = guild
        .members()
        .map(|count| count.to_string())
        .unwrap_or_else(|| String::from("Unknown"));

    Embed::new(format!("{} info", guild.name))
        .color(COLOR_BLUE)
        .inline_field("Members", members)
        .inline_field("Server ID", guild.id)
        .inline_field("Created", guild.id.created_at().format(DATE_FORMAT))
        .inline_field("Owner", format!("<@{}>", guild.owner_id))
        .inline_field("Channels", channel_count)
        .inline_field("Roles", guild.roles.len())
        .thumbnail(guild.icon_url())
}

pub fn user_embed(user: &User, member: Option<&Member>) -> Embed {
    let display_name = member
        .and_then(Member::display_name)
        .unwrap_or_else(|| user.display_name());

    let joined = member
        .and_then(|member| member.joined_at)
        .map(|joined| joined.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| String::from("N/A"));

    let roles = member.map_or(0, |member| member.roles.len());

    Embed::new(format!("{} info", display_name))
        .color(user.accent_color.unwrap_or(COLOR_BLUE))
        .inline_field("Username", &user.username)
        .inline_field("Display name", display_name)
        .inline_field("User ID", user.id)
        .inline_field("Account created", user.id.created_at().format(DATE_FORMAT))
        .inline_field("Joined server", joined)
        .inline_field("Roles", roles)
        .thumbnail(user.avatar_url())
}

fn parse_id(raw: Option<&str>) -> Option<Snowflake> {
    raw.and_then(|raw| raw.parse().ok())
}

fn message(content: String) -> InteractionResponse {
    InteractionResponse::new_channel_message_with_source(
        InteractionApplicationCommandCallbackData::content(content),
    )
}

fn embed_message(embed: Embed) -> InteractionResponse {
    InteractionResponse::new_channel_message_with_source(
        InteractionApplicationCommandCallbackData::embed(embed),
    )
}
