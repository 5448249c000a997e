use model::channel::message::CreateMessage;
use model::channel::Channel;
use model::guild::{Guild, Member};
use model::interaction::{ApplicationCommand, CreateApplicationCommand, InteractionResponse};
use model::user::User;
use model::Snowflake;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const API_BASE: &str = "https://discord.com/api/v10";

#[derive(thiserror::Error, Debug)]
pub enum RestError {
    #[error("error while performing HTTP request: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Discord returned status {status}: {body}")]
    StatusError { status: StatusCode, body: String },
}

impl RestError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RestError::StatusError { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

#[derive(Deserialize, Debug)]
pub struct Application {
    pub id: Snowflake,
    pub name: String,
}

/// Thin bot-token authenticated client for the handful of endpoints the bridge calls
pub struct RestClient {
    http_client: reqwest::Client,
    token: Box<str>,
}

impl RestClient {
    pub fn new(token: impl Into<Box<str>>) -> Result<RestClient, RestError> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(3))
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(RestClient {
            http_client,
            token: token.into(),
        })
    }

    pub async fn get_guild(&self, guild_id: Snowflake) -> Result<Guild, RestError> {
        let path = format!("/guilds/{}?with_counts=true", guild_id);
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn get_guild_channels(&self, guild_id: Snowflake) -> Result<Vec<Channel>, RestError> {
        let path = format!("/guilds/{}/channels", guild_id);
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn get_guild_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> Result<Member, RestError> {
        let path = format!("/guilds/{}/members/{}", guild_id, user_id);
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn get_user(&self, user_id: Snowflake) -> Result<User, RestError> {
        let path = format!("/users/{}", user_id);
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn get_current_application(&self) -> Result<Application, RestError> {
        self.send(self.request(Method::GET, "/applications/@me")).await
    }

    pub async fn create_message(
        &self,
        channel_id: Snowflake,
        message: &CreateMessage,
    ) -> Result<(), RestError> {
        let path = format!("/channels/{}/messages", channel_id);
        self.send_no_content(self.request(Method::POST, &path).json(message))
            .await
    }

    /// Answers an interaction received over the gateway. The interaction token authenticates
    /// this call, the bot token is sent regardless.
    pub async fn create_interaction_response(
        &self,
        interaction_id: &str,
        interaction_token: &str,
        response: &InteractionResponse,
    ) -> Result<(), RestError> {
        let path = format!(
            "/interactions/{}/{}/callback",
            interaction_id, interaction_token
        );

        self.send_no_content(self.request(Method::POST, &path).json(response))
            .await
    }

    pub async fn bulk_overwrite_global_commands(
        &self,
        application_id: Snowflake,
        commands: &[CreateApplicationCommand],
    ) -> Result<Vec<ApplicationCommand>, RestError> {
        let path = format!("/applications/{}/commands", application_id);
        self.send(self.request(Method::PUT, &path).json(commands))
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "Discord API request");

        self.http_client
            .request(method, format!("{}{}", API_BASE, path))
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, RestError> {
        let res = req.send().await?;
        let res = Self::check_status(res).await?;

        Ok(res.json().await?)
    }

    async fn send_no_content(&self, req: RequestBuilder) -> Result<(), RestError> {
        let res = req.send().await?;
        Self::check_status(res).await?;

        Ok(())
    }

    async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, RestError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        Err(RestError::StatusError { status, body })
    }
}
