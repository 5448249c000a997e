use crate::interaction::{ApplicationCommandOption, ApplicationCommandType};
use crate::Snowflake;
use serde::{Deserialize, Serialize};

/// A command as registered with Discord
#[derive(Serialize, Deserialize, Debug)]
pub struct ApplicationCommand {
    pub id: Snowflake,
    pub application_id: Snowflake,
    #[serde(default)]
    pub r#type: ApplicationCommandType,
    pub name: Box<str>,
    pub description: Box<str>,
    #[serde(default)]
    pub options: Vec<ApplicationCommandOption>,
}

/// Element of the bulk overwrite body, `PUT /applications/{id}/commands`
#[derive(Serialize, Debug)]
pub struct CreateApplicationCommand {
    pub r#type: ApplicationCommandType,
    pub name: Box<str>,
    pub description: Box<str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ApplicationCommandOption>,
}
