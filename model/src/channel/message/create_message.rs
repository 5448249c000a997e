use serde::Serialize;

use super::Embed;

/// Body of `POST /channels/{id}/messages`
#[derive(Serialize, Debug, Default)]
pub struct CreateMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl CreateMessage {
    pub fn content(content: impl Into<String>) -> CreateMessage {
        CreateMessage {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn embed(embed: Embed) -> CreateMessage {
        CreateMessage {
            embeds: vec![embed],
            ..Default::default()
        }
    }
}
