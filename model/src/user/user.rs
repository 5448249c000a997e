use serde::{Deserialize, Serialize};

use crate::{ImageHash, Snowflake};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<ImageHash>,
    #[serde(default)]
    pub bot: bool,
    #[serde(default)]
    pub system: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<u32>,
}

impl User {
    /// `<@id>`, rendered by clients as a mention
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.avatar.as_ref().map(|hash| {
            format!(
                "https://cdn.discordapp.com/avatars/{}/{}.{}",
                self.id,
                hash,
                hash.extension()
            )
        })
    }
}
