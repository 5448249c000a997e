use serde::{Deserialize, Serialize};

use super::Role;
use crate::{ImageHash, Snowflake};

/// Guild object as returned by `GET /guilds/{id}?with_counts=true` and GUILD_CREATE
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Guild {
    pub id: Snowflake,
    pub name: Box<str>,
    pub icon: Option<ImageHash>,
    pub owner_id: Snowflake,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_member_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable: Option<bool>,
}

impl Guild {
    pub fn icon_url(&self) -> Option<String> {
        self.icon.as_ref().map(|hash| {
            format!(
                "https://cdn.discordapp.com/icons/{}/{}.{}",
                self.id,
                hash,
                hash.extension()
            )
        })
    }

    /// GUILD_CREATE carries `member_count`, the REST endpoint only the approximation
    pub fn members(&self) -> Option<u32> {
        self.member_count.or(self.approximate_member_count)
    }
}

impl PartialEq for Guild {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
