use serde::{Deserialize, Serialize};

use crate::user::User;
use crate::Snowflake;
use chrono::{DateTime, Utc};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Member {
    pub user: Option<User>,
    pub nick: Option<Box<str>>,
    #[serde(default, serialize_with = "Snowflake::serialize_vec_to_ints")]
    pub roles: Vec<Snowflake>,
    pub joined_at: Option<DateTime<Utc>>,
    pub premium_since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deaf: bool,
    #[serde(default)]
    pub mute: bool,
    #[serde(default)]
    pub pending: bool,
}

impl Member {
    pub fn display_name(&self) -> Option<&str> {
        match &self.nick {
            Some(nick) => Some(nick),
            None => self.user.as_ref().map(User::display_name),
        }
    }
}
