use serde::{Deserialize, Serialize};

use crate::Snowflake;

/// Only the fields needed to count channels; the type is kept as its raw code so
/// channel kinds added by Discord later still deserialize.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Channel {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub channel_type: u8,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub name: Option<Box<str>>,
}
