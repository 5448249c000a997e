use super::Opcode;

use serde::{Deserialize, Serialize};

/// Envelope fields shared by every gateway payload, read before the body is decoded
#[derive(Serialize, Deserialize, Debug)]
pub struct Payload {
    #[serde(rename = "op")]
    pub opcode: Opcode,

    #[serde(rename = "s", default)]
    pub seq: Option<u64>,
}
