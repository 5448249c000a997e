use super::Opcode;
use crate::gateway::Intents;
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Identify {
    #[serde(rename = "op")]
    opcode: Opcode,

    #[serde(rename = "d")]
    pub data: IdentifyData,
}

impl Identify {
    pub fn new(token: String, intents: Intents) -> Identify {
        Identify {
            opcode: Opcode::Identify,
            data: IdentifyData {
                token,
                properties: ConnectionProperties::new(),
                compress: Some(false),
                intents,
            },
        }
    }
}

#[derive(Serialize, Debug)]
pub struct IdentifyData {
    pub token: String,

    pub properties: ConnectionProperties,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub compress: Option<bool>,

    pub intents: Intents,
}

#[derive(Serialize, Debug)]
pub struct ConnectionProperties {
    pub os: String,
    pub browser: String,
    pub device: String,
}

const LIBRARY_NAME: &str = "interactions-bridge";

impl ConnectionProperties {
    pub fn new() -> ConnectionProperties {
        ConnectionProperties {
            os: std::env::consts::OS.to_owned(),
            browser: LIBRARY_NAME.to_owned(),
            device: LIBRARY_NAME.to_owned(),
        }
    }
}

impl Default for ConnectionProperties {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identify_shape() {
        let identify = Identify::new("token".to_owned(), Intents::GUILDS);
        let json = serde_json::to_value(&identify).unwrap();

        assert_eq!(json["op"], 2);
        assert_eq!(json["d"]["token"], "token");
        assert_eq!(json["d"]["intents"], 1);
        assert_eq!(json["d"]["properties"]["browser"], LIBRARY_NAME);
    }
}
