use model::guild::UnavailableGuild;
use model::user::User;
use serde::Deserialize;
use serde_json::Value;

/// Opcode 0 payload, the event body is decoded once the type is known
#[derive(Deserialize, Debug)]
pub struct Dispatch {
    #[serde(rename = "t")]
    pub event_type: String,

    #[serde(rename = "d")]
    pub data: Value,
}

#[derive(Deserialize, Debug)]
pub struct Ready {
    #[serde(rename = "v")]
    pub gateway_version: i32,
    pub user: User,
    pub guilds: Vec<UnavailableGuild>,
    pub session_id: String,
    pub resume_gateway_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ready() {
        let raw = json!({
            "op": 0,
            "s": 1,
            "t": "READY",
            "d": {
                "v": 10,
                "user": { "id": "80351110224678912", "username": "bridge", "avatar": null, "bot": true },
                "guilds": [{ "id": "41771983423143937", "unavailable": true }],
                "session_id": "abc",
                "resume_gateway_url": "wss://gateway-us-east1-b.discord.gg",
                "shard": [0, 1],
                "application": { "id": "80351110224678912", "flags": 0 }
            }
        });

        let dispatch: Dispatch = serde_json::from_value(raw).unwrap();
        assert_eq!(dispatch.event_type, "READY");

        let ready: Ready = serde_json::from_value(dispatch.data).unwrap();
        assert_eq!(ready.session_id, "abc");
        assert_eq!(ready.guilds.len(), 1);
        assert!(ready.user.bot);
    }
}
