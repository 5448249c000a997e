use crate::{Result, Verifier};
use serde::Deserialize;
use std::net::SocketAddr;

const PLACEHOLDER_TOKEN: &str = "your_discord_bot_token_here";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_addr")]
    pub server_addr: String,

    #[serde(default)]
    pub discord_public_key: Option<String>,

    #[serde(default)]
    pub discord_token: Option<String>,

    #[serde(default)]
    pub json_log: bool,
}

fn default_server_addr() -> String {
    String::from("0.0.0.0:8000")
}

impl Config {
    pub fn from_env() -> Result<Self> {
        envy::from_env().map_err(Into::into)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.server_addr.trim().parse().map_err(Into::into)
    }

    pub fn verifier(&self) -> Result<Verifier> {
        Verifier::from_hex(self.discord_public_key.as_deref())
    }

    /// The bot token, unless it is unset or still the sample value
    pub fn bot_token(&self) -> Option<&str> {
        self.discord_token
            .as_deref()
            .map(|token| token.trim_end_matches('\r').trim())
            .filter(|token| !token.is_empty() && *token != PLACEHOLDER_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_vars(vars: &[(&str, &str)]) -> Config {
        envy::from_iter(
            vars.iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_vars(&[]);

        assert_eq!(config.socket_addr().unwrap(), "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert!(config.bot_token().is_none());
        assert!(!config.json_log);
        assert!(!config.verifier().unwrap().is_configured());
    }

    #[test]
    fn test_placeholder_token_is_ignored() {
        let config = from_vars(&[("DISCORD_TOKEN", PLACEHOLDER_TOKEN)]);
        assert!(config.bot_token().is_none());

        let config = config_with_token("abc.def\r");
        assert_eq!(config.bot_token(), Some("abc.def"));
    }

    fn config_with_token(token: &str) -> Config {
        from_vars(&[("DISCORD_TOKEN", token), ("SERVER_ADDR", "127.0.0.1:3000")])
    }
}
