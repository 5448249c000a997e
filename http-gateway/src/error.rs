use serde::Serializer;
use std::fmt::Debug;
use warp::http::StatusCode;
use warp::reject::Reject;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("request is missing the signature headers")]
    MissingSignatureHeaders,

    #[error("no public key is configured, rejecting signed request")]
    MissingPublicKey,

    #[error("invalid ed25519 signature: {0}")]
    InvalidSignatureFormat(#[from] hex::FromHexError),

    #[error("invalid ed25519 signature: {0}")]
    InvalidSignature(#[from] ed25519_dalek::SignatureError),

    #[error("invalid public key: {0}")]
    InvalidPublicKeyFormat(hex::FromHexError),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(ed25519_dalek::SignatureError),

    #[error("error while parsing interaction: {0}")]
    InteractionError(#[from] common::ParseError),

    #[error("error while decoding json payload: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("error while reading configuration: {0}")]
    EnvError(#[from] envy::Error),

    #[error("invalid server address: {0}")]
    AddrError(#[from] std::net::AddrParseError),

    #[error("error while starting server: {0}")]
    WarpError(#[from] warp::Error),

    #[error("error while performing I/O: {0}")]
    IoError(#[from] std::io::Error),

    #[error("error while calling the Discord API: {0}")]
    RestError(#[from] sharder::RestError),

    #[error("no gateway session is configured")]
    BotUnavailable,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("command requires a guild id")]
    MissingGuildId,

    #[error("invalid id: {0}")]
    InvalidId(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingSignatureHeaders
            | Error::MissingPublicKey
            | Error::InvalidSignatureFormat(..)
            | Error::InvalidSignature(..) => StatusCode::UNAUTHORIZED,

            Error::InteractionError(..)
            | Error::JsonError(..)
            | Error::UnknownCommand(..)
            | Error::MissingGuildId
            | Error::InvalidId(..) => StatusCode::BAD_REQUEST,

            Error::BotUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            Error::RestError(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Error::RestError(..) => StatusCode::BAD_GATEWAY,

            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the client gets to see, the full error only goes to the log
    pub fn public_message(&self) -> &'static str {
        match self {
            Error::MissingSignatureHeaders
            | Error::MissingPublicKey
            | Error::InvalidSignatureFormat(..)
            | Error::InvalidSignature(..) => "invalid request signature",

            Error::InteractionError(..) => "malformed interaction payload",
            Error::JsonError(..) => "malformed request body",
            Error::UnknownCommand(..) => "unknown command",
            Error::MissingGuildId => "guild_id is required for this command",
            Error::InvalidId(..) => "invalid id",
            Error::BotUnavailable => "bot is not running",
            Error::RestError(e) if e.is_not_found() => "channel, guild or user not found",
            Error::RestError(..) => "Discord API request failed",

            _ => "internal server error",
        }
    }
}

impl Reject for Error {}

impl serde::Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.public_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_failures_are_unauthorized() {
        assert_eq!(Error::MissingSignatureHeaders.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::MissingPublicKey.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::MissingPublicKey.public_message(),
            Error::MissingSignatureHeaders.public_message()
        );
    }

    #[test]
    fn test_serializes_generic_message() {
        let json = serde_json::to_value(Error::UnknownCommand("xyzzy".to_owned())).unwrap();
        assert_eq!(json, "unknown command");
    }

    #[test]
    fn test_converts_into_rejection() {
        let rejection: warp::Rejection = Error::MissingGuildId.into();

        let err = rejection.find::<Error>().unwrap();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
