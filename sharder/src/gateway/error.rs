use crate::gateway::outbound_message::OutboundMessage;
use crate::gateway::CloseEvent;
use crate::RestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("error while decoding gateway payload: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("invalid gateway url: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("error while operating on websocket: {0}")]
    WebsocketError(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("error while reading oneshot channel: {0}")]
    RecvError(#[from] tokio::sync::oneshot::error::RecvError),

    #[error("error while sending message to writer: {0}")]
    SendMessageError(#[from] tokio::sync::mpsc::error::SendError<OutboundMessage>),

    #[error("error while parsing interaction: {0}")]
    InteractionError(#[from] common::ParseError),

    #[error("error while calling the Discord API: {0}")]
    RestError(#[from] RestError),

    #[error("interaction was missing its id or token")]
    MissingInteractionToken,

    #[error("gateway closed the connection with fatal code {}: {}", .0.status_code, .0.error)]
    FatalClose(CloseEvent),
}
