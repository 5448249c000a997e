use model::interaction::{
    InteractionApplicationCommandCallbackData, InteractionResponse as WireResponse,
};
use serde_json::{json, Value};

/// The only two shapes the core ever answers with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionResponse {
    Pong,
    ChannelMessage { content: String },
}

impl InteractionResponse {
    pub fn message(content: impl Into<String>) -> InteractionResponse {
        InteractionResponse::ChannelMessage {
            content: content.into(),
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            InteractionResponse::Pong => None,
            InteractionResponse::ChannelMessage { content } => Some(content),
        }
    }
}

impl From<InteractionResponse> for WireResponse {
    fn from(response: InteractionResponse) -> Self {
        match response {
            InteractionResponse::Pong => WireResponse::new_pong(),
            InteractionResponse::ChannelMessage { content } => {
                WireResponse::new_channel_message_with_source(
                    InteractionApplicationCommandCallbackData::content(content),
                )
            }
        }
    }
}

/// Renders the interaction response envelope, `{"type":1}` or
/// `{"type":4,"data":{"content":...}}`.
pub fn format(response: &InteractionResponse) -> Value {
    json!(WireResponse::from(response.clone()))
}
