use crate::interaction::InteractionApplicationCommandCallbackData;
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_repr::{Deserialize_repr, Serialize_repr};

#[derive(Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum InteractionResponse {
    PongResponse(SimpleInteractionResponse),
    ChannelMessageWithSource(ApplicationCommandResponse),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SimpleInteractionResponse {
    r#type: InteractionResponseType,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApplicationCommandResponse {
    r#type: InteractionResponseType,
    pub data: InteractionApplicationCommandCallbackData,
}

#[derive(Serialize_repr, Deserialize_repr, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[non_exhaustive]
pub enum InteractionResponseType {
    Pong = 1,
    ChannelMessageWithSource = 4,
    DeferredChannelMessageWithSource = 5,
    DeferredMessageUpdate = 6,
    UpdateMessage = 7,
    ApplicationCommandAutoCompleteResult = 8,
    Modal = 9,
}

impl TryFrom<u64> for InteractionResponseType {
    type Error = Box<str>;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::Pong,
            4 => Self::ChannelMessageWithSource,
            5 => Self::DeferredChannelMessageWithSource,
            6 => Self::DeferredMessageUpdate,
            7 => Self::UpdateMessage,
            8 => Self::ApplicationCommandAutoCompleteResult,
            9 => Self::Modal,
            _ => {
                return Err(
                    format!("invalid interaction response type \"{}\"", value).into_boxed_str()
                )
            }
        })
    }
}

impl InteractionResponse {
    pub fn new_pong() -> InteractionResponse {
        InteractionResponse::PongResponse(SimpleInteractionResponse {
            r#type: InteractionResponseType::Pong,
        })
    }

    pub fn new_channel_message_with_source(
        data: InteractionApplicationCommandCallbackData,
    ) -> InteractionResponse {
        InteractionResponse::ChannelMessageWithSource(ApplicationCommandResponse {
            r#type: InteractionResponseType::ChannelMessageWithSource,
            data,
        })
    }

    pub fn response_type(&self) -> InteractionResponseType {
        match self {
            InteractionResponse::PongResponse(res) => res.r#type,
            InteractionResponse::ChannelMessageWithSource(res) => res.r#type,
        }
    }
}

impl<'de> Deserialize<'de> for InteractionResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;

        let response_type = value
            .get("type")
            .and_then(Value::as_u64)
            .ok_or_else(|| Box::from("interaction response type was not an integer"))
            .and_then(InteractionResponseType::try_from)
            .map_err(D::Error::custom)?;

        let response = match response_type {
            InteractionResponseType::Pong => {
                serde_json::from_value(value).map(InteractionResponse::PongResponse)
            }
            InteractionResponseType::ChannelMessageWithSource => {
                serde_json::from_value(value).map(InteractionResponse::ChannelMessageWithSource)
            }
            other => {
                return Err(D::Error::custom(format!(
                    "{:?} responses are not supported",
                    other
                )))
            }
        }
        .map_err(D::Error::custom)?;

        Ok(response)
    }
}
