mod shard;
pub use shard::Shard;

mod payloads;
pub use payloads::Identify;

mod error;
pub use error::GatewayError;

mod outbound_message;
use outbound_message::OutboundMessage;

mod close_event;
pub use close_event::CloseEvent;

mod intents;
pub use intents::Intents;
