pub mod embed;
pub use embed::Embed;

mod create_message;
pub use create_message::CreateMessage;
