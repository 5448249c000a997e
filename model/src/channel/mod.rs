mod channel;
pub use channel::Channel;

pub mod message;
