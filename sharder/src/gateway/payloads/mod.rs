mod payload;
pub use payload::Payload;

mod opcode;
pub use opcode::Opcode;

mod dispatch;
pub use dispatch::{Dispatch, Ready};

mod heartbeat;
pub use heartbeat::Heartbeat;

mod identify;
pub use identify::Identify;

mod resume;
pub use resume::Resume;

mod invalid_session;
pub use invalid_session::InvalidSession;

mod hello;
pub use hello::Hello;
