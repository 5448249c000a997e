pub mod http;

mod config;
pub use config::Config;

mod error;
pub use error::{Error, Result};

pub mod verify;
pub use verify::{verify, Verifier};

mod util;
pub use util::await_shutdown;
