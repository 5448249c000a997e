//! Transport independent handling of Discord interactions: parsing, command dispatch and
//! response formatting. Nothing in here performs I/O, so the webhook and the gateway session
//! share it as-is.

mod interaction;
pub use interaction::{parse, parse_value, CommandOption, Interaction, InteractionKind, ParseError};

mod response;
pub use response::{format, InteractionResponse};

mod registry;
pub use registry::{Command, CommandRegistry, Enricher, Handler, OptionSpec};

pub mod commands;
