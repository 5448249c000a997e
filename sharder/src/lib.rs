mod gateway;
pub use gateway::*;

mod rest;
pub use rest::{Application, RestClient, RestError};

mod enrichment;
pub use enrichment::{fetch_server_embed, server_embed, user_embed, GatewayEnricher};

mod status;
pub use status::{SessionStatus, StatusSnapshot};

mod options;
pub use options::Options;
