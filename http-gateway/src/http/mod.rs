mod server;
pub use server::Server;

mod handle;
pub use handle::CommandRequest;

mod response;
pub use response::ErrorResponse;
