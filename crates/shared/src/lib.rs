// ABOUTME: Shared plumbing for the minitools companion server.
// ABOUTME: Logging, CORS, security headers, health check, configuration and message types.

pub mod config;
pub mod cors;
pub mod error;
pub mod health;
pub mod logging;
pub mod messages;
pub mod router;
pub mod security;

pub use config::ServerConfig;
pub use cors::CorsOptions;
pub use error::SharedError;
pub use messages::MessageType;
pub use minitools_feed::ErrorKind;
pub use router::{router, router_with};
pub use security::SecurityOptions;
