// ABOUTME: Error type for the companion-server utilities.
// ABOUTME: Configuration, header construction and logger installation failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SharedError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid header value for {name}: {value}")]
    Header { name: String, value: String },

    #[error("failed to install logger: {0}")]
    Logging(String),
}
