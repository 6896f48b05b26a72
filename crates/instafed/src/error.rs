// ABOUTME: Error type for reading Instagram exports and writing Pixelfed archives.
// ABOUTME: Maps every failure onto the shared ErrorKind.

use minitools_feed::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstafedError {
    #[error("Invalid Instagram archive: {0}")]
    InvalidArchive(String),

    #[error("Personal information file not found in archive")]
    MissingPersonalInformation,

    #[error("Username not found in expected location")]
    UsernameNotFound,

    #[error("Invalid {what} format: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl InstafedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InstafedError::Io(_) => ErrorKind::Unknown,
            _ => ErrorKind::Validation,
        }
    }
}
