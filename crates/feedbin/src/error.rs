// ABOUTME: Error type for the Feedbin client and the favorites migration.
// ABOUTME: Each variant maps onto the shared ErrorKind used for user-facing messages.

use minitools_feed::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedbinError {
    /// Feedbin answered 401.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Input rejected before any request was sent.
    #[error("{0}")]
    Invalid(String),

    #[error("{op} failed: HTTP {status}")]
    Status { op: String, status: u16 },

    #[error("network error during {op}: {source}")]
    Network {
        op: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {op}: {source}")]
    Decode {
        op: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FeedbinError {
    pub fn invalid(message: impl Into<String>) -> Self {
        FeedbinError::Invalid(message.into())
    }

    pub(crate) fn network(op: &str, source: reqwest::Error) -> Self {
        FeedbinError::Network {
            op: op.to_string(),
            source,
        }
    }

    pub(crate) fn decode(op: &str, source: reqwest::Error) -> Self {
        FeedbinError::Decode {
            op: op.to_string(),
            source,
        }
    }

    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, FeedbinError::InvalidCredentials)
    }

    /// Category used to pick the message shown to the user.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedbinError::InvalidCredentials => ErrorKind::Api,
            FeedbinError::Invalid(_) => ErrorKind::Validation,
            FeedbinError::Status { .. } => ErrorKind::Api,
            FeedbinError::Network { .. } => ErrorKind::Network,
            FeedbinError::Decode { .. } => ErrorKind::Api,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_kind() {
        let err = FeedbinError::Status {
            op: "subscriptions".into(),
            status: 500,
        };
        assert_eq!(err.to_string(), "subscriptions failed: HTTP 500");
        assert_eq!(err.kind(), ErrorKind::Api);

        let err = FeedbinError::invalid("Password is required");
        assert_eq!(err.to_string(), "Password is required");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(FeedbinError::InvalidCredentials.is_invalid_credentials());
    }
}
