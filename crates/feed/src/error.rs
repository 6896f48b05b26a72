// ABOUTME: Error types for feed data operations and the shared error taxonomy.
// ABOUTME: Provides FeedError plus ErrorKind, which every minitools crate maps its errors onto.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while reading or producing feed data.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Failed to parse the input (malformed XML/JSON).
    #[error("failed to parse feed: {0}")]
    Parse(String),

    /// The data was parsed but does not have the expected shape.
    #[error("invalid feed: {0}")]
    Invalid(String),

    /// The input contains nothing to work with.
    #[error("{0}")]
    Empty(String),

    /// The input was rejected before parsing (size, format, missing fields).
    #[error("{0}")]
    Validation(String),
}

impl FeedError {
    /// Creates a Parse error from an underlying parser error.
    pub fn parse(err: impl fmt::Display) -> Self {
        FeedError::Parse(err.to_string())
    }

    /// Creates an Invalid error with a custom message.
    pub fn invalid(msg: impl Into<String>) -> Self {
        FeedError::Invalid(msg.into())
    }

    pub fn empty(msg: impl Into<String>) -> Self {
        FeedError::Empty(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        FeedError::Validation(msg.into())
    }

    /// Category of this error for user-facing reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedError::Parse(_) | FeedError::Invalid(_) => ErrorKind::Validation,
            FeedError::Empty(_) | FeedError::Validation(_) => ErrorKind::Validation,
        }
    }
}

/// Coarse error category shared by every tool.
///
/// Each library error exposes a `kind()` that lands in one of these buckets,
/// and the bucket decides which message the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connection failures, timeouts, refused hosts.
    Network,
    /// Bad user input: malformed files, missing fields, invalid URLs.
    Validation,
    /// A remote API answered with an error status.
    Api,
    Unknown,
}

impl ErrorKind {
    /// The message shown to the user for this category.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::Network => "Connection error. Check your internet connection.",
            ErrorKind::Validation => "Invalid data. Check your input.",
            ErrorKind::Api => "Server error. Please try again later.",
            ErrorKind::Unknown => "An unexpected error occurred.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Validation => "validation",
            ErrorKind::Api => "api",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_errors_are_validation_errors() {
        assert_eq!(FeedError::parse("bad xml").kind(), ErrorKind::Validation);
        assert_eq!(FeedError::empty("nothing").kind(), ErrorKind::Validation);
    }

    #[test]
    fn empty_error_displays_message_verbatim() {
        let err = FeedError::empty("FreshRSS file contains no items to migrate");
        assert_eq!(err.to_string(), "FreshRSS file contains no items to migrate");
    }

    #[test]
    fn user_messages_per_kind() {
        assert_eq!(
            ErrorKind::Network.user_message(),
            "Connection error. Check your internet connection."
        );
        assert_eq!(ErrorKind::Validation.user_message(), "Invalid data. Check your input.");
        assert_eq!(ErrorKind::Api.user_message(), "Server error. Please try again later.");
        assert_eq!(ErrorKind::Unknown.user_message(), "An unexpected error occurred.");
    }
}
