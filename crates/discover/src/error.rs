// ABOUTME: Error types for feed discovery including the ErrorCode enum and DiscoverError struct.
// ABOUTME: Provides categorized errors with convenience constructors, boolean helpers and ErrorKind mapping.

use minitools_feed::ErrorKind;
use std::fmt;

/// Error codes representing different categories of discovery failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Fetch,
    Timeout,
    Ssrf,
    Status,
    Client,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Ssrf => "private network blocked",
            ErrorCode::Status => "unexpected HTTP status",
            ErrorCode::Client => "HTTP client setup failed",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for discovery operations.
#[derive(Debug, thiserror::Error)]
pub struct DiscoverError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for DiscoverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "discover: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl DiscoverError {
    fn with_code(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Fetch, url, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Timeout, url, op, source)
    }

    /// Create an SSRF error.
    pub fn ssrf(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Ssrf, url, op, source)
    }

    /// Create a Status error for a non-2xx response.
    pub fn status(url: impl Into<String>, op: impl Into<String>, status: u16) -> Self {
        Self::with_code(
            ErrorCode::Status,
            url,
            op,
            Some(anyhow::anyhow!("HTTP status {}", status)),
        )
    }

    /// Create a Client error.
    pub fn client(source: anyhow::Error) -> Self {
        Self::with_code(ErrorCode::Client, "", "Build", Some(source))
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is an SSRF error.
    pub fn is_ssrf(&self) -> bool {
        self.code == ErrorCode::Ssrf
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a Status error.
    pub fn is_status(&self) -> bool {
        self.code == ErrorCode::Status
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Category used for the user-facing message.
    pub fn kind(&self) -> ErrorKind {
        match self.code {
            ErrorCode::InvalidUrl | ErrorCode::Ssrf => ErrorKind::Validation,
            ErrorCode::Fetch | ErrorCode::Timeout => ErrorKind::Network,
            ErrorCode::Status => ErrorKind::Api,
            ErrorCode::Client => ErrorKind::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_url_and_source() {
        let err = DiscoverError::status("https://example.com/feed", "CheckFeed", 503);
        assert_eq!(
            err.to_string(),
            "discover: CheckFeed https://example.com/feed: unexpected HTTP status: HTTP status 503"
        );
        assert!(err.is_status());
        assert_eq!(err.kind(), ErrorKind::Api);
    }

    #[test]
    fn network_codes_map_to_network_kind() {
        assert_eq!(DiscoverError::timeout("u", "Fetch", None).kind(), ErrorKind::Network);
        assert_eq!(DiscoverError::fetch("u", "Fetch", None).kind(), ErrorKind::Network);
        assert_eq!(DiscoverError::ssrf("u", "Fetch", None).kind(), ErrorKind::Validation);
    }
}
