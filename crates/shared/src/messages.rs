// ABOUTME: Severity of user-facing status messages.
// ABOUTME: Maps error kinds to the severity a tool should display them with.

use std::fmt;

use minitools_feed::ErrorKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

impl MessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Success => "success",
            MessageType::Error => "error",
            MessageType::Warning => "warning",
            MessageType::Info => "info",
        }
    }

    /// Prefix shown before a message of this type.
    pub fn symbol(self) -> &'static str {
        match self {
            MessageType::Success => "✓",
            MessageType::Error => "✗",
            MessageType::Warning => "!",
            MessageType::Info => "i",
        }
    }

    /// Validation problems are the user's to fix and shown as warnings.
    pub fn for_error(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Validation => MessageType::Warning,
            _ => MessageType::Error,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
