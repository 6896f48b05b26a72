// ABOUTME: Feedbin account credentials and their local validation.
// ABOUTME: Email shape and password presence are checked before any request.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FeedbinError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

// Keeps the password out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FeedbinError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(FeedbinError::invalid("Email required"));
        }
        if !is_valid_email(email) {
            return Err(FeedbinError::invalid("Please enter a valid email address"));
        }
        if self.password.is_empty() {
            return Err(FeedbinError::invalid("Password is required"));
        }
        Ok(())
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
