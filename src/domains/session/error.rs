//! Session-specific error types.

use thiserror::Error;

/// Errors raised when a session setter rejects its input. The session is
/// left unchanged whenever one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The base URL is not an absolute http(s) URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The bearer token does not look like a three-part token.
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),
}

impl SessionError {
    /// Create a new "invalid base URL" error.
    pub fn invalid_base_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a new "invalid token" error.
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken(reason.into())
    }
}
