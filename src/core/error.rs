//! Error types and handling for the server.
//!
//! Only startup can fail with this type; tool failures are folded into
//! result envelopes by the registry and never reach it.

use thiserror::Error;

use crate::domains::session::SessionError;

/// A specialized Result type for server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons the server could not start.
#[derive(Debug, Error)]
pub enum Error {
    /// The initial base URL or bearer token was rejected.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The outbound HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A configuration value could not be used.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
