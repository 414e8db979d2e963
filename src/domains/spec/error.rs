//! Spec-specific error types.

use thiserror::Error;

/// Errors that can occur while loading an API specification.
#[derive(Debug, Error)]
pub enum SpecError {
    /// The source string is neither a readable path nor a usable URL.
    #[error("Invalid spec source '{source_ref}': {message}")]
    InvalidSource { source_ref: String, message: String },

    /// The spec file could not be read.
    #[error("Failed to read spec file '{path}': {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The spec URL could not be fetched.
    #[error("Failed to fetch spec from '{url}': {message}")]
    Fetch { url: String, message: String },

    /// The spec URL answered with a non-success status.
    #[error("Fetching spec from '{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The document is not a parsable YAML/JSON mapping.
    #[error("Failed to parse spec from '{location}': {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed but is not shaped like an API description.
    #[error("Unexpected spec structure in '{location}': {message}")]
    Shape { location: String, message: String },
}

impl SpecError {
    /// Create a new "invalid source" error.
    pub fn invalid_source(source_ref: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSource {
            source_ref: source_ref.into(),
            message: message.into(),
        }
    }

    /// Create a new "fetch" error.
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur when looking up endpoints in a loaded spec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The path template is not declared in the spec.
    #[error("Path '{0}' not found in API specification")]
    PathNotFound(String),

    /// The path exists but does not declare the requested method.
    #[error("Method '{method}' not found for path '{path}'")]
    MethodNotFound { path: String, method: String },
}

impl LookupError {
    /// Create a new "path not found" error.
    pub fn path_not_found(path: impl Into<String>) -> Self {
        Self::PathNotFound(path.into())
    }

    /// Create a new "method not found" error.
    pub fn method_not_found(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            path: path.into(),
            method: method.into(),
        }
    }
}
