//! Tool-specific error types.

use serde_json::{Value, json};
use thiserror::Error;

use crate::domains::session::SessionError;
use crate::domains::spec::{LookupError, SpecError};

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool is not registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments do not match the tool's input schema.
    #[error("Invalid argument '{field}': {message}")]
    InvalidArguments { field: String, message: String },

    /// The spec document could not be loaded.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// A path or method is absent from the loaded spec.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A session setter rejected its input.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "invalid arguments" error for `field`.
    pub fn invalid_arguments(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable snake_case tag for the failure envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "unknown_tool",
            Self::InvalidArguments { .. } => "invalid_arguments",
            Self::Spec(_) => "spec_load",
            Self::Lookup(LookupError::PathNotFound(_)) => "not_found",
            Self::Lookup(LookupError::MethodNotFound { .. }) => "method_not_found",
            Self::Session(_) => "validation",
            Self::Internal(_) => "internal",
        }
    }

    /// The failure envelope returned to callers instead of a protocol fault.
    pub fn to_envelope(&self) -> Value {
        let mut envelope = json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        if let Self::InvalidArguments { field, .. } = self {
            envelope["field"] = Value::String(field.clone());
        }
        envelope
    }
}
