//! The uniform result envelope of a live API call.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Response body, tagged by how it was interpreted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ResponseBody {
    /// The body parsed as JSON.
    Json(Value),
    /// The body did not parse as JSON and is returned verbatim.
    Text(String),
    /// No body bytes were received.
    Empty,
}

impl ResponseBody {
    /// Interpret raw bytes: JSON when possible, text otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::Empty;
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(json) => Self::Json(json),
            Err(_) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// The parsed JSON, if any.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Outcome of one dispatched request, success or failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    /// HTTP status, or 0 when the request never reached the network.
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: ResponseBody,
    /// Fully resolved request URL, query included.
    pub url: String,
    pub method: String,
    /// True for 2xx statuses.
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl ToolResult {
    /// Envelope for a call that could not be completed.
    pub fn failure(
        method: impl Into<String>,
        url: impl Into<String>,
        error: impl Into<String>,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            status_code: 0,
            headers: BTreeMap::new(),
            body: ResponseBody::Empty,
            url: url.into(),
            method: method.into(),
            success: false,
            error: Some(error.into()),
            elapsed_ms,
        }
    }

    /// Serialize for the tool boundary.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "error": format!("Failed to serialize result: {e}") })
        })
    }
}
