//! Data model for a parsed API specification.
//!
//! The model is deliberately lenient: real-world OpenAPI and Swagger documents
//! are often incomplete, so missing sections default to empty and malformed
//! operation or parameter entries are skipped with a warning instead of
//! failing the whole document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::warn;

// ============================================================================
// HTTP Methods
// ============================================================================

/// HTTP verbs that may appear as keys of an OpenAPI path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Methods exposed as operations unless configured otherwise.
    pub const DEFAULT_RECOGNIZED: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    /// Parse a method name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "put" => Some(Self::Put),
            "post" => Some(Self::Post),
            "delete" => Some(Self::Delete),
            "options" => Some(Self::Options),
            "head" => Some(Self::Head),
            "patch" => Some(Self::Patch),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Post => Self::POST,
            HttpMethod::Delete => Self::DELETE,
            HttpMethod::Options => Self::OPTIONS,
            HttpMethod::Head => Self::HEAD,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Trace => Self::TRACE,
        }
    }
}

// ============================================================================
// Document
// ============================================================================

/// A parsed OpenAPI (or Swagger) document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiSpecification {
    #[serde(default, deserialize_with = "lenient::string")]
    pub openapi: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub swagger: Option<String>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub info: ApiInfo,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub servers: Vec<ServerEntry>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub paths: IndexMap<String, PathItem>,

    /// Document-wide security requirements.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub security: Vec<Value>,
}

impl ApiSpecification {
    /// The empty document used before the first successful load.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of declared path templates.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// The spec format marker, e.g. `openapi 3.0.3` or `swagger 2.0`.
    pub fn format_version(&self) -> Option<String> {
        self.openapi
            .as_ref()
            .map(|v| format!("openapi {v}"))
            .or_else(|| self.swagger.as_ref().map(|v| format!("swagger {v}")))
    }

    /// Iterate over all operations whose method is in `recognized`, in
    /// document order.
    pub fn operations<'a>(
        &'a self,
        recognized: &'a [HttpMethod],
    ) -> impl Iterator<Item = (&'a str, &'a PathItem, HttpMethod, &'a OperationDescriptor)> + 'a
    {
        self.paths.iter().flat_map(move |(path, item)| {
            item.operations
                .iter()
                .filter(move |(method, _)| recognized.contains(method))
                .map(move |(method, op)| (path.as_str(), item, *method, op))
        })
    }
}

/// The `info` block of a spec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub version: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
}

/// One entry of the `servers` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
}

// ============================================================================
// Paths and Operations
// ============================================================================

/// A path item: shared parameters plus one operation per HTTP verb.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Option<IndexMap<String, Value>>")]
pub struct PathItem {
    /// Parameters declared at path level, shared by all operations.
    pub parameters: Vec<ParameterDescriptor>,

    /// Operations keyed by HTTP verb, in document order.
    pub operations: IndexMap<HttpMethod, OperationDescriptor>,
}

impl From<Option<IndexMap<String, Value>>> for PathItem {
    fn from(raw: Option<IndexMap<String, Value>>) -> Self {
        let mut item = PathItem::default();

        for (key, value) in raw.unwrap_or_default() {
            if key == "parameters" {
                item.parameters = lenient::parameter_list(value);
                continue;
            }

            // summary, servers, $ref and x-* extensions carry no operation
            let Some(method) = HttpMethod::parse(&key) else {
                continue;
            };

            match serde_json::from_value::<OperationDescriptor>(value) {
                Ok(op) => {
                    item.operations.insert(method, op);
                }
                Err(e) => warn!("Skipping malformed '{}' operation entry: {}", key, e),
            }
        }

        item
    }
}

impl PathItem {
    /// Look up an operation by method name, ignoring case.
    pub fn operation(&self, method: &str) -> Option<(HttpMethod, &OperationDescriptor)> {
        let method = HttpMethod::parse(method)?;
        self.operations.get(&method).map(|op| (method, op))
    }

    /// Path-level parameters merged with the operation's own; operation-level
    /// entries win on (name, location).
    pub fn effective_parameters(&self, op: &OperationDescriptor) -> Vec<ParameterDescriptor> {
        let mut merged: Vec<ParameterDescriptor> = self
            .parameters
            .iter()
            .filter(|shared| {
                !op.parameters
                    .iter()
                    .any(|p| p.name == shared.name && p.location == shared.location)
            })
            .cloned()
            .collect();
        merged.extend(op.parameters.iter().cloned());
        merged
    }
}

/// One HTTP-method entry under a path.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    #[serde(default, deserialize_with = "lenient::string")]
    pub operation_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "lenient::parameters")]
    pub parameters: Vec<ParameterDescriptor>,

    #[serde(default)]
    pub request_body: Option<RequestBodyDescriptor>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub responses: IndexMap<String, ResponseDescriptor>,

    /// Operation-level security; `None` means the document default applies.
    #[serde(default)]
    pub security: Option<Vec<Value>>,
}

impl OperationDescriptor {
    /// Summary or an empty string.
    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or_default()
    }

    /// Description or an empty string.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Whether a request body is declared.
    pub fn has_request_body(&self) -> bool {
        self.request_body.is_some()
    }

    /// Declared response status codes in document order.
    pub fn status_codes(&self) -> Vec<String> {
        self.responses.keys().cloned().collect()
    }
}

/// Where a parameter is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    /// Swagger 2 body parameter.
    Body,
    /// Swagger 2 form field.
    FormData,
}

/// A single operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(default)]
    pub required: bool,

    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    /// Swagger 2 inline type, used when no schema is given.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
}

impl ParameterDescriptor {
    /// The parameter schema, falling back to the Swagger 2 inline type.
    pub fn effective_schema(&self) -> Option<Value> {
        self.schema.clone().or_else(|| {
            self.param_type
                .as_ref()
                .map(|t| serde_json::json!({ "type": t }))
        })
    }
}

/// The `requestBody` of an operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBodyDescriptor {
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub content: IndexMap<String, ContentDescriptor>,
}

/// One declared response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Option<RawResponse>")]
pub struct ResponseDescriptor {
    pub description: Option<String>,
    pub content: IndexMap<String, ContentDescriptor>,
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default, deserialize_with = "lenient::string")]
    description: Option<String>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    content: IndexMap<String, ContentDescriptor>,
}

impl From<Option<RawResponse>> for ResponseDescriptor {
    fn from(raw: Option<RawResponse>) -> Self {
        raw.map(|r| Self {
            description: r.description,
            content: r.content,
        })
        .unwrap_or_default()
    }
}

/// Schema and examples for one content type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDescriptor {
    #[serde(default)]
    pub schema: Option<Value>,

    #[serde(default)]
    pub example: Option<Value>,

    #[serde(default)]
    pub examples: Option<Value>,
}

// ============================================================================
// Lenient deserializers
// ============================================================================

mod lenient {
    use super::ParameterDescriptor;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    /// Treat an explicit `null` the same as a missing field.
    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Accept any scalar as a string (YAML happily turns `1.0` into a number).
    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar_to_string(Value::deserialize(deserializer)?))
    }

    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items.into_iter().filter_map(scalar_to_string).collect(),
            other => scalar_to_string(other).into_iter().collect(),
        })
    }

    pub fn parameters<'de, D>(deserializer: D) -> Result<Vec<ParameterDescriptor>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(parameter_list(Value::deserialize(deserializer)?))
    }

    /// Parse a parameter array, skipping entries that do not fit (e.g. `$ref`).
    pub fn parameter_list(value: Value) -> Vec<ParameterDescriptor> {
        let Value::Array(items) = value else {
            return Vec::new();
        };

        items
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<ParameterDescriptor>(raw) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!("Skipping unsupported parameter entry: {}", e);
                    None
                }
            })
            .collect()
    }

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Parse a raw YAML/JSON document into an [`ApiSpecification`].
///
/// YAML mappings may use non-string keys (`200:` for response codes), so the
/// document is first read as generic YAML and normalized through JSON.
pub fn parse_document(content: &str) -> Result<ApiSpecification, DocumentError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    if !yaml.is_mapping() {
        return Err(DocumentError::NotAMapping);
    }

    let json = serde_json::to_value(yaml)?;
    Ok(ApiSpecification::deserialize(json)?)
}

/// Why a document could not be turned into a spec.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("document root is not a mapping")]
    NotAMapping,

    #[error("unexpected document structure: {0}")]
    Shape(#[from] serde_json::Error),
}
