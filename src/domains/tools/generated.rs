//! Tools generated from the operations of the loaded spec.
//!
//! Each recognized (path, method) pair becomes one [`OperationBinding`]: a
//! fixed path template and method plus a plan saying where every argument
//! goes. The whole table is rebuilt, never patched, when a new spec loads.

use indexmap::IndexMap;
use rmcp::model::{JsonObject, Tool};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use super::arguments::{check_against_schema, json_type};
use super::error::ToolError;
use crate::domains::api::DispatchRequest;
use crate::domains::spec::model::{ContentDescriptor, ParameterDescriptor, PathItem};
use crate::domains::spec::{HttpMethod, LoadedSpec, OperationDescriptor, ParameterLocation};

/// Maximum length of a tool name.
pub const MAX_TOOL_NAME_LEN: usize = 64;

// ============================================================================
// Bindings
// ============================================================================

/// Where one declared parameter is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
}

/// One spec operation exposed as a tool.
#[derive(Debug, Clone)]
pub struct OperationBinding {
    pub name: String,
    pub path: String,
    pub method: HttpMethod,
    pub description: String,
    pub parameters: Vec<BoundParameter>,
    /// Argument name carrying the JSON request body, when one is declared.
    pub body_field: Option<String>,
    input_schema: Arc<JsonObject>,
}

impl OperationBinding {
    fn new(name: String, path: &str, item: &PathItem, method: HttpMethod, op: &OperationDescriptor) -> Self {
        let mut properties = Map::new();
        let mut required = Vec::new();
        let mut parameters = Vec::new();
        let mut body: Option<(Value, bool)> = None;

        for param in item.effective_parameters(op) {
            match param.location {
                ParameterLocation::Path | ParameterLocation::Query | ParameterLocation::Header => {
                    // Path parameters are always required.
                    let is_required = param.required || param.location == ParameterLocation::Path;
                    properties.insert(param.name.clone(), parameter_schema(&param));
                    if is_required {
                        required.push(param.name.clone());
                    }
                    parameters.push(BoundParameter {
                        name: param.name,
                        location: param.location,
                        required: is_required,
                    });
                }
                ParameterLocation::Body => {
                    let schema = param.schema.clone().unwrap_or_else(|| json!({}));
                    body = Some((schema, param.required));
                }
                ParameterLocation::Cookie | ParameterLocation::FormData => {
                    debug!(
                        "Parameter '{}' of {} {} is not exposed ({:?})",
                        param.name, method, path, param.location
                    );
                }
            }
        }

        if let Some(request_body) = &op.request_body {
            let mut schema = request_body_schema(&request_body.content);
            if let (Some(description), Value::Object(map)) = (&request_body.description, &mut schema) {
                map.entry("description")
                    .or_insert_with(|| Value::String(description.clone()));
            }
            body = Some((schema, request_body.required));
        }

        let body_field = body.map(|(schema, is_required)| {
            let field = if properties.contains_key("body") {
                "request_body".to_string()
            } else {
                "body".to_string()
            };
            properties.insert(field.clone(), schema);
            if is_required {
                required.push(field.clone());
            }
            field
        });

        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), json!(required));
        }

        Self {
            name,
            path: path.to_string(),
            method,
            description: tool_description(path, method, op),
            parameters,
            body_field,
            input_schema: Arc::new(schema),
        }
    }

    /// Tool metadata for listing.
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone().into(),
            description: Some(self.description.clone().into()),
            input_schema: self.input_schema.clone(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// The input schema arguments are checked against.
    pub fn input_schema(&self) -> &JsonObject {
        &self.input_schema
    }

    /// Route `arguments` into a request for this operation.
    pub fn build_request(&self, arguments: &JsonObject) -> Result<DispatchRequest, ToolError> {
        check_against_schema(&self.input_schema, arguments)?;

        let mut path = self.path.clone();
        let mut request = DispatchRequest::new(self.method.into(), String::new());

        for param in &self.parameters {
            let Some(value) = arguments.get(&param.name).filter(|v| !v.is_null()) else {
                continue;
            };

            match param.location {
                ParameterLocation::Path => {
                    let text = scalar_text(&param.name, value)?;
                    path = path.replace(
                        &format!("{{{}}}", param.name),
                        &urlencoding::encode(&text),
                    );
                }
                ParameterLocation::Query => {
                    for text in query_values(value) {
                        request = request.with_query(param.name.clone(), text);
                    }
                }
                ParameterLocation::Header => {
                    let text = scalar_text(&param.name, value)?;
                    request = request.with_header(param.name.clone(), text);
                }
                _ => {}
            }
        }

        if let Some(field) = &self.body_field {
            if let Some(body) = arguments.get(field).filter(|v| !v.is_null()) {
                request = request.with_json_body(body.clone());
            }
        }

        request.path = path;
        Ok(request)
    }
}

// ============================================================================
// Binding Table
// ============================================================================

/// All generated bindings for one spec snapshot.
#[derive(Debug)]
pub struct GeneratedTools {
    source: Arc<LoadedSpec>,
    bindings: IndexMap<String, OperationBinding>,
}

impl GeneratedTools {
    /// Bind every recognized operation of `source`. Names in `reserved`
    /// (the static tools) are never reused.
    pub fn build(source: Arc<LoadedSpec>, recognized: &[HttpMethod], reserved: &[&str]) -> Self {
        let mut taken: HashSet<String> = reserved.iter().map(|n| n.to_string()).collect();
        let mut bindings = IndexMap::new();

        for (path, item, method, op) in source.spec.operations(recognized) {
            let base = base_tool_name(method, path, op);
            let name = reserve_unique_tool_name(&mut taken, &base);
            let binding = OperationBinding::new(name.clone(), path, item, method, op);
            bindings.insert(name, binding);
        }

        debug!("Generated {} operation tools", bindings.len());
        Self { source, bindings }
    }

    /// Whether this table was built from exactly `spec`.
    pub fn is_built_from(&self, spec: &Arc<LoadedSpec>) -> bool {
        Arc::ptr_eq(&self.source, spec)
    }

    pub fn get(&self, name: &str) -> Option<&OperationBinding> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationBinding> {
        self.bindings.values()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Sanitized operationId when present, else the canonical method/path name.
fn base_tool_name(method: HttpMethod, path: &str, op: &OperationDescriptor) -> String {
    op.operation_id
        .as_deref()
        .map(sanitize_operation_id)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| canonical_name(method, path))
}

/// Keep ASCII alphanumerics, `_` and `-`; replace anything else with `_`.
fn sanitize_operation_id(operation_id: &str) -> String {
    let sanitized: String = operation_id
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    truncate(sanitized.trim_matches('_'))
}

/// `{method}_{path}`: lowercase alphanumerics separated by single underscores.
fn canonical_name(method: HttpMethod, path: &str) -> String {
    let raw = format!("{}_{}", method.as_str(), path).to_ascii_lowercase();
    let mut name = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c);
        } else if !name.ends_with('_') {
            name.push('_');
        }
    }
    truncate(name.trim_matches('_'))
}

fn truncate(name: &str) -> String {
    name.chars().take(MAX_TOOL_NAME_LEN).collect()
}

/// `base`, or `base_1`, `base_2`... when already taken; the suffix replaces
/// trailing characters when the name would exceed the length cap.
fn reserve_unique_tool_name(taken: &mut HashSet<String>, base: &str) -> String {
    if taken.insert(base.to_string()) {
        return base.to_string();
    }

    let mut counter = 1;
    loop {
        let suffix = format!("_{counter}");
        let keep = MAX_TOOL_NAME_LEN.saturating_sub(suffix.len());
        let candidate = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

fn tool_description(path: &str, method: HttpMethod, op: &OperationDescriptor) -> String {
    let mut description = format!("{method} {path}");
    let summary = op.summary_text().trim();
    let details = op.description_text().trim();

    if !summary.is_empty() {
        description.push_str(": ");
        description.push_str(summary);
    }
    if !details.is_empty() && details != summary {
        description.push_str("\n\n");
        description.push_str(details);
    }
    description
}

fn parameter_schema(param: &ParameterDescriptor) -> Value {
    let mut schema = param.effective_schema().unwrap_or_else(|| json!({}));
    if let (Some(description), Value::Object(map)) = (&param.description, &mut schema) {
        map.entry("description")
            .or_insert_with(|| Value::String(description.clone()));
    }
    schema
}

/// The JSON media type schema when declared, else the first one.
fn request_body_schema(content: &IndexMap<String, ContentDescriptor>) -> Value {
    content
        .iter()
        .find(|(media_type, _)| media_type.contains("json"))
        .or_else(|| content.first())
        .and_then(|(_, media)| media.schema.clone())
        .unwrap_or_else(|| json!({}))
}

fn scalar_text(field: &str, value: &Value) -> Result<String, ToolError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ToolError::invalid_arguments(
            field,
            format!("expected a scalar value, got {}", json_type(other)),
        )),
    }
}

/// Arrays become repeated query keys; objects are sent as JSON text.
pub fn query_values(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(query_values).collect(),
        other => vec![other.to_string()],
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::spec::model::parse_document;
    use reqwest::Method;

    const SPEC: &str = r#"
openapi: 3.0.0
info: { title: Widgets, version: "1" }
paths:
  /widgets:
    get:
      operationId: listWidgets
      summary: List widgets
      parameters:
        - { name: tag, in: query, schema: { type: array, items: { type: string } } }
        - { name: X-Trace, in: header, schema: { type: string } }
    post:
      summary: Create widget
      requestBody:
        required: true
        content:
          application/json:
            schema: { type: object, properties: { name: { type: string } } }
  /widgets/{id}:
    parameters:
      - { name: id, in: path, schema: { type: string } }
    get:
      operationId: listWidgets
    options:
      summary: not recognized
  /list_operations:
    get:
      operationId: list_operations
"#;

    fn build() -> GeneratedTools {
        let spec = parse_document(SPEC).unwrap();
        let loaded = Arc::new(LoadedSpec {
            spec,
            source: Some("test".into()),
            loaded_at: None,
        });
        GeneratedTools::build(loaded, &HttpMethod::DEFAULT_RECOGNIZED, &["list_operations"])
    }

    fn object(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_names_are_unique_and_canonical() {
        let tools = build();
        let names: Vec<&str> = tools.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["listWidgets", "post_widgets", "listWidgets_1", "list_operations_1"]
        );
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name(HttpMethod::Get, "/a/{b}/c-d"), "get_a_b_c_d");
        assert_eq!(canonical_name(HttpMethod::Delete, "/"), "delete");
        let long = format!("/{}", "x".repeat(100));
        assert_eq!(canonical_name(HttpMethod::Get, &long).len(), MAX_TOOL_NAME_LEN);
    }

    #[test]
    fn test_suffix_respects_length_cap() {
        let base = "y".repeat(MAX_TOOL_NAME_LEN);
        let mut taken = HashSet::new();
        reserve_unique_tool_name(&mut taken, &base);
        let second = reserve_unique_tool_name(&mut taken, &base);
        assert_eq!(second.len(), MAX_TOOL_NAME_LEN);
        assert!(second.ends_with("_1"));
    }

    #[test]
    fn test_input_schema() {
        let tools = build();

        let list = tools.get("listWidgets").unwrap();
        let props = list.input_schema()["properties"].as_object().unwrap();
        assert!(props.contains_key("tag"));
        assert!(props.contains_key("X-Trace"));
        assert!(list.input_schema().get("required").is_none());

        let create = tools.get("post_widgets").unwrap();
        assert_eq!(create.body_field.as_deref(), Some("body"));
        assert_eq!(create.input_schema()["required"], json!(["body"]));

        let get = tools.get("listWidgets_1").unwrap();
        assert_eq!(get.input_schema()["required"], json!(["id"]));
    }

    #[test]
    fn test_build_request_routes_arguments() {
        let tools = build();

        let get = tools.get("listWidgets_1").unwrap();
        let request = get.build_request(&object(json!({ "id": "a b/c" }))).unwrap();
        assert_eq!(request.path, "/widgets/a%20b%2Fc");
        assert_eq!(request.method, Method::GET);

        let list = tools.get("listWidgets").unwrap();
        let request = list
            .build_request(&object(json!({ "tag": ["red", "blue"], "X-Trace": "t1" })))
            .unwrap();
        assert_eq!(request.path, "/widgets");
        assert_eq!(
            request.query,
            vec![
                ("tag".to_string(), "red".to_string()),
                ("tag".to_string(), "blue".to_string())
            ]
        );
        assert_eq!(request.headers.get("X-Trace").map(String::as_str), Some("t1"));

        let create = tools.get("post_widgets").unwrap();
        let request = create
            .build_request(&object(json!({ "body": { "name": "w" } })))
            .unwrap();
        assert_eq!(request.json_body, Some(json!({ "name": "w" })));
    }

    #[test]
    fn test_build_request_rejects_bad_arguments() {
        let tools = build();
        let get = tools.get("listWidgets_1").unwrap();

        let err = get.build_request(&JsonObject::new()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { ref field, .. } if field == "id"));

        let err = get.build_request(&object(json!({ "id": 5 }))).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { ref field, .. } if field == "id"));
    }

    #[test]
    fn test_swagger2_body_parameter() {
        let spec = parse_document(
            r#"
swagger: "2.0"
paths:
  /pets:
    post:
      parameters:
        - { name: body, in: body, required: true, schema: { type: object } }
        - { name: dryRun, in: query, type: boolean }
"#,
        )
        .unwrap();
        let loaded = Arc::new(LoadedSpec {
            spec,
            ..Default::default()
        });
        let tools = GeneratedTools::build(loaded, &HttpMethod::DEFAULT_RECOGNIZED, &[]);
        let binding = tools.get("post_pets").unwrap();
        assert_eq!(binding.body_field.as_deref(), Some("body"));
        assert_eq!(binding.input_schema()["properties"]["dryRun"], json!({ "type": "boolean" }));
        assert_eq!(binding.input_schema()["required"], json!(["body"]));
    }
}
