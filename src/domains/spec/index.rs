//! Endpoint index - read-only queries over one spec snapshot.
//!
//! Every query is computed from a single [`ApiSpecification`] reference, so a
//! concurrent reload can never be observed half-way through a query.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use super::error::LookupError;
use super::model::{
    ApiInfo, ApiSpecification, ContentDescriptor, HttpMethod, OperationDescriptor,
    ParameterDescriptor, PathItem, RequestBodyDescriptor, ServerEntry,
};

// ============================================================================
// Query Results
// ============================================================================

/// One (path, method) pair as listed or searched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationSummary {
    pub path: String,
    pub method: HttpMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub summary: String,
    pub description: String,
    pub tags: Vec<String>,
    pub full_url: String,
}

/// Detail of one method under a described path.
#[derive(Debug, Clone, Serialize)]
pub struct MethodDetail {
    pub summary: String,
    pub description: String,
    pub tags: Vec<String>,
    pub parameters: Vec<ParameterDescriptor>,
    pub has_request_body: bool,
    pub responses: Vec<String>,
}

/// Result of [`EndpointIndex::describe`].
#[derive(Debug, Clone, Serialize)]
pub struct PathDescription {
    pub path: String,
    pub full_url: String,
    pub methods: IndexMap<HttpMethod, MethodDetail>,
}

/// Content declared for one response status.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseContent {
    pub description: String,
    pub content: IndexMap<String, ContentDescriptor>,
}

/// Result of [`EndpointIndex::response_examples`].
#[derive(Debug, Clone, Serialize)]
pub struct ResponseExamples {
    pub path: String,
    pub method: HttpMethod,
    pub responses: IndexMap<String, ResponseContent>,
    /// Bare examples keyed `"{status}_{contentType}"`.
    pub examples: IndexMap<String, Value>,
}

/// Result of [`EndpointIndex::response_structure`].
#[derive(Debug, Clone, Serialize)]
pub struct ResponseStructure {
    pub path: String,
    pub method: HttpMethod,
    pub summary: String,
    pub description: String,
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyDescriptor>,
    pub security: Vec<Value>,
    pub responses: IndexMap<String, ResponseContent>,
}

/// Result of [`EndpointIndex::base_info`].
#[derive(Debug, Clone, Serialize)]
pub struct BaseInfo {
    pub info: ApiInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub base_url: String,
    pub servers: Vec<ServerEntry>,
    pub available_tags: Vec<String>,
    pub total_paths: usize,
    pub total_operations: usize,
}

// ============================================================================
// Index
// ============================================================================

/// Queryable view over a spec snapshot.
pub struct EndpointIndex<'a> {
    spec: &'a ApiSpecification,
    base_url: &'a str,
    recognized: &'a [HttpMethod],
}

impl<'a> EndpointIndex<'a> {
    /// Create an index over `spec`, resolving URLs against `base_url` and
    /// exposing only `recognized` methods in listings.
    pub fn new(spec: &'a ApiSpecification, base_url: &'a str, recognized: &'a [HttpMethod]) -> Self {
        Self {
            spec,
            base_url,
            recognized,
        }
    }

    /// All recognized (path, method) pairs in document order.
    pub fn list_operations(&self) -> Vec<OperationSummary> {
        self.spec
            .operations(self.recognized)
            .map(|(path, _, method, op)| self.summarize(path, method, op))
            .collect()
    }

    /// Describe every recognized method under `path`.
    pub fn describe(&self, path: &str) -> Result<PathDescription, LookupError> {
        let item = self.path_item(path)?;

        let methods = item
            .operations
            .iter()
            .filter(|(method, _)| self.recognized.contains(method))
            .map(|(method, op)| {
                let detail = MethodDetail {
                    summary: op.summary_text().to_string(),
                    description: op.description_text().to_string(),
                    tags: unique_tags(op),
                    parameters: item.effective_parameters(op),
                    has_request_body: op.has_request_body(),
                    responses: op.status_codes(),
                };
                (*method, detail)
            })
            .collect();

        Ok(PathDescription {
            path: path.to_string(),
            full_url: self.full_url(path),
            methods,
        })
    }

    /// Case-insensitive substring search over path, summary, description and
    /// tags. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<OperationSummary> {
        let needle = query.trim().to_lowercase();

        self.spec
            .operations(self.recognized)
            .filter(|(path, _, _, op)| {
                if needle.is_empty() {
                    return true;
                }
                let haystack = format!(
                    "{} {} {} {}",
                    path,
                    op.summary_text(),
                    op.description_text(),
                    op.tags.join(" ")
                )
                .to_lowercase();
                haystack.contains(&needle)
            })
            .map(|(path, _, method, op)| self.summarize(path, method, op))
            .collect()
    }

    /// Declared responses and their examples for one operation.
    pub fn response_examples(
        &self,
        path: &str,
        method: &str,
    ) -> Result<ResponseExamples, LookupError> {
        let (method, op) = self.operation(path, method)?;

        let mut examples = IndexMap::new();
        for (status, response) in &op.responses {
            for (content_type, content) in &response.content {
                if let Some(example) = bare_example(content) {
                    examples.insert(format!("{status}_{content_type}"), example);
                }
            }
        }

        Ok(ResponseExamples {
            path: path.to_string(),
            method,
            responses: response_contents(op),
            examples,
        })
    }

    /// Full request/response structure of one operation.
    pub fn response_structure(
        &self,
        path: &str,
        method: &str,
    ) -> Result<ResponseStructure, LookupError> {
        let item = self.path_item(path)?;
        let (method, op) = self.operation(path, method)?;

        Ok(ResponseStructure {
            path: path.to_string(),
            method,
            summary: op.summary_text().to_string(),
            description: op.description_text().to_string(),
            parameters: item.effective_parameters(op),
            request_body: op.request_body.clone(),
            security: op
                .security
                .clone()
                .unwrap_or_else(|| self.spec.security.clone()),
            responses: response_contents(op),
        })
    }

    /// Spec info, base URL, tag set and counts.
    pub fn base_info(&self) -> BaseInfo {
        let tags: BTreeSet<String> = self
            .spec
            .operations(self.recognized)
            .flat_map(|(_, _, _, op)| op.tags.iter().cloned())
            .collect();

        BaseInfo {
            info: self.spec.info.clone(),
            format: self.spec.format_version(),
            base_url: self.base_url.to_string(),
            servers: self.spec.servers.clone(),
            available_tags: tags.into_iter().collect(),
            total_paths: self.spec.path_count(),
            total_operations: self.spec.operations(self.recognized).count(),
        }
    }

    /// Base URL joined with an unexpanded path template.
    pub fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn path_item(&self, path: &str) -> Result<&'a PathItem, LookupError> {
        self.spec
            .paths
            .get(path)
            .ok_or_else(|| LookupError::path_not_found(path))
    }

    fn operation(
        &self,
        path: &str,
        method: &str,
    ) -> Result<(HttpMethod, &'a OperationDescriptor), LookupError> {
        self.path_item(path)?
            .operation(method)
            .ok_or_else(|| LookupError::method_not_found(path, method.to_uppercase()))
    }

    fn summarize(&self, path: &str, method: HttpMethod, op: &OperationDescriptor) -> OperationSummary {
        OperationSummary {
            path: path.to_string(),
            method,
            operation_id: op.operation_id.clone(),
            summary: op.summary_text().to_string(),
            description: op.description_text().to_string(),
            tags: unique_tags(op),
            full_url: self.full_url(path),
        }
    }
}

fn unique_tags(op: &OperationDescriptor) -> Vec<String> {
    let mut seen = BTreeSet::new();
    op.tags
        .iter()
        .filter(|t| seen.insert(t.as_str()))
        .cloned()
        .collect()
}

fn response_contents(op: &OperationDescriptor) -> IndexMap<String, ResponseContent> {
    op.responses
        .iter()
        .map(|(status, response)| {
            let content = ResponseContent {
                description: response.description.clone().unwrap_or_default(),
                content: response.content.clone(),
            };
            (status.clone(), content)
        })
        .collect()
}

/// The inline `example`, or the named `examples` reduced to their values.
fn bare_example(content: &ContentDescriptor) -> Option<Value> {
    if let Some(example) = &content.example {
        return Some(example.clone());
    }

    let Some(Value::Object(named)) = &content.examples else {
        return None;
    };

    let values: Map<String, Value> = named
        .iter()
        .map(|(name, example)| {
            let value = example.get("value").cloned().unwrap_or_else(|| example.clone());
            (name.clone(), value)
        })
        .collect();

    (!values.is_empty()).then_some(Value::Object(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::spec::model::parse_document;
    use serde_json::json;

    const BASE: &str = "http://api.local";

    const SPEC: &str = r#"
openapi: 3.0.1
info: { title: Shop, version: "1" }
security:
  - bearerAuth: []
paths:
  /widgets:
    get:
      summary: List widgets
      tags: [widgets]
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema: { type: array }
              example: [{ id: 1 }]
    head:
      summary: Widget headers
  /auth/login:
    post:
      summary: Sign in
      description: Exchange credentials for a token
      tags: [auth, auth]
      requestBody:
        required: true
        content:
          application/json:
            schema: { type: object }
      responses:
        "200":
          description: token
          content:
            application/json:
              examples:
                ok:
                  value: { token: "a.b.c" }
        "401":
          description: bad credentials
      security: []
"#;

    fn index_over(spec: &ApiSpecification) -> EndpointIndex<'_> {
        EndpointIndex::new(spec, BASE, &HttpMethod::DEFAULT_RECOGNIZED)
    }

    #[test]
    fn test_list_operations_excludes_unrecognized() {
        let spec = parse_document(SPEC).unwrap();
        let ops = index_over(&spec).list_operations();

        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].path, "/widgets");
        assert_eq!(ops[0].method, HttpMethod::Get);
        assert_eq!(ops[0].summary, "List widgets");
        assert_eq!(ops[0].tags, vec!["widgets"]);
        assert_eq!(ops[0].full_url, "http://api.local/widgets");
        assert_eq!(ops[1].tags, vec!["auth"]);
    }

    #[test]
    fn test_describe() {
        let spec = parse_document(SPEC).unwrap();
        let index = index_over(&spec);

        let desc = index.describe("/auth/login").unwrap();
        let post = &desc.methods[&HttpMethod::Post];
        assert!(post.has_request_body);
        assert_eq!(post.responses, vec!["200", "401"]);

        let widgets = index.describe("/widgets").unwrap();
        assert_eq!(widgets.methods.len(), 1);

        assert_eq!(
            index.describe("/nope").unwrap_err(),
            LookupError::path_not_found("/nope")
        );
    }

    #[test]
    fn test_search() {
        let spec = parse_document(SPEC).unwrap();
        let index = index_over(&spec);

        let hits = index.search("LOGIN");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, "/auth/login");

        assert_eq!(index.search("credentials").len(), 1);
        assert_eq!(index.search("widgets").len(), 1);
        assert_eq!(index.search("").len(), index.list_operations().len());
        assert!(index.search("nothing-matches").is_empty());
    }

    #[test]
    fn test_search_is_subset_of_listing() {
        let spec = parse_document(SPEC).unwrap();
        let index = index_over(&spec);
        let all = index.list_operations();
        for hit in index.search("a") {
            assert!(all.contains(&hit));
        }
    }

    #[test]
    fn test_response_examples() {
        let spec = parse_document(SPEC).unwrap();
        let index = index_over(&spec);

        let widgets = index.response_examples("/widgets", "get").unwrap();
        assert_eq!(
            widgets.examples["200_application/json"],
            json!([{ "id": 1 }])
        );

        let login = index.response_examples("/auth/login", "POST").unwrap();
        assert_eq!(
            login.examples["200_application/json"],
            json!({ "ok": { "token": "a.b.c" } })
        );
        assert_eq!(login.responses["401"].description, "bad credentials");
    }

    #[test]
    fn test_response_lookup_errors() {
        let spec = parse_document(SPEC).unwrap();
        let index = index_over(&spec);

        assert!(matches!(
            index.response_examples("/missing", "get"),
            Err(LookupError::PathNotFound(_))
        ));
        assert_eq!(
            index.response_structure("/widgets", "delete").unwrap_err(),
            LookupError::method_not_found("/widgets", "DELETE")
        );
    }

    #[test]
    fn test_response_structure_security() {
        let spec = parse_document(SPEC).unwrap();
        let index = index_over(&spec);

        let widgets = index.response_structure("/widgets", "GET").unwrap();
        assert_eq!(widgets.security, vec![json!({ "bearerAuth": [] })]);

        let login = index.response_structure("/auth/login", "post").unwrap();
        assert!(login.security.is_empty());
        assert!(login.request_body.unwrap().required);
    }

    #[test]
    fn test_base_info() {
        let spec = parse_document(SPEC).unwrap();
        let info = index_over(&spec).base_info();

        assert_eq!(info.info.title.as_deref(), Some("Shop"));
        assert_eq!(info.available_tags, vec!["auth", "widgets"]);
        assert_eq!(info.total_paths, 2);
        assert_eq!(info.total_operations, 2);
        assert_eq!(info.base_url, BASE);
    }
}
