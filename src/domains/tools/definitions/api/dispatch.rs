//! Generic API call tool definition.
//!
//! Passthrough for endpoints that have no generated tool, or when the caller
//! wants full control over path, query, headers and body.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, instrument};

use crate::domains::api::DispatchRequest;
use crate::domains::spec::HttpMethod;
use crate::domains::tools::generated::query_values;
use crate::domains::tools::{ToolContext, ToolError};

/// Parameters for the dispatch tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DispatchParams {
    /// Path relative to the base URL with parameters filled in, e.g. "/users/42".
    pub path: String,

    /// HTTP method (GET, POST, PUT, DELETE, PATCH...). Defaults to GET.
    #[serde(default = "default_method")]
    pub method: String,

    /// Query parameters. Array values are sent as repeated keys.
    #[serde(default)]
    pub query: Option<BTreeMap<String, Value>>,

    /// Extra request headers.
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,

    /// JSON request body.
    #[serde(default)]
    pub body: Option<Value>,

    /// Send the session bearer token (default true).
    #[serde(default = "default_use_credential")]
    pub use_credential: bool,

    /// Per-call timeout in seconds, overriding the configured default.
    #[serde(default)]
    pub timeout_secs: Option<f64>,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_use_credential() -> bool {
    true
}

/// Calls any endpoint of the configured API.
pub struct DispatchTool;

impl DispatchTool {
    pub const NAME: &'static str = "dispatch";

    pub const DESCRIPTION: &'static str = "Call any endpoint of the API at the current base URL. The bearer token is sent automatically unless use_credential is false. Returns status, headers and the parsed body.";

    #[instrument(skip_all, fields(method = %params.method, path = %params.path))]
    pub async fn execute(params: &DispatchParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let request = Self::build_request(params)?;
        let result = ctx.dispatcher.dispatch(request).await;
        info!("dispatch finished with status {}", result.status_code);
        Ok(result.to_value())
    }

    fn build_request(params: &DispatchParams) -> Result<DispatchRequest, ToolError> {
        let method = HttpMethod::parse(&params.method).ok_or_else(|| {
            ToolError::invalid_arguments(
                "method",
                format!("unsupported HTTP method '{}'", params.method),
            )
        })?;

        let path = params.path.trim();
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        let mut request = DispatchRequest::new(method.into(), path);

        for (name, value) in params.query.iter().flatten() {
            for text in query_values(value) {
                request = request.with_query(name.clone(), text);
            }
        }
        for (name, value) in params.headers.iter().flatten() {
            request = request.with_header(name.clone(), value.clone());
        }
        if let Some(body) = params.body.clone() {
            request = request.with_json_body(body);
        }
        if !params.use_credential {
            request = request.without_credential();
        }
        if let Some(secs) = params.timeout_secs {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ToolError::invalid_arguments(
                    "timeout_secs",
                    "must be a positive number of seconds",
                ));
            }
            let timeout = Duration::try_from_secs_f64(secs)
                .map_err(|e| ToolError::invalid_arguments("timeout_secs", e.to_string()))?;
            request = request.with_timeout(timeout);
        }

        Ok(request)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<DispatchParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_backend, unreachable_base, widgets_context};
    use serde_json::json;

    fn params(value: Value) -> DispatchParams {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_build_request() {
        let request = DispatchTool::build_request(&params(json!({
            "path": "users/7",
            "method": "delete",
            "query": { "ids": [1, 2], "q": "x y" },
            "use_credential": false
        })))
        .unwrap();

        assert_eq!(request.path, "/users/7");
        assert_eq!(request.method, reqwest::Method::DELETE);
        assert_eq!(request.query.len(), 3);
        assert!(!request.use_credential);

        let err = DispatchTool::build_request(&params(json!({ "path": "/", "method": "BREW" })))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { ref field, .. } if field == "method"));

        let err =
            DispatchTool::build_request(&params(json!({ "path": "/", "timeout_secs": 0 })))
                .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { ref field, .. } if field == "timeout_secs"));
    }

    #[test]
    fn test_oversized_timeout_is_rejected() {
        let err =
            DispatchTool::build_request(&params(json!({ "path": "/x", "timeout_secs": 1e300 })))
                .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { ref field, .. } if field == "timeout_secs"));

        let request =
            DispatchTool::build_request(&params(json!({ "path": "/x", "timeout_secs": 2.5 })))
                .unwrap();
        assert_eq!(request.timeout, Some(Duration::from_millis(2500)));
    }

    #[tokio::test]
    async fn test_dispatch_sends_token() {
        let base = spawn_backend().await;
        let (ctx, _spec) = widgets_context(&base).await;
        ctx.session.set_bearer_token("a.b.c").unwrap();

        let result = DispatchTool::execute(
            &params(json!({
                "path": "/orders",
                "method": "POST",
                "headers": { "Authorization": "Basic other", "X-Trace": "t-1" },
                "body": { "qty": 2 }
            })),
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(result["status_code"], 200);
        assert_eq!(result["success"], true);
        let echoed = &result["body"]["value"];
        assert_eq!(echoed["authorization"], "Bearer a.b.c");
        assert_eq!(echoed["x_trace"], "t-1");
        assert_eq!(echoed["body"], json!({ "qty": 2 }));
    }

    #[tokio::test]
    async fn test_dispatch_unreachable_is_not_an_error() {
        let (ctx, _spec) = widgets_context(&unreachable_base()).await;

        let result = DispatchTool::execute(&params(json!({ "path": "/x" })), &ctx)
            .await
            .unwrap();
        assert_eq!(result["status_code"], 0);
        assert_eq!(result["success"], false);
        assert!(!result["error"].as_str().unwrap().is_empty());
    }
}
