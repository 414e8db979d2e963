//! Response structure tool definition.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::super::to_json;
use crate::domains::tools::{ToolContext, ToolError};

/// Parameters for the response structure tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ResponseStructureParams {
    /// Path template exactly as written in the spec.
    pub path: String,

    /// HTTP method, case-insensitive.
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Full request/response contract of one operation.
pub struct ResponseStructureTool;

impl ResponseStructureTool {
    pub const NAME: &'static str = "response_structure";

    pub const DESCRIPTION: &'static str = "Show the full contract of one operation: parameters, request body, security requirements and responses.";

    #[instrument(skip_all, fields(path = %params.path, method = %params.method))]
    pub fn execute(params: &ResponseStructureParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let structure =
            ctx.with_index(|index| index.response_structure(&params.path, &params.method))?;
        to_json(&structure)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ResponseStructureParams>(),
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
    use crate::test_support::widgets_context;
    use serde_json::json;

    #[tokio::test]
    async fn test_structure_uses_document_security() {
        let (ctx, _spec) = widgets_context("http://api.test").await;

        let params = ResponseStructureParams {
            path: "/widgets".to_string(),
            method: "GET".to_string(),
        };
        let result = ResponseStructureTool::execute(&params, &ctx).unwrap();
        assert_eq!(result["security"], json!([{ "bearerAuth": [] }]));
        assert_eq!(result["parameters"][0]["name"], "limit");

        let params = ResponseStructureParams {
            path: "/nope".to_string(),
            method: "GET".to_string(),
        };
        let err = ResponseStructureTool::execute(&params, &ctx).unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
