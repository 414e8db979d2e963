//! Describe path tool definition.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::super::to_json;
use crate::domains::tools::{ToolContext, ToolError};

/// Parameters for the describe tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeParams {
    /// Path template exactly as written in the spec, e.g. "/users/{id}".
    pub path: String,
}

/// Describes every method declared under one path.
pub struct DescribeTool;

impl DescribeTool {
    pub const NAME: &'static str = "describe";

    pub const DESCRIPTION: &'static str = "Describe one API path: summary, description, tags, parameters, request body presence and response codes for each method.";

    #[instrument(skip_all, fields(path = %params.path))]
    pub fn execute(params: &DescribeParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let description = ctx.with_index(|index| index.describe(&params.path))?;
        to_json(&description)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<DescribeParams>(),
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

    #[tokio::test]
    async fn test_describe() {
        let (ctx, _spec) = widgets_context("http://api.test").await;

        let params = DescribeParams {
            path: "/widgets".to_string(),
        };
        let result = DescribeTool::execute(&params, &ctx).unwrap();
        assert_eq!(result["full_url"], "http://api.test/widgets");
        assert_eq!(result["methods"]["GET"]["summary"], "List widgets");

        let params = DescribeParams {
            path: "/gadgets".to_string(),
        };
        let err = DescribeTool::execute(&params, &ctx).unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
