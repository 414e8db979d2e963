//! Response examples tool definition.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::super::to_json;
use crate::domains::tools::{ToolContext, ToolError};

/// Parameters for the response examples tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ResponseExamplesParams {
    /// Path template exactly as written in the spec.
    pub path: String,

    /// HTTP method, case-insensitive.
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Declared response schemas and examples of one operation.
pub struct ResponseExamplesTool;

impl ResponseExamplesTool {
    pub const NAME: &'static str = "response_examples";

    pub const DESCRIPTION: &'static str = "Show the declared response schemas and examples of one operation, per status code and content type.";

    #[instrument(skip_all, fields(path = %params.path, method = %params.method))]
    pub fn execute(params: &ResponseExamplesParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let examples =
            ctx.with_index(|index| index.response_examples(&params.path, &params.method))?;
        to_json(&examples)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ResponseExamplesParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
