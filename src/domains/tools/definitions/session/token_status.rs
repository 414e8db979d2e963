//! Token status tool definition.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::super::to_json;
use crate::domains::tools::{ToolContext, ToolError};

/// Parameters for the token status tool (none).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct TokenStatusParams {}

/// Reports whether a credential is set.
pub struct TokenStatusTool;

impl TokenStatusTool {
    pub const NAME: &'static str = "token_status";

    pub const DESCRIPTION: &'static str = "Report whether a bearer token is set, with a redacted preview.";

    pub fn execute(_params: &TokenStatusParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        to_json(&ctx.session.token_status())
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<TokenStatusParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
