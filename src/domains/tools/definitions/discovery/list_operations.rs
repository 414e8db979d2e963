//! List operations tool definition.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::domains::tools::{ToolContext, ToolError};

/// Parameters for the list operations tool (none).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListOperationsParams {}

/// Lists every recognized (path, method) pair of the loaded spec.
pub struct ListOperationsTool;

impl ListOperationsTool {
    pub const NAME: &'static str = "list_operations";

    pub const DESCRIPTION: &'static str = "List all API operations (path and HTTP method) from the loaded specification, with summary, tags and full URL.";

    #[instrument(skip_all)]
    pub fn execute(_params: &ListOperationsParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let operations = ctx.with_index(|index| index.list_operations());
        info!("Listed {} operations", operations.len());

        Ok(json!({
            "total": operations.len(),
            "operations": operations,
        }))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ListOperationsParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
