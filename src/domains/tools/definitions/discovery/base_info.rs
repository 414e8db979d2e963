//! API base info tool definition.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::super::to_json;
use crate::domains::tools::{ToolContext, ToolError};

/// Parameters for the base info tool (none).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct BaseInfoParams {}

/// Overview of the loaded API.
pub struct BaseInfoTool;

impl BaseInfoTool {
    pub const NAME: &'static str = "base_info";

    pub const DESCRIPTION: &'static str = "Show general API information: title, version, current base URL, servers, available tags and path count.";

    pub fn execute(_params: &BaseInfoParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        to_json(&ctx.with_index(|index| index.base_info()))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<BaseInfoParams>(),
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
    async fn test_base_info() {
        let (ctx, _spec) = widgets_context("http://api.test").await;
        let result = BaseInfoTool::execute(&BaseInfoParams::default(), &ctx).unwrap();

        assert_eq!(result["available_tags"], json!(["widgets"]));
        assert_eq!(result["total_paths"], 1);
        assert_eq!(result["base_url"], "http://api.test");
        assert_eq!(result["info"]["title"], "Widget API");
    }
}
