//! Search operations tool definition.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::domains::tools::{ToolContext, ToolError};

/// Parameters for the search tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Case-insensitive text matched against path, summary, description and tags.
    pub query: String,
}

/// Free-text search over operations.
pub struct SearchTool;

impl SearchTool {
    pub const NAME: &'static str = "search";

    pub const DESCRIPTION: &'static str = "Search API operations by keyword (case-insensitive) in path, summary, description and tags.";

    #[instrument(skip_all, fields(query = %params.query))]
    pub fn execute(params: &SearchParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let matches = ctx.with_index(|index| index.search(&params.query));
        debug!("{} operations match", matches.len());

        Ok(json!({
            "query": params.query,
            "total": matches.len(),
            "operations": matches,
        }))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SearchParams>(),
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
    async fn test_search_is_case_insensitive() {
        let (ctx, _spec) = widgets_context("http://api.test").await;

        let hit = SearchParams {
            query: "WIDG".to_string(),
        };
        assert_eq!(SearchTool::execute(&hit, &ctx).unwrap()["total"], 1);

        let miss = SearchParams {
            query: "login".to_string(),
        };
        assert_eq!(SearchTool::execute(&miss, &ctx).unwrap()["total"], 0);
    }
}
