//! Set base URL tool definition.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::tools::{ToolContext, ToolError};

/// Parameters for the set base URL tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetBaseUrlParams {
    /// New base URL, e.g. "https://api.example.com". Must be http or https.
    pub url: String,
}

/// Points subsequent live calls at another base URL.
pub struct SetBaseUrlTool;

impl SetBaseUrlTool {
    pub const NAME: &'static str = "set_base_url";

    pub const DESCRIPTION: &'static str = "Change the base URL used for all subsequent API calls. Trailing slashes are removed.";

    #[instrument(skip_all, fields(url = %params.url))]
    pub fn execute(params: &SetBaseUrlParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let change = ctx.session.set_base_url(&params.url)?;

        Ok(json!({
            "success": true,
            "message": format!("Base URL changed to {}", change.current),
            "previous_base_url": change.previous,
            "base_url": change.current,
        }))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SetBaseUrlParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
