//! Set bearer token tool definition.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domains::session::TokenUpdate;
use crate::domains::tools::{ToolContext, ToolError};

/// Parameters for the set bearer token tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetBearerTokenParams {
    /// JWT-shaped token (three dot-separated segments). An empty string clears the token.
    pub token: String,
}

/// Sets or clears the credential sent with live calls.
pub struct SetBearerTokenTool;

impl SetBearerTokenTool {
    pub const NAME: &'static str = "set_bearer_token";

    pub const DESCRIPTION: &'static str = "Set the bearer token sent as 'Authorization: Bearer <token>' on API calls. Pass an empty string to clear it.";

    // Not instrumented: the token must stay out of spans.
    pub fn execute(params: &SetBearerTokenParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        match ctx.session.set_bearer_token(&params.token)? {
            TokenUpdate::Set { preview } => Ok(json!({
                "success": true,
                "message": "Bearer token set",
                "token_preview": preview,
            })),
            TokenUpdate::Cleared => Ok(json!({
                "success": true,
                "message": "Bearer token cleared",
            })),
        }
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SetBearerTokenParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
