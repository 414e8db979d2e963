//! Login tool definition.
//!
//! Optional convenience for backends exposing `POST /api/auth/login` that
//! answer `{"data": {"token", "user"}}`.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::super::to_json;
use crate::domains::tools::{ToolContext, ToolError};

/// Parameters for the login tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LoginParams {
    /// Account email.
    pub email: String,

    /// Account password.
    pub password: String,
}

/// Logs in and stores the returned bearer token.
pub struct LoginTool;

impl LoginTool {
    pub const NAME: &'static str = "login";

    pub const DESCRIPTION: &'static str = "Log in via POST /api/auth/login with email and password and store the returned data.token as the bearer token. Only for backends using that response shape.";

    #[instrument(skip_all, fields(email = %params.email))]
    pub async fn execute(params: &LoginParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let outcome = ctx.dispatcher.login(&params.email, &params.password).await;
        to_json(&outcome)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LoginParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
