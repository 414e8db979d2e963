//! Tool definitions module.
//!
//! One file per static tool, grouped by what they touch. Each tool exposes
//! `NAME`, `DESCRIPTION`, a `JsonSchema` params struct, `execute()` and
//! `to_tool()`.

pub mod api;
pub mod discovery;
pub mod session;
pub mod spec;

pub use api::{DispatchParams, DispatchTool, LoginParams, LoginTool};
pub use discovery::{
    BaseInfoParams, BaseInfoTool, DescribeParams, DescribeTool, ListOperationsParams,
    ListOperationsTool, ResponseExamplesParams, ResponseExamplesTool, ResponseStructureParams,
    ResponseStructureTool, SearchParams, SearchTool,
};
pub use session::{
    SetBaseUrlParams, SetBaseUrlTool, SetBearerTokenParams, SetBearerTokenTool, TokenStatusParams,
    TokenStatusTool,
};
pub use spec::{CurrentSpecInfoParams, CurrentSpecInfoTool, ReloadParams, ReloadTool};

use serde::Serialize;
use serde_json::Value;

use super::ToolError;

/// Serialize a tool result.
pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::internal(format!("Failed to serialize result: {e}")))
}
