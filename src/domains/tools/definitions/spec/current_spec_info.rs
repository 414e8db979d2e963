//! Current spec info tool definition.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domains::tools::{ToolContext, ToolError};

/// Parameters for the current spec info tool (none).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CurrentSpecInfoParams {}

/// Identity of the active spec.
pub struct CurrentSpecInfoTool;

impl CurrentSpecInfoTool {
    pub const NAME: &'static str = "current_spec_info";

    pub const DESCRIPTION: &'static str = "Show which specification is loaded: source, load time, title, version and counts.";

    pub fn execute(_params: &CurrentSpecInfoParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let loaded = ctx.specs.current();
        let spec = &loaded.spec;

        Ok(json!({
            "loaded": !loaded.is_empty_default(),
            "source": loaded.source,
            "loaded_at": loaded.loaded_at,
            "title": spec.info.title,
            "version": spec.info.version,
            "format": spec.format_version(),
            "total_paths": spec.path_count(),
            "total_operations": spec.operations(ctx.recognized_methods()).count(),
            "base_url": ctx.session.base_url(),
        }))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<CurrentSpecInfoParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
