//! Reload spec tool definition.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::domains::tools::{ToolContext, ToolError};

/// Parameters for the reload tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ReloadParams {
    /// File path or http(s) URL of the spec. Defaults to the last loaded source.
    #[serde(default)]
    pub source: Option<String>,
}

/// Re-reads the spec document and swaps it in.
pub struct ReloadTool;

impl ReloadTool {
    pub const NAME: &'static str = "reload";

    pub const DESCRIPTION: &'static str = "Reload the API specification from a file path or URL (default: the current source). On failure the previous specification stays active.";

    #[instrument(skip_all)]
    pub async fn execute(params: &ReloadParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let source = params
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| ctx.default_spec_source());

        let loaded = ctx
            .specs
            .load(&source)
            .await
            .inspect_err(|e| warn!("Reload from {} failed, keeping previous spec: {}", source, e))?;
        ctx.session.record_spec_source(&source);

        let operations = loaded.spec.operations(ctx.recognized_methods()).count();
        info!("Reloaded spec from {} ({} operations)", source, operations);

        Ok(json!({
            "success": true,
            "message": format!("Specification reloaded from {source}"),
            "source": source,
            "title": loaded.spec.info.title,
            "version": loaded.spec.info.version,
            "total_paths": loaded.spec.path_count(),
            "total_operations": operations,
            "loaded_at": loaded.loaded_at,
        }))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ReloadParams>(),
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
    use crate::test_support::{spec_file, widgets_context};

    #[tokio::test]
    async fn test_reload_is_idempotent() {
        let (ctx, _spec) = widgets_context("http://api.test").await;

        let first = ReloadTool::execute(&ReloadParams::default(), &ctx).await.unwrap();
        let second = ReloadTool::execute(&ReloadParams::default(), &ctx).await.unwrap();
        assert_eq!(first["total_paths"], second["total_paths"]);
        assert_eq!(first["title"], "Widget API");
        assert_eq!(first["title"], second["title"]);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_spec() {
        let (ctx, _spec) = widgets_context("http://api.test").await;
        let before = ctx.specs.current();

        let broken = spec_file("paths: [unclosed");
        let params = ReloadParams {
            source: Some(broken.path().display().to_string()),
        };
        let err = ReloadTool::execute(&params, &ctx).await.unwrap_err();
        assert_eq!(err.kind(), "spec_load");

        let params = ReloadParams {
            source: Some("/definitely/not/here.yaml".to_string()),
        };
        assert!(ReloadTool::execute(&params, &ctx).await.is_err());
        assert_eq!(ctx.specs.current(), before);
    }

    #[tokio::test]
    async fn test_reload_from_new_source() {
        let (ctx, _spec) = widgets_context("http://api.test").await;
        let other = spec_file("openapi: 3.0.0\ninfo: { title: Other }\npaths:\n  /a: { get: {} }\n  /b: { post: {} }\n");
        let source = other.path().display().to_string();

        let params = ReloadParams {
            source: Some(source.clone()),
        };
        let result = ReloadTool::execute(&params, &ctx).await.unwrap();
        assert_eq!(result["total_paths"], 2);
        assert_eq!(ctx.session.snapshot().spec_source.as_deref(), Some(source.as_str()));
    }
}
