//! MCP Server implementation and lifecycle management.
//!
//! The server owns the tool registry and forwards `tools/list` and
//! `tools/call` to it. After a call that swapped in a new spec, connected
//! clients are told to refresh their tool list.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, instrument, warn};

use super::config::Config;
use super::error::Result;
use crate::domains::tools::{ToolContext, ToolRegistry};

#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

const INSTRUCTIONS: &str = "Bridge to an HTTP API described by an OpenAPI document. \
Use list_operations, search and describe to explore endpoints, set_base_url and \
set_bearer_token (or login) to configure access, then call the generated per-operation \
tools or dispatch for any endpoint.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Static and generated tools.
    registry: Arc<ToolRegistry>,

    /// Registry generation the client was last told about.
    announced_generation: Arc<AtomicU64>,
}

impl McpServer {
    /// Create the server and load the initial spec.
    ///
    /// Fails only for unusable configuration or initial session values. Spec
    /// loading never fails startup: the primary source is tried, then the
    /// fallback, and the server otherwise starts with an empty spec.
    pub async fn new(config: Config) -> Result<Self> {
        config.api.validate()?;
        let config = Arc::new(config);

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(config.api.timeout())
            .build()?;
        let context = ToolContext::new(config.clone(), client)?;

        let loaded = context
            .specs
            .load_with_fallback(
                Some(config.api.spec_source.as_str()),
                config.api.spec_fallback.as_deref(),
            )
            .await;
        if let Some(source) = loaded {
            context.session.record_spec_source(&source);
        }

        Ok(Self::with_context(context))
    }

    /// Create the server around an existing context without loading anything.
    pub fn with_context(context: ToolContext) -> Self {
        let config = context.config.clone();
        let registry = Arc::new(ToolRegistry::new(context));
        let announced_generation = Arc::new(AtomicU64::new(registry.generation()));

        Self {
            config,
            registry,
            announced_generation,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// A handle for another client: same registry and session, but its own
    /// record of which tool list it has seen.
    pub fn for_client(&self) -> Self {
        Self {
            config: self.config.clone(),
            registry: self.registry.clone(),
            announced_generation: Arc::new(AtomicU64::new(self.registry.generation())),
        }
    }

    /// True once per registry rebuild not yet announced to the client.
    fn take_list_changed(&self) -> bool {
        let current = self.registry.generation();
        self.announced_generation.swap(current, Ordering::SeqCst) != current
    }

    /// Wrap a tool outcome as text plus structured content.
    fn to_call_result(value: Value, is_error: bool) -> CallToolResult {
        let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
        CallToolResult {
            content: vec![Content::text(text)],
            structured_content: Some(value),
            is_error: Some(is_error),
            meta: None,
        }
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn tool_descriptors(&self) -> Vec<Value> {
        self.registry
            .list_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport). Only an unknown tool name
    /// is an error.
    #[cfg(feature = "http")]
    pub async fn call_tool_json(&self, name: &str, arguments: Value) -> std::result::Result<Value, ToolError> {
        let (value, is_error) = self.registry.call_tool(name, arguments).await?;
        // Stateless HTTP has no channel for list_changed; clients re-list.
        self.take_list_changed();
        serde_json::to_value(Self::to_call_result(value, is_error))
            .map_err(|e| ToolError::internal(e.to_string()))
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_tool_list_changed()
                .build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        let tools = self.registry.list_tools();
        info!("Listing {} tools", tools.len());
        self.take_list_changed();

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let arguments = request.arguments.map(Value::Object).unwrap_or(Value::Null);

        let (value, is_error) = self
            .registry
            .call_tool(&request.name, arguments)
            .await
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        if self.take_list_changed() {
            info!("Tool list changed, notifying client");
            if let Err(e) = context.peer.notify_tool_list_changed().await {
                warn!("Failed to send tools/list_changed: {}", e);
            }
        }

        Ok(Self::to_call_result(value, is_error))
    }
}
