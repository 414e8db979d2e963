//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The fixed set of static tools
//! - Tools generated from the loaded spec, rebuilt whenever a new spec is
//!   swapped in
//! - The single dispatch path used by every transport

use parking_lot::RwLock;
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument, warn};

use super::arguments;
use super::context::ToolContext;
use super::definitions::{
    BaseInfoTool, CurrentSpecInfoTool, DescribeTool, DispatchTool, ListOperationsTool, LoginTool,
    ReloadTool, ResponseExamplesTool, ResponseStructureTool, SearchTool, SetBaseUrlTool,
    SetBearerTokenTool, TokenStatusTool,
};
use super::error::ToolError;
use super::generated::GeneratedTools;

/// Names of the static tools, in listing order.
pub const STATIC_TOOL_NAMES: [&str; 13] = [
    ListOperationsTool::NAME,
    DescribeTool::NAME,
    SearchTool::NAME,
    BaseInfoTool::NAME,
    ResponseExamplesTool::NAME,
    ResponseStructureTool::NAME,
    SetBaseUrlTool::NAME,
    SetBearerTokenTool::NAME,
    TokenStatusTool::NAME,
    ReloadTool::NAME,
    CurrentSpecInfoTool::NAME,
    DispatchTool::NAME,
    LoginTool::NAME,
];

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    context: ToolContext,
    generated: RwLock<Arc<GeneratedTools>>,
    generation: AtomicU64,
}

impl ToolRegistry {
    /// Create a registry bound to the spec currently held by the context.
    pub fn new(context: ToolContext) -> Self {
        let generated = GeneratedTools::build(
            context.specs.current(),
            context.recognized_methods(),
            &STATIC_TOOL_NAMES,
        );
        info!("Registered {} generated tools", generated.len());

        Self {
            context,
            generated: RwLock::new(Arc::new(generated)),
            generation: AtomicU64::new(0),
        }
    }

    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    /// Incremented each time the generated tools are rebuilt for a newly
    /// loaded spec.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Metadata of the static tools.
    pub fn static_tools() -> Vec<Tool> {
        vec![
            ListOperationsTool::to_tool(),
            DescribeTool::to_tool(),
            SearchTool::to_tool(),
            BaseInfoTool::to_tool(),
            ResponseExamplesTool::to_tool(),
            ResponseStructureTool::to_tool(),
            SetBaseUrlTool::to_tool(),
            SetBearerTokenTool::to_tool(),
            TokenStatusTool::to_tool(),
            ReloadTool::to_tool(),
            CurrentSpecInfoTool::to_tool(),
            DispatchTool::to_tool(),
            LoginTool::to_tool(),
        ]
    }

    /// All tools: static first, then generated in spec order.
    pub fn list_tools(&self) -> Vec<Tool> {
        let generated = self.rebind();
        let mut tools = Self::static_tools();
        tools.extend(generated.iter().map(|binding| binding.to_tool()));
        tools
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<String> {
        let generated = self.rebind();
        STATIC_TOOL_NAMES
            .iter()
            .map(|name| name.to_string())
            .chain(generated.iter().map(|binding| binding.name.clone()))
            .collect()
    }

    /// Rebuild the generated tools if the active spec changed since they were
    /// built, and return the current table.
    pub fn rebind(&self) -> Arc<GeneratedTools> {
        let spec = self.context.specs.current();
        {
            let generated = self.generated.read();
            if generated.is_built_from(&spec) {
                return generated.clone();
            }
        }

        let mut generated = self.generated.write();
        if !generated.is_built_from(&spec) {
            *generated = Arc::new(GeneratedTools::build(
                spec,
                self.context.recognized_methods(),
                &STATIC_TOOL_NAMES,
            ));
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            info!(
                "Rebuilt {} generated tools (generation {})",
                generated.len(),
                generation
            );
        }
        generated.clone()
    }

    /// Invoke a tool by name.
    ///
    /// `arguments` must be an object or null. Errors are typed; see
    /// [`ToolRegistry::call_tool`] for the boundary behaviour.
    #[instrument(skip(self, arguments))]
    pub async fn invoke(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let ctx = &self.context;

        let result = match name {
            ListOperationsTool::NAME => {
                let params = Self::parse(arguments)?;
                ListOperationsTool::execute(&params, ctx)
            }
            DescribeTool::NAME => {
                let params = Self::parse(arguments)?;
                DescribeTool::execute(&params, ctx)
            }
            SearchTool::NAME => {
                let params = Self::parse(arguments)?;
                SearchTool::execute(&params, ctx)
            }
            BaseInfoTool::NAME => {
                let params = Self::parse(arguments)?;
                BaseInfoTool::execute(&params, ctx)
            }
            ResponseExamplesTool::NAME => {
                let params = Self::parse(arguments)?;
                ResponseExamplesTool::execute(&params, ctx)
            }
            ResponseStructureTool::NAME => {
                let params = Self::parse(arguments)?;
                ResponseStructureTool::execute(&params, ctx)
            }
            SetBaseUrlTool::NAME => {
                let params = Self::parse(arguments)?;
                SetBaseUrlTool::execute(&params, ctx)
            }
            SetBearerTokenTool::NAME => {
                let params = Self::parse(arguments)?;
                SetBearerTokenTool::execute(&params, ctx)
            }
            TokenStatusTool::NAME => {
                let params = Self::parse(arguments)?;
                TokenStatusTool::execute(&params, ctx)
            }
            ReloadTool::NAME => {
                let params = Self::parse(arguments)?;
                let result = ReloadTool::execute(&params, ctx).await;
                self.rebind();
                result
            }
            CurrentSpecInfoTool::NAME => {
                let params = Self::parse(arguments)?;
                CurrentSpecInfoTool::execute(&params, ctx)
            }
            DispatchTool::NAME => {
                let params = Self::parse(arguments)?;
                DispatchTool::execute(&params, ctx).await
            }
            LoginTool::NAME => {
                let params = Self::parse(arguments)?;
                LoginTool::execute(&params, ctx).await
            }
            _ => self.invoke_generated(name, arguments).await,
        };

        if let Err(e) = &result {
            debug!("Tool {} failed: {}", name, e);
        }
        result
    }

    /// Invoke a tool and fold every failure except an unknown name into the
    /// `{"error", "kind"}` envelope. The boolean is true for failures.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<(Value, bool), ToolError> {
        match self.invoke(name, arguments).await {
            Ok(value) => Ok((value, false)),
            Err(e @ ToolError::UnknownTool(_)) => {
                warn!("Unknown tool requested: {}", name);
                Err(e)
            }
            Err(e) => Ok((e.to_envelope(), true)),
        }
    }

    async fn invoke_generated(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let generated = self.rebind();
        let binding = generated
            .get(name)
            .ok_or_else(|| ToolError::unknown_tool(name))?;

        let arguments = arguments::into_object(arguments)?;
        let request = binding.build_request(&arguments)?;
        info!("Calling {} {} via {}", binding.method, binding.path, name);

        let result = self.context.dispatcher.dispatch(request).await;
        Ok(result.to_value())
    }

    /// Check arguments against the params schema, then deserialize.
    fn parse<P: DeserializeOwned + JsonSchema + 'static>(arguments: Value) -> Result<P, ToolError> {
        let schema = cached_schema_for_type::<P>();
        arguments::parse(&schema, arguments::into_object(arguments)?)
    }
}
