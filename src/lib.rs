//! OpenAPI MCP Server Library
//!
//! Exposes an HTTP API described by an OpenAPI 3 or Swagger 2 document to
//! MCP clients. A fixed set of tools explores the document and manages the
//! session (base URL, bearer token), and one tool is generated per
//! operation so a client can call endpoints with typed arguments.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server and its transports
//! - **domains**: business logic organized by bounded contexts
//!   - **spec**: document model, loading and endpoint lookups
//!   - **session**: mutable base URL, bearer token and spec source
//!   - **api**: outbound request dispatch and the login convention
//!   - **tools**: static and generated MCP tools behind one registry
//!
//! # Example
//!
//! ```rust,no_run
//! use openapi_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = TransportService::new(config.transport.clone());
//!     let server = McpServer::new(config).await?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
