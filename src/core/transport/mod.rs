//! Transports that carry MCP messages between clients and the server.
//!
//! | Feature | Transport | Notes |
//! |---|---|---|
//! | `stdio` (default) | stdin/stdout | one client, full MCP including `list_changed` |
//! | `tcp` | line-delimited JSON-RPC | one rmcp session per connection |
//! | `http` | JSON-RPC over POST | stateless, plus `/health` |
//!
//! All of them share one [`McpServer`](crate::core::McpServer), so session
//! changes made by one client are seen by every other.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
