//! Domains module containing business logic organized by bounded contexts.
//!
//! - `spec` - the loaded API description and queries over it
//! - `session` - base URL, bearer credential and spec identity
//! - `api` - live calls and their result envelope
//! - `tools` - everything exposed to MCP clients

pub mod api;
pub mod session;
pub mod spec;
pub mod tools;
