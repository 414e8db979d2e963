//! Tools domain module.
//!
//! Everything a client can call. Two sources feed the registry:
//!
//! - `definitions/` - the static tools (discovery, session, spec, api), one
//!   file per tool
//! - `generated.rs` - one tool per operation of the loaded spec, rebuilt
//!   after every successful reload
//!
//! `registry.rs` is the single dispatch point for all transports,
//! `arguments.rs` checks arguments against input schemas, and `context.rs`
//! carries the shared state handed to every handler.
//!
//! ## Adding a Static Tool
//!
//! 1. Create a file in the matching `definitions/` group
//! 2. Define params, `execute()` and `to_tool()`
//! 3. Export it from the group's `mod.rs`
//! 4. Add it to `STATIC_TOOL_NAMES`, `static_tools()` and `invoke()` in
//!    `registry.rs`

mod arguments;
mod context;
pub mod definitions;
mod error;
pub mod generated;
mod registry;

pub use context::ToolContext;
pub use error::ToolError;
pub use generated::{GeneratedTools, OperationBinding};
pub use registry::{STATIC_TOOL_NAMES, ToolRegistry};
