//! Live calls against the configured HTTP API.

pub mod dispatcher;
pub mod envelope;
pub mod login;

pub use dispatcher::{DispatchRequest, RequestDispatcher};
pub use envelope::{ResponseBody, ToolResult};
pub use login::{LOGIN_PATH, LoginOutcome};
