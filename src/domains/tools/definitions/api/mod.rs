//! Tools that make live calls.

mod dispatch;
mod login;

pub use dispatch::{DispatchParams, DispatchTool};
pub use login::{LoginParams, LoginTool};
