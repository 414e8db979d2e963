//! Tools that read or change the session.

mod set_base_url;
mod set_bearer_token;
mod token_status;

pub use set_base_url::{SetBaseUrlParams, SetBaseUrlTool};
pub use set_bearer_token::{SetBearerTokenParams, SetBearerTokenTool};
pub use token_status::{TokenStatusParams, TokenStatusTool};
