//! Session domain module.
//!
//! Mutable, process-wide call configuration: the base URL every live call is
//! sent to, the optional bearer credential, and the identity of the loaded
//! spec. Dispatches read an immutable snapshot taken when they start.

mod error;
mod state;

pub use error::SessionError;
pub use state::{
    BaseUrlChange, SessionConfig, SessionState, TOKEN_PREVIEW_CHARS, TokenStatus, TokenUpdate,
    redact_token,
};
