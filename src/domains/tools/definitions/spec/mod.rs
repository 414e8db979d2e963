//! Tools managing the loaded spec document.

mod current_spec_info;
mod reload;

pub use current_spec_info::{CurrentSpecInfoParams, CurrentSpecInfoTool};
pub use reload::{ReloadParams, ReloadTool};
