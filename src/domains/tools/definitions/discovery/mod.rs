//! Read-only tools over the loaded spec.

mod base_info;
mod describe;
mod list_operations;
mod response_examples;
mod response_structure;
mod search;

pub use base_info::{BaseInfoParams, BaseInfoTool};
pub use describe::{DescribeParams, DescribeTool};
pub use list_operations::{ListOperationsParams, ListOperationsTool};
pub use response_examples::{ResponseExamplesParams, ResponseExamplesTool};
pub use response_structure::{ResponseStructureParams, ResponseStructureTool};
pub use search::{SearchParams, SearchTool};
