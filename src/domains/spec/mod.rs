//! Spec domain module.
//!
//! Holds the parsed API description ([`SpecStore`]) and the read-only
//! queries derived from it ([`EndpointIndex`]).

mod error;
pub mod index;
pub mod model;
mod store;

pub use error::{LookupError, SpecError};
pub use index::EndpointIndex;
pub use model::{ApiSpecification, HttpMethod, OperationDescriptor, ParameterLocation};
pub use store::{LoadedSpec, SpecSource, SpecStore};
