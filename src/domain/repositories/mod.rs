//! Repository traits (interfaces)
//!
//! These traits define the contracts for external collaborators: the
//! decode engine and the suppliers of image bytes.

mod data_provider;
mod decode_backend;

pub use data_provider::DataProvider;
pub use decode_backend::{DecodeBackend, SourceStatus};
