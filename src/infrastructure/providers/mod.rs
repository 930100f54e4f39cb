//! External data providers

mod mapped_file;

pub use mapped_file::{MappedFileProvider, ProviderError};
