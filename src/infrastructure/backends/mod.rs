//! Decode backend implementations

mod apng;
mod config;
mod error;
mod image_backend;
mod snapshot;

pub use config::BackendConfig;
pub use error::BackendError;
pub use image_backend::{fit_within, ImageCrateBackend};
