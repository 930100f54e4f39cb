//! Infrastructure layer
//!
//! Concrete implementations of the domain repositories.
//! This layer contains all codec crates and file-system access.

pub mod backends;
pub mod providers;
