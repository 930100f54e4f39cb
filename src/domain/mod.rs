//! Domain layer - Core decode orchestration logic
//!
//! This module contains the value types, the backend contract and the
//! metadata/option services. Nothing here performs I/O or logging.

pub mod entities;
pub mod repositories;
pub mod services;
