//! Presentation layer
//!
//! Command-line front end for the decode session.

pub mod cli;
