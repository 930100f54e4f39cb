//! CLI module

mod commands;
mod progress;

pub use commands::{decoding_options, Cli, Commands};
pub use progress::ProgressReporter;
