//! CLI commands using clap

use crate::domain::entities::{DecodingOptions, DrawingSize, SubsamplingLevel};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// incdecode - incremental image decoding
///
/// Streams an image through an incremental decode session the way a
/// network fetch would deliver it, and reports what can be known at
/// each step.
#[derive(Parser)]
#[command(name = "incdecode")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and decode images from partially received data", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stream a file and print per-frame metadata
    Inspect {
        /// Image file (GIF, PNG/APNG, JPEG)
        file: PathBuf,

        /// Bytes appended per step
        #[arg(short, long, default_value = "16384")]
        chunk_size: usize,

        /// Subsampling factor used for reported sizes (1, 2, 4 or 8)
        #[arg(short, long, default_value = "1")]
        subsample: SubsamplingLevel,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Read through a memory-mapped file provider instead of chunks
        #[arg(long)]
        mmap: bool,
    },

    /// Stream a file, decode one frame and save it as PNG
    Decode {
        /// Image file (GIF, PNG/APNG, JPEG)
        file: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Frame index
        #[arg(short, long, default_value = "0")]
        frame: usize,

        /// Subsampling factor (1, 2, 4 or 8)
        #[arg(short, long, default_value = "1")]
        subsample: SubsamplingLevel,

        /// Exact decode instead of the thumbnail path
        #[arg(long)]
        sync: bool,

        /// Target drawing size for the thumbnail path, e.g. 320x240
        #[arg(long)]
        size: Option<DrawingSize>,

        /// Bytes appended per step
        #[arg(short, long, default_value = "16384")]
        chunk_size: usize,
    },
}

/// Builds decoding options from the `decode` flags
pub fn decoding_options(sync: bool, size: Option<DrawingSize>) -> DecodingOptions {
    if sync {
        DecodingOptions::synchronous()
    } else {
        DecodingOptions::asynchronous(size)
    }
}
