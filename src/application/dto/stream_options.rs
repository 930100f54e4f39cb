//! Stream options DTO

use crate::domain::entities::{DecodingOptions, SubsamplingLevel};

/// Options for streaming a source through a session
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Bytes handed to the session per append
    pub chunk_size: usize,
    /// Subsampling used for size reports and decodes
    pub subsampling: SubsamplingLevel,
    /// Options used when decoding frames after streaming
    pub decoding: DecodingOptions,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            chunk_size: 16 * 1024, // 16KB, roughly one network read
            subsampling: SubsamplingLevel::DEFAULT,
            decoding: DecodingOptions::DEFAULT,
        }
    }
}

impl StreamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chunk size; zero is bumped to one byte
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    pub fn with_subsampling(mut self, level: SubsamplingLevel) -> Self {
        self.subsampling = level;
        self
    }

    pub fn with_decoding(mut self, decoding: DecodingOptions) -> Self {
        self.decoding = decoding;
        self
    }
}
