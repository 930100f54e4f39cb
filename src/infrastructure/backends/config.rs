//! Backend configuration

/// Configuration for [`super::ImageCrateBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Maximum animation frames indexed per snapshot
    pub max_frames: usize,
    /// Hand out still-image pixels before the final bytes arrive
    ///
    /// Some codecs happily decode truncated input, so a still frame is
    /// never reported complete before final data either way.
    pub eager_static_decode: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            max_frames: 4096,
            eager_static_decode: true,
        }
    }
}

impl BackendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames.max(1);
        self
    }

    /// Withholds still-image pixels until the final bytes are in
    pub fn lazy_static_decode(mut self) -> Self {
        self.eager_static_decode = false;
        self
    }
}
