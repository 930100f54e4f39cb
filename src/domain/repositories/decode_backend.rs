//! Decode backend trait
//!
//! Defines the contract between the incremental decode session and the
//! engine that actually parses bitstreams and produces pixels.

use super::data_provider::DataProvider;
use crate::domain::entities::{ImageSourceOptions, PropertyTable};
use serde::Serialize;

/// Completeness of a source or of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceStatus {
    Incomplete,
    Complete,
}

impl SourceStatus {
    pub fn is_complete(self) -> bool {
        self == Self::Complete
    }
}

/// Trait for incremental image decode engines
///
/// A backend owns the growing byte buffer and answers metadata and pixel
/// queries against whatever it currently holds. None of the query methods
/// fail: "not enough data yet" and "malformed data" both surface as `None`
/// or [`SourceStatus::Incomplete`], and the caller re-queries after
/// supplying more bytes.
///
/// # Example
///
/// ```ignore
/// let mut backend = ImageCrateBackend::create_incremental();
/// backend.update_data(&first_chunk, false);
/// if backend.frame_count() > 0 {
///     let props = backend.properties_at_index(0, &build_exact_options(SubsamplingLevel::DEFAULT));
/// }
/// ```
pub trait DecodeBackend {
    /// Decoded pixel buffer type
    type Image;

    /// Creates an empty backend configured for incremental ingestion
    fn create_incremental() -> Self
    where
        Self: Sized;

    /// Whether the backend understands container-level image sequences
    /// (HEICS-style frame-info lists)
    fn supports_sequence_format(&self) -> bool {
        false
    }

    /// Appends bytes to the buffer
    ///
    /// # Arguments
    ///
    /// * `bytes` - The newly arrived bytes
    /// * `is_final` - Whether these are the last bytes of the source
    fn update_data(&mut self, bytes: &[u8], is_final: bool);

    /// Replaces the buffer with everything a provider has supplied so far
    fn update_data_provider(&mut self, provider: &dyn DataProvider, is_final: bool);

    /// Number of frames currently recognised
    fn frame_count(&self) -> usize;

    /// Per-frame property table, if the frame can be described yet
    fn properties_at_index(
        &self,
        index: usize,
        options: &ImageSourceOptions,
    ) -> Option<PropertyTable>;

    /// Container-level property table
    fn properties(&self, options: &ImageSourceOptions) -> Option<PropertyTable>;

    /// Completeness of a single frame
    fn status_at_index(&self, index: usize) -> SourceStatus;

    /// Completeness of the whole source
    fn status(&self) -> SourceStatus;

    /// Exact decode of a frame
    fn create_image_at_index(
        &self,
        index: usize,
        options: &ImageSourceOptions,
    ) -> Option<Self::Image>;

    /// Thumbnail-path decode of a frame
    fn create_thumbnail_at_index(
        &self,
        index: usize,
        options: &ImageSourceOptions,
    ) -> Option<Self::Image>;
}
