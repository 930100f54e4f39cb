//! Incremental decode session
//!
//! Drives a [`DecodeBackend`] as bytes arrive and answers frame queries
//! against whatever has been received so far.

use crate::domain::entities::{
    keys, DecodingMode, DecodingOptions, DrawingSize, FrameSize, RepetitionCount,
    SubsamplingLevel,
};
use crate::domain::repositories::{DataProvider, DecodeBackend};
use crate::domain::services::{DecodeOptionsBuilder, FrameMetadataResolver};
use serde::Serialize;

/// Ingestion state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionState {
    /// Nothing appended yet
    Empty,
    /// Some data appended, more expected
    Receiving,
    /// Final data appended; no further appends allowed
    Complete,
}

/// Picks the smaller of native size and drawing size by area
///
/// The drawing size only wins when strictly smaller, so the thumbnail path
/// never upscales.
pub fn thumbnail_target(native: FrameSize, size_for_drawing: Option<DrawingSize>) -> DrawingSize {
    let native = DrawingSize::from(native);
    match size_for_drawing {
        Some(drawing) if drawing.area() < native.area() => drawing,
        _ => native,
    }
}

/// Incremental decode session
///
/// Owns one backend for its whole lifetime. Appends need `&mut self`, so
/// ingestion is single-writer by construction; queries take `&self` and
/// recompute from the backend every time.
///
/// # Example
///
/// ```ignore
/// let mut session = IncrementalDecodeSession::<ImageCrateBackend>::new();
/// session.append_data(&chunk, false);
/// if session.frame_count() > 0 && session.is_frame_complete(0) {
///     let image = session.create_frame_image(0, SubsamplingLevel::DEFAULT, DecodingOptions::DEFAULT);
/// }
/// ```
pub struct IncrementalDecodeSession<B: DecodeBackend> {
    backend: B,
    state: SessionState,
    resolver: FrameMetadataResolver,
}

impl<B: DecodeBackend> IncrementalDecodeSession<B> {
    /// Creates an empty session over a fresh incremental backend
    pub fn new() -> Self {
        Self::with_backend(B::create_incremental())
    }

    /// Creates a session over an existing backend
    pub fn with_backend(backend: B) -> Self {
        let resolver = FrameMetadataResolver::for_backend(&backend);
        Self {
            backend,
            state: SessionState::Empty,
            resolver,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the final bytes have been appended
    pub fn is_all_data_received(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// Appends newly arrived bytes
    ///
    /// # Panics
    ///
    /// Panics if the session already received its final data.
    pub fn append_data(&mut self, bytes: &[u8], is_final: bool) {
        self.begin_append(is_final);
        self.backend.update_data(bytes, is_final);
    }

    /// Hands the backend everything an external provider holds so far
    ///
    /// # Panics
    ///
    /// Panics if the session already received its final data.
    pub fn append_from_provider(&mut self, provider: &dyn DataProvider, is_final: bool) {
        self.begin_append(is_final);
        self.backend.update_data_provider(provider, is_final);
    }

    /// Number of frames the backend currently recognises
    pub fn frame_count(&self) -> usize {
        self.backend.frame_count()
    }

    /// Whether a frame's pixel data is fully available
    ///
    /// The last known frame is judged by the whole-source status: per-index
    /// status for the final frame flips to complete before decoding has
    /// genuinely finished.
    ///
    /// # Panics
    ///
    /// Panics if `index >= frame_count()`.
    pub fn is_frame_complete(&self, index: usize) -> bool {
        let frame_count = self.frame_count();
        assert!(
            index < frame_count,
            "frame index {index} out of range (frame count {frame_count})"
        );

        if index == frame_count - 1 {
            return self.backend.status().is_complete();
        }

        self.backend.status_at_index(index).is_complete()
    }

    /// Pixel dimensions of a frame under a subsampling level
    pub fn frame_size(&self, index: usize, subsampling_level: SubsamplingLevel) -> Option<FrameSize> {
        let options = DecodeOptionsBuilder::build_exact_options(subsampling_level);
        let properties = self.backend.properties_at_index(index, &options)?;

        let width = properties.get_u32(keys::PIXEL_WIDTH)?;
        let height = properties.get_u32(keys::PIXEL_HEIGHT)?;
        Some(FrameSize::new(width, height))
    }

    /// Display duration of a frame in seconds
    ///
    /// `None` when the backend cannot describe the frame yet. Frames without
    /// timing, including still images, report the 0.1s fallback.
    pub fn frame_duration(&self, index: usize) -> Option<f64> {
        self.resolver.compute_frame_duration(&self.backend, index)
    }

    /// How often the animation repeats
    pub fn repetition_count(&self) -> RepetitionCount {
        let options = DecodeOptionsBuilder::build_exact_options(SubsamplingLevel::DEFAULT);
        self.backend
            .properties(&options)
            .map(|props| self.resolver.resolve_repetition_count(&props))
            .unwrap_or(RepetitionCount::NotAnimated)
    }

    /// Decodes a frame
    ///
    /// Returns `None` for indices beyond the current frame count and
    /// whenever the backend cannot produce pixels yet. There is no retry:
    /// call again after appending more data.
    pub fn create_frame_image(
        &self,
        index: usize,
        subsampling_level: SubsamplingLevel,
        decoding_options: DecodingOptions,
    ) -> Option<B::Image> {
        if index >= self.frame_count() {
            return None;
        }

        match decoding_options.mode {
            DecodingMode::Synchronous => {
                let options = DecodeOptionsBuilder::build_exact_options(subsampling_level);
                self.backend.create_image_at_index(index, &options)
            }
            DecodingMode::Asynchronous => {
                // Native size is compared without subsampling.
                let native = self.frame_size(index, SubsamplingLevel::DEFAULT)?;
                let target = thumbnail_target(native, decoding_options.size_for_drawing);
                let options =
                    DecodeOptionsBuilder::build_thumbnail_options(target, subsampling_level);
                self.backend.create_thumbnail_at_index(index, &options)
            }
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the session and returns its backend
    pub fn into_backend(self) -> B {
        self.backend
    }

    fn begin_append(&mut self, is_final: bool) {
        assert!(
            !self.is_all_data_received(),
            "data appended after the final chunk was received"
        );

        self.state = if is_final {
            SessionState::Complete
        } else {
            SessionState::Receiving
        };
    }
}

impl<B: DecodeBackend> Default for IncrementalDecodeSession<B> {
    fn default() -> Self {
        Self::new()
    }
}
