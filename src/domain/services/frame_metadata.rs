//! Frame metadata resolver
//!
//! Resolves animation timing from backend property tables. GIF and APNG
//! attach timing to each frame; HEIC image sequences keep one container
//! level list instead, so the resolver falls back to it when the
//! per-frame table carries nothing.

use crate::domain::entities::{keys, PropertyTable, RepetitionCount, SubsamplingLevel};
use crate::domain::repositories::DecodeBackend;
use crate::domain::services::DecodeOptionsBuilder;

/// Delays below this many seconds are treated as unset
pub const MINIMUM_FRAME_DURATION: f64 = 0.011;

/// Duration substituted for delays below [`MINIMUM_FRAME_DURATION`]
pub const FALLBACK_FRAME_DURATION: f64 = 0.1;

/// Applies the minimum-duration correction
///
/// Zero and near-zero delays become 100ms.
pub fn apply_duration_floor(duration: f64) -> f64 {
    if duration < MINIMUM_FRAME_DURATION {
        FALLBACK_FRAME_DURATION
    } else {
        duration
    }
}

/// Resolves animation properties for a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMetadataResolver {
    supports_sequence_format: bool,
}

impl FrameMetadataResolver {
    pub fn new(supports_sequence_format: bool) -> Self {
        Self {
            supports_sequence_format,
        }
    }

    /// Reads the backend's sequence capability once
    pub fn for_backend<B: DecodeBackend + ?Sized>(backend: &B) -> Self {
        Self::new(backend.supports_sequence_format())
    }

    pub fn supports_sequence_format(&self) -> bool {
        self.supports_sequence_format
    }

    /// Returns the first animation sub-table present in a frame's properties
    ///
    /// Priority: GIF, then PNG, then HEICS (sequence-capable backends only).
    pub fn resolve_animation_properties<'a>(
        &self,
        frame_properties: &'a PropertyTable,
    ) -> Option<&'a PropertyTable> {
        frame_properties
            .get_table(keys::GIF_DICTIONARY)
            .or_else(|| frame_properties.get_table(keys::PNG_DICTIONARY))
            .or_else(|| {
                if self.supports_sequence_format {
                    frame_properties.get_table(keys::HEICS_DICTIONARY)
                } else {
                    None
                }
            })
    }

    /// Returns the container-level frame-info entry for `index`
    ///
    /// ```text
    /// {HEICS} = {
    ///     FrameInfo = ( { DelayTime = 0.1 }, { DelayTime = 0.1 }, ... );
    ///     LoopCount = 0;
    /// }
    /// ```
    pub fn resolve_heics_sequence_properties<'a>(
        &self,
        container_properties: &'a PropertyTable,
        index: usize,
    ) -> Option<&'a PropertyTable> {
        if !self.supports_sequence_format {
            return None;
        }

        container_properties
            .get_table(keys::HEICS_DICTIONARY)?
            .get_list(keys::FRAME_INFO)?
            .get(index)?
            .as_table()
    }

    /// Frame delay in seconds before the floor is applied
    ///
    /// `None` only when the backend cannot describe the frame yet. A frame
    /// without any timing information yields `Some(0.0)`.
    pub fn raw_frame_duration<B: DecodeBackend + ?Sized>(
        &self,
        backend: &B,
        index: usize,
    ) -> Option<f64> {
        let options = DecodeOptionsBuilder::build_exact_options(SubsamplingLevel::DEFAULT);
        let frame_properties = backend.properties_at_index(index, &options)?;

        if let Some(animation) = self.resolve_animation_properties(&frame_properties) {
            return Some(Self::delay_from(Some(animation)));
        }

        let container_properties = backend.properties(&options);
        let animation = container_properties
            .as_ref()
            .and_then(|props| self.resolve_heics_sequence_properties(props, index));

        Some(Self::delay_from(animation))
    }

    /// Display duration of a frame in seconds, floor applied
    pub fn compute_frame_duration<B: DecodeBackend + ?Sized>(
        &self,
        backend: &B,
        index: usize,
    ) -> Option<f64> {
        self.raw_frame_duration(backend, index)
            .map(apply_duration_floor)
    }

    /// Resolves how often an animation repeats from container properties
    pub fn resolve_repetition_count(&self, container_properties: &PropertyTable) -> RepetitionCount {
        let Some(animation) = self.resolve_animation_properties(container_properties) else {
            return RepetitionCount::NotAnimated;
        };

        match animation.get_u32(keys::LOOP_COUNT) {
            None => RepetitionCount::Once,
            Some(0) => RepetitionCount::Infinite,
            Some(n) => RepetitionCount::Finite(n),
        }
    }

    /// Unclamped delay wins over the clamped one; neither means 0
    fn delay_from(animation: Option<&PropertyTable>) -> f64 {
        animation
            .and_then(|table| {
                table
                    .get_number(keys::UNCLAMPED_DELAY_TIME)
                    .or_else(|| table.get_number(keys::DELAY_TIME))
            })
            .unwrap_or(0.0)
    }
}
