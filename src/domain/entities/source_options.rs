//! Image source options entity
//!
//! The option set handed to a backend on each query or decode. Values are
//! produced by the builders in `domain::services::decode_options` and are
//! never mutated afterwards.

use super::subsampling::SubsamplingLevel;
use serde::Serialize;

/// Options passed to a decode backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImageSourceOptions {
    pub(crate) should_cache: bool,
    pub(crate) should_cache_immediately: bool,
    pub(crate) create_thumbnail_from_image_always: bool,
    pub(crate) thumbnail_max_pixel_size: Option<u32>,
    pub(crate) subsample_factor: Option<SubsamplingLevel>,
}

impl ImageSourceOptions {
    /// Backend may keep decoded results around
    pub fn should_cache(&self) -> bool {
        self.should_cache
    }

    /// Backend should decode at creation time rather than at first draw
    pub fn should_cache_immediately(&self) -> bool {
        self.should_cache_immediately
    }

    /// Thumbnails must be generated from the full image, never from
    /// embedded previews, so dimensions stay consistent
    pub fn create_thumbnail_from_image_always(&self) -> bool {
        self.create_thumbnail_from_image_always
    }

    /// Upper bound on the larger output dimension of a thumbnail
    pub fn thumbnail_max_pixel_size(&self) -> Option<u32> {
        self.thumbnail_max_pixel_size
    }

    /// Explicit subsampling, absent for the default level
    pub fn subsample_factor(&self) -> Option<SubsamplingLevel> {
        self.subsample_factor
    }

    /// Subsampling to apply, treating absence as no subsampling
    pub fn subsampling(&self) -> SubsamplingLevel {
        self.subsample_factor.unwrap_or_default()
    }
}
