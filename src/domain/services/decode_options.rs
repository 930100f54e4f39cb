//! Decode options builder
//!
//! Computes the option set for exact and thumbnail decodes. Every call
//! returns a fresh value; there is no shared option state to mutate.

use crate::domain::entities::{DrawingSize, ImageSourceOptions, SubsamplingLevel};

/// Builds backend option sets
pub struct DecodeOptionsBuilder;

impl DecodeOptionsBuilder {
    /// Options for metadata queries and exact decodes
    ///
    /// Result caching is enabled. The subsample factor is only present for
    /// non-default levels.
    pub fn build_exact_options(subsampling_level: SubsamplingLevel) -> ImageSourceOptions {
        ImageSourceOptions {
            should_cache: true,
            subsample_factor: Self::explicit_subsampling(subsampling_level),
            ..ImageSourceOptions::default()
        }
    }

    /// Options for a thumbnail decode bounded by `target_size`
    ///
    /// The larger of the two target dimensions, floored, becomes the maximum
    /// output pixel size.
    pub fn build_thumbnail_options(
        target_size: DrawingSize,
        subsampling_level: SubsamplingLevel,
    ) -> ImageSourceOptions {
        ImageSourceOptions {
            should_cache_immediately: true,
            create_thumbnail_from_image_always: true,
            thumbnail_max_pixel_size: Some(Self::max_pixel_size(target_size)),
            subsample_factor: Self::explicit_subsampling(subsampling_level),
            ..ImageSourceOptions::default()
        }
    }

    /// Floors the larger dimension into pixel units
    ///
    /// `as` saturates: negative sizes become 0, huge ones `u32::MAX`.
    pub fn max_pixel_size(target_size: DrawingSize) -> u32 {
        target_size.max_dimension().floor() as u32
    }

    fn explicit_subsampling(level: SubsamplingLevel) -> Option<SubsamplingLevel> {
        if level.is_default() { None } else { Some(level) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_default_has_no_subsample_key() {
        let options = DecodeOptionsBuilder::build_exact_options(SubsamplingLevel::DEFAULT);
        assert!(options.should_cache());
        assert!(!options.should_cache_immediately());
        assert_eq!(options.subsample_factor(), None);
        assert_eq!(options.thumbnail_max_pixel_size(), None);
    }

    #[test]
    fn test_thumbnail_floors_larger_dimension() {
        let options = DecodeOptionsBuilder::build_thumbnail_options(
            DrawingSize::new(120.9, 99.5),
            SubsamplingLevel::Level2,
        );
        assert!(options.should_cache_immediately());
        assert!(options.create_thumbnail_from_image_always());
        assert!(!options.should_cache());
        assert_eq!(options.thumbnail_max_pixel_size(), Some(120));
        assert_eq!(options.subsample_factor(), Some(SubsamplingLevel::Level2));
    }

    #[test]
    fn test_negative_size_saturates_to_zero() {
        assert_eq!(
            DecodeOptionsBuilder::max_pixel_size(DrawingSize::new(-4.0, -2.0)),
            0
        );
    }
}
