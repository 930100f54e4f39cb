//! `image`-crate decode backend
//!
//! Implements the incremental decode contract on top of the `image`,
//! `gif` and `png` crates. Queries after an update re-walk the container
//! metadata once; pixels are decoded only when a frame image is asked for.

use super::config::BackendConfig;
use super::error::BackendError;
use super::snapshot::{SourceKind, SourceSnapshot};
use crate::domain::entities::{keys, ImageSourceOptions, PropertyTable};
use crate::domain::repositories::{DataProvider, DecodeBackend, SourceStatus};
use bytes::BytesMut;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Incremental backend over the `image` crate
///
/// Supports animated GIF and APNG frame by frame, and any still format
/// the enabled `image` features can read.
///
/// # Example
///
/// ```ignore
/// let mut backend = ImageCrateBackend::create_incremental();
/// backend.update_data(&bytes, true);
/// assert_eq!(backend.status(), SourceStatus::Complete);
/// ```
pub struct ImageCrateBackend {
    config: BackendConfig,
    buffer: BytesMut,
    is_final: bool,
    snapshot: Mutex<Option<Arc<SourceSnapshot>>>,
    /// Last frame handed out, as `(index, pixels)`
    decoded: Mutex<Option<(usize, RgbaImage)>>,
    last_error: Mutex<Option<Arc<BackendError>>>,
}

impl ImageCrateBackend {
    pub fn with_config(config: BackendConfig) -> Self {
        Self {
            config,
            buffer: BytesMut::new(),
            is_final: false,
            snapshot: Mutex::new(None),
            decoded: Mutex::new(None),
            last_error: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Bytes currently held
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Latest problem with the held bytes, or a failed provider copy
    ///
    /// Cleared by a clean probe after the next update. Truncation errors
    /// are expected while data is still arriving; see
    /// [`BackendError::is_truncation`].
    pub fn last_error(&self) -> Option<Arc<BackendError>> {
        self.last_error.lock().clone()
    }

    fn invalidate(&mut self) {
        *self.snapshot.get_mut() = None;
        *self.decoded.get_mut() = None;
    }

    fn record_error(&self, error: BackendError) {
        let error = error.while_streaming(self.is_final);
        if error.is_truncation() {
            debug!("Source truncated: {}", error);
        } else {
            warn!("Source error: {}", error);
        }
        *self.last_error.lock() = Some(Arc::new(error));
    }

    /// Returns the snapshot for the current buffer, probing on first use
    fn snapshot(&self) -> Arc<SourceSnapshot> {
        let mut guard = self.snapshot.lock();
        if let Some(snapshot) = guard.as_ref() {
            return Arc::clone(snapshot);
        }

        let (snapshot, error) = SourceSnapshot::probe(&self.buffer, self.is_final, &self.config);
        match error {
            Some(error) => self.record_error(error),
            None => *self.last_error.lock() = None,
        }

        let snapshot = Arc::new(snapshot);
        *guard = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Full-size pixels of frame `index`, decoding on a cache miss
    fn frame_pixels(&self, index: usize) -> Option<RgbaImage> {
        let mut decoded = self.decoded.lock();
        if let Some((cached, image)) = decoded.as_ref() {
            if *cached == index {
                return Some(image.clone());
            }
        }

        let snapshot = self.snapshot();
        match snapshot.decode_frame(&self.buffer, index, &self.config) {
            Ok(Some(image)) => {
                *decoded = Some((index, image.clone()));
                Some(image)
            }
            Ok(None) => None,
            Err(e) => {
                self.record_error(e);
                None
            }
        }
    }

    /// Decoded frame with subsampling applied
    fn subsampled_frame(&self, index: usize, options: &ImageSourceOptions) -> Option<RgbaImage> {
        let image = self.frame_pixels(index)?;
        let level = options.subsampling();
        if level.is_default() {
            return Some(image);
        }

        let (width, height) = image.dimensions();
        Some(imageops::resize(
            &image,
            level.scale(width),
            level.scale(height),
            FilterType::Nearest,
        ))
    }

    fn animation_dictionary(kind: SourceKind) -> Option<&'static str> {
        match kind {
            SourceKind::Gif => Some(keys::GIF_DICTIONARY),
            SourceKind::AnimatedPng => Some(keys::PNG_DICTIONARY),
            SourceKind::Still | SourceKind::Unknown => None,
        }
    }
}

/// Fits `(width, height)` inside a `max_pixel_size` square, keeping the
/// aspect ratio; never enlarges
pub fn fit_within(width: u32, height: u32, max_pixel_size: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_pixel_size || longest == 0 {
        return (width, height);
    }

    let scale = f64::from(max_pixel_size) / f64::from(longest);
    let fit = |d: u32| ((f64::from(d) * scale).round() as u32).max(1);
    (fit(width), fit(height))
}

impl Default for ImageCrateBackend {
    fn default() -> Self {
        Self::with_config(BackendConfig::default())
    }
}

impl DecodeBackend for ImageCrateBackend {
    type Image = RgbaImage;

    fn create_incremental() -> Self {
        Self::default()
    }

    fn update_data(&mut self, bytes: &[u8], is_final: bool) {
        self.buffer.extend_from_slice(bytes);
        self.is_final = is_final;
        self.invalidate();
    }

    fn update_data_provider(&mut self, provider: &dyn DataProvider, is_final: bool) {
        match provider.copy_bytes() {
            Ok(bytes) => {
                self.buffer.clear();
                self.buffer.extend_from_slice(&bytes);
                self.is_final = is_final;
                self.invalidate();
            }
            // The held bytes stay as they were, final or not.
            Err(e) => self.record_error(BackendError::Provider(e)),
        }
    }

    fn frame_count(&self) -> usize {
        self.snapshot().frame_count()
    }

    fn properties_at_index(
        &self,
        index: usize,
        options: &ImageSourceOptions,
    ) -> Option<PropertyTable> {
        let snapshot = self.snapshot();
        let (width, height) = snapshot.frame_dimensions(index)?;
        let level = options.subsampling();

        let mut properties = PropertyTable::new()
            .with(keys::PIXEL_WIDTH, level.scale(width))
            .with(keys::PIXEL_HEIGHT, level.scale(height));

        let delay = snapshot.frame_delay(index);
        if let (Some(dictionary), Some(delay)) = (Self::animation_dictionary(snapshot.kind), delay) {
            properties.insert(
                dictionary,
                PropertyTable::new()
                    .with(keys::UNCLAMPED_DELAY_TIME, delay)
                    .with(keys::DELAY_TIME, delay),
            );
        }

        Some(properties)
    }

    fn properties(&self, _options: &ImageSourceOptions) -> Option<PropertyTable> {
        let snapshot = self.snapshot();
        snapshot.format?;

        let mut properties = PropertyTable::new().with(keys::FILE_SIZE, snapshot.byte_len as f64);

        if let Some(dictionary) = Self::animation_dictionary(snapshot.kind) {
            let mut animation = PropertyTable::new();
            if let Some(loop_count) = snapshot.loop_count {
                animation.insert(keys::LOOP_COUNT, loop_count);
            }
            if let (SourceKind::Gif, Some((width, height))) = (snapshot.kind, snapshot.canvas) {
                animation.insert(keys::CANVAS_PIXEL_WIDTH, width);
                animation.insert(keys::CANVAS_PIXEL_HEIGHT, height);
            }
            properties.insert(dictionary, animation);
        }

        Some(properties)
    }

    fn status_at_index(&self, index: usize) -> SourceStatus {
        self.snapshot().frame_status(index)
    }

    fn status(&self) -> SourceStatus {
        self.snapshot().status()
    }

    fn create_image_at_index(
        &self,
        index: usize,
        options: &ImageSourceOptions,
    ) -> Option<RgbaImage> {
        self.subsampled_frame(index, options)
    }

    fn create_thumbnail_at_index(
        &self,
        index: usize,
        options: &ImageSourceOptions,
    ) -> Option<RgbaImage> {
        let image = self.subsampled_frame(index, options)?;

        let Some(max_pixel_size) = options.thumbnail_max_pixel_size() else {
            return Some(image);
        };
        if max_pixel_size == 0 {
            return None;
        }

        let (width, height) = image.dimensions();
        let (target_width, target_height) = fit_within(width, height, max_pixel_size);
        if (target_width, target_height) == (width, height) {
            return Some(image);
        }

        Some(imageops::thumbnail(&image, target_width, target_height))
    }
}
