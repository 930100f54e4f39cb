//! Source snapshot
//!
//! What the backend knows about the bytes it holds at one moment: format,
//! frame count, delays and loop count. Building one walks container
//! metadata only. Animation pixels are decoded on request.

use super::apng;
use super::config::BackendConfig;
use super::error::BackendError;
use crate::domain::repositories::SourceStatus;
use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::{AnimationDecoder, Frames, ImageFormat, ImageReader, RgbaImage};
use std::io::Cursor;
use tracing::debug;

/// Layout of the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Not enough bytes to tell
    Unknown,
    /// Single frame image
    Still,
    /// GIF, animated or not
    Gif,
    /// PNG carrying an acTL chunk
    AnimatedPng,
}

/// Metadata of one animation frame whose data has fully arrived
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Delay in seconds
    pub delay: f64,
}

#[derive(Debug)]
pub struct SourceSnapshot {
    pub format: Option<ImageFormat>,
    pub kind: SourceKind,
    pub canvas: Option<(u32, u32)>,
    pub frames: Vec<FrameInfo>,
    /// Encoded loop count, 0 meaning forever
    pub loop_count: Option<u32>,
    /// The walk reached the end of the source without error
    pub finished: bool,
    pub is_final: bool,
    pub byte_len: usize,
    /// Pixels of a still image, decoded once its final bytes are in
    still: Option<RgbaImage>,
}

impl SourceSnapshot {
    fn empty(byte_len: usize, is_final: bool) -> Self {
        Self {
            format: None,
            kind: SourceKind::Unknown,
            canvas: None,
            frames: Vec::new(),
            loop_count: None,
            finished: false,
            is_final,
            byte_len,
            still: None,
        }
    }

    /// Probes `data`, returning the snapshot and the first problem met
    pub fn probe(
        data: &[u8],
        is_final: bool,
        config: &BackendConfig,
    ) -> (Self, Option<BackendError>) {
        let mut snapshot = Self::empty(data.len(), is_final);

        let format = match image::guess_format(data) {
            Ok(format) => format,
            Err(_) => {
                // Short prefixes may simply not contain the magic yet.
                let error = is_final.then_some(BackendError::UnknownFormat);
                return (snapshot, error);
            }
        };
        snapshot.format = Some(format);

        let error = match format {
            ImageFormat::Gif => snapshot.probe_gif(data, config),
            ImageFormat::Png => match png_animation(data) {
                Ok((canvas, Some(num_plays))) => {
                    snapshot.probe_animated_png(data, canvas, num_plays, config)
                }
                _ => snapshot.probe_still(data, format),
            },
            _ => snapshot.probe_still(data, format),
        };

        debug!(
            "Probed {} bytes as {:?}: {} frames, finished={}",
            data.len(),
            snapshot.kind,
            snapshot.frame_count(),
            snapshot.finished
        );

        (snapshot, error)
    }

    /// Frames the backend recognises
    ///
    /// A still image counts as one frame once its header is readable, even
    /// before its pixels decode.
    pub fn frame_count(&self) -> usize {
        match self.kind {
            SourceKind::Unknown => 0,
            SourceKind::Still => usize::from(self.canvas.is_some()),
            SourceKind::Gif | SourceKind::AnimatedPng => self.frames.len(),
        }
    }

    pub fn frame_status(&self, index: usize) -> SourceStatus {
        let complete = match self.kind {
            SourceKind::Unknown => false,
            // Lenient codecs decode truncated stills; only trust final data.
            SourceKind::Still => index == 0 && self.still.is_some(),
            SourceKind::Gif | SourceKind::AnimatedPng => index < self.frames.len(),
        };

        if complete {
            SourceStatus::Complete
        } else {
            SourceStatus::Incomplete
        }
    }

    pub fn status(&self) -> SourceStatus {
        if self.is_final && self.finished && self.frame_count() > 0 {
            SourceStatus::Complete
        } else {
            SourceStatus::Incomplete
        }
    }

    /// Frame dimensions; animation frames are composited onto the canvas
    pub fn frame_dimensions(&self, index: usize) -> Option<(u32, u32)> {
        if index < self.frame_count() {
            self.canvas
        } else {
            None
        }
    }

    pub fn frame_delay(&self, index: usize) -> Option<f64> {
        self.frames.get(index).map(|frame| frame.delay)
    }

    /// Decodes the pixels of frame `index` from `data`
    ///
    /// `data` must be the bytes this snapshot was probed from. Animation
    /// frames are composited in order, so frame `n` costs decoding frames
    /// `0..=n`.
    pub fn decode_frame(
        &self,
        data: &[u8],
        index: usize,
        config: &BackendConfig,
    ) -> Result<Option<RgbaImage>, BackendError> {
        if index >= self.frame_count() {
            return Ok(None);
        }

        match (self.kind, self.format) {
            (SourceKind::Still, Some(format)) => {
                if let Some(image) = &self.still {
                    return Ok(Some(image.clone()));
                }
                // Final data that did not decode was reported by the probe.
                if self.is_final || !config.eager_static_decode {
                    return Ok(None);
                }
                let image = image::load_from_memory_with_format(data, format)?;
                Ok(Some(image.into_rgba8()))
            }
            (SourceKind::Gif, _) => {
                let decoder = GifDecoder::new(Cursor::new(data))?;
                nth_frame(decoder.into_frames(), index)
            }
            (SourceKind::AnimatedPng, _) => {
                let decoder = PngDecoder::new(Cursor::new(data))?;
                nth_frame(decoder.apng()?.into_frames(), index)
            }
            _ => Ok(None),
        }
    }

    fn probe_still(&mut self, data: &[u8], format: ImageFormat) -> Option<BackendError> {
        self.kind = SourceKind::Still;

        match ImageReader::with_format(Cursor::new(data), format).into_dimensions() {
            Ok(dimensions) => self.canvas = Some(dimensions),
            Err(e) => return Some(e.into()),
        }

        if !self.is_final {
            return None;
        }

        match image::load_from_memory_with_format(data, format) {
            Ok(image) => {
                self.still = Some(image.into_rgba8());
                self.finished = true;
                None
            }
            Err(e) => Some(e.into()),
        }
    }

    /// Indexes GIF frames without LZW-decoding them
    ///
    /// A frame counts once its compressed data, block terminator included,
    /// has arrived.
    fn probe_gif(&mut self, data: &[u8], config: &BackendConfig) -> Option<BackendError> {
        self.kind = SourceKind::Gif;

        let mut options = gif::DecodeOptions::new();
        options.skip_frame_decoding(true);
        let mut decoder = match options.read_info(Cursor::new(data)) {
            Ok(decoder) => decoder,
            Err(e) => return Some(e.into()),
        };
        self.canvas = Some((u32::from(decoder.width()), u32::from(decoder.height())));

        let error = loop {
            match decoder.read_next_frame() {
                Ok(Some(frame)) => {
                    if self.frames.len() >= config.max_frames {
                        break Some(BackendError::FrameLimit {
                            limit: config.max_frames,
                        });
                    }
                    // GIF delays are in hundredths of a second.
                    self.frames.push(FrameInfo {
                        delay: f64::from(frame.delay) / 100.0,
                    });
                }
                Ok(None) => {
                    self.finished = true;
                    break None;
                }
                Err(e) => break Some(e.into()),
            }
        };

        // Unknown until the NETSCAPE extension has arrived.
        self.loop_count = match decoder.repeat() {
            gif::Repeat::Infinite => Some(0),
            gif::Repeat::Finite(0) => None,
            gif::Repeat::Finite(n) => Some(u32::from(n)),
        };

        error
    }

    fn probe_animated_png(
        &mut self,
        data: &[u8],
        canvas: (u32, u32),
        num_plays: u32,
        config: &BackendConfig,
    ) -> Option<BackendError> {
        self.kind = SourceKind::AnimatedPng;
        self.canvas = Some(canvas);
        self.loop_count = Some(num_plays);

        let (scan, error) = apng::scan_frames(data, config.max_frames);
        self.frames = scan
            .delays
            .into_iter()
            .map(|delay| FrameInfo { delay })
            .collect();
        self.finished = scan.finished;

        error
    }
}

fn nth_frame(mut frames: Frames<'_>, index: usize) -> Result<Option<RgbaImage>, BackendError> {
    let frame = frames.nth(index).transpose()?;
    Ok(frame.map(image::Frame::into_buffer))
}

/// Canvas size and APNG `num_plays`, the latter `None` for plain PNG
///
/// Needs the bytes up to the first IDAT, where acTL must appear.
fn png_animation(data: &[u8]) -> Result<((u32, u32), Option<u32>), png::DecodingError> {
    let reader = png::Decoder::new(Cursor::new(data)).read_info()?;
    let info = reader.info();
    Ok((
        (info.width, info.height),
        info.animation_control.map(|actl| actl.num_plays),
    ))
}
