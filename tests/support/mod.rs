//! Shared test helpers
//!
//! `ScriptedBackend` answers every query from tables set up by the test
//! and records which backend entry points the session used.

#![allow(dead_code)]

pub mod images;

use incremental_decoder::domain::entities::{keys, ImageSourceOptions, PropertyTable, PropertyValue};
use incremental_decoder::domain::repositories::{DataProvider, DecodeBackend, SourceStatus};
use std::cell::RefCell;

/// Backend entry point observed by a [`ScriptedBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Update { bytes: usize, is_final: bool },
    ProviderUpdate { bytes: usize, is_final: bool },
    StatusAtIndex(usize),
    Status,
    CreateImage(usize),
    CreateThumbnail(usize),
}

/// What a scripted backend "decodes"
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedImage {
    pub index: usize,
    pub options: ImageSourceOptions,
}

#[derive(Debug, Clone)]
pub struct ScriptedFrame {
    /// `None` means the frame cannot be described yet
    pub properties: Option<PropertyTable>,
    pub status: SourceStatus,
}

impl ScriptedFrame {
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            properties: Some(
                PropertyTable::new()
                    .with(keys::PIXEL_WIDTH, width)
                    .with(keys::PIXEL_HEIGHT, height),
            ),
            status: SourceStatus::Complete,
        }
    }

    pub fn undescribed() -> Self {
        Self {
            properties: None,
            status: SourceStatus::Incomplete,
        }
    }

    pub fn with_table(mut self, key: &str, table: PropertyTable) -> Self {
        if let Some(properties) = self.properties.as_mut() {
            properties.insert(key, table);
        }
        self
    }

    pub fn with_status(mut self, status: SourceStatus) -> Self {
        self.status = status;
        self
    }
}

#[derive(Debug)]
pub struct ScriptedBackend {
    pub frames: Vec<ScriptedFrame>,
    pub container: Option<PropertyTable>,
    pub source_status: SourceStatus,
    pub sequence_capable: bool,
    pub received: Vec<u8>,
    pub is_final: bool,
    calls: RefCell<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn with_frames(frames: Vec<ScriptedFrame>) -> Self {
        Self {
            frames,
            ..Self::create_incremental()
        }
    }

    pub fn with_container(mut self, container: PropertyTable) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_source_status(mut self, status: SourceStatus) -> Self {
        self.source_status = status;
        self
    }

    pub fn sequence_capable(mut self) -> Self {
        self.sequence_capable = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl DecodeBackend for ScriptedBackend {
    type Image = ScriptedImage;

    fn create_incremental() -> Self {
        Self {
            frames: Vec::new(),
            container: None,
            source_status: SourceStatus::Incomplete,
            sequence_capable: false,
            received: Vec::new(),
            is_final: false,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn supports_sequence_format(&self) -> bool {
        self.sequence_capable
    }

    fn update_data(&mut self, bytes: &[u8], is_final: bool) {
        self.received.extend_from_slice(bytes);
        self.is_final = is_final;
        self.record(Call::Update {
            bytes: bytes.len(),
            is_final,
        });
    }

    fn update_data_provider(&mut self, provider: &dyn DataProvider, is_final: bool) {
        let bytes = provider.copy_bytes().unwrap_or_default();
        self.received = bytes.to_vec();
        self.is_final = is_final;
        self.record(Call::ProviderUpdate {
            bytes: bytes.len(),
            is_final,
        });
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn properties_at_index(
        &self,
        index: usize,
        options: &ImageSourceOptions,
    ) -> Option<PropertyTable> {
        let mut properties = self.frames.get(index)?.properties.clone()?;
        let level = options.subsampling();
        for key in [keys::PIXEL_WIDTH, keys::PIXEL_HEIGHT] {
            if let Some(dimension) = properties.get_u32(key) {
                properties.insert(key, level.scale(dimension));
            }
        }
        Some(properties)
    }

    fn properties(&self, _options: &ImageSourceOptions) -> Option<PropertyTable> {
        self.container.clone()
    }

    fn status_at_index(&self, index: usize) -> SourceStatus {
        self.record(Call::StatusAtIndex(index));
        self.frames
            .get(index)
            .map(|frame| frame.status)
            .unwrap_or(SourceStatus::Incomplete)
    }

    fn status(&self) -> SourceStatus {
        self.record(Call::Status);
        self.source_status
    }

    fn create_image_at_index(
        &self,
        index: usize,
        options: &ImageSourceOptions,
    ) -> Option<ScriptedImage> {
        self.record(Call::CreateImage(index));
        self.frames.get(index)?.properties.as_ref()?;
        Some(ScriptedImage {
            index,
            options: *options,
        })
    }

    fn create_thumbnail_at_index(
        &self,
        index: usize,
        options: &ImageSourceOptions,
    ) -> Option<ScriptedImage> {
        self.record(Call::CreateThumbnail(index));
        self.frames.get(index)?.properties.as_ref()?;
        Some(ScriptedImage {
            index,
            options: *options,
        })
    }
}

/// `{ UnclampedDelayTime = delay; DelayTime = delay }`
pub fn delay_table(delay: f64) -> PropertyTable {
    PropertyTable::new()
        .with(keys::UNCLAMPED_DELAY_TIME, delay)
        .with(keys::DELAY_TIME, delay)
}

/// GIF frames of one size with the given delays
pub fn gif_frames(width: u32, height: u32, delays: &[f64]) -> Vec<ScriptedFrame> {
    delays
        .iter()
        .map(|&delay| {
            ScriptedFrame::sized(width, height).with_table(keys::GIF_DICTIONARY, delay_table(delay))
        })
        .collect()
}

/// Container table with a `{HEICS}` frame-info list
pub fn heics_container(delays: &[f64]) -> PropertyTable {
    let frame_info: Vec<PropertyValue> = delays
        .iter()
        .map(|&delay| PropertyValue::from(PropertyTable::new().with(keys::DELAY_TIME, delay)))
        .collect();

    PropertyTable::new().with(
        keys::HEICS_DICTIONARY,
        PropertyTable::new().with(keys::FRAME_INFO, frame_info),
    )
}
