//! Incremental image decoding
//!
//! Drives an image-codec backend as bytes arrive, answering frame count,
//! size, completeness and animation timing queries before the whole
//! source is available, and decoding frames either exactly or through a
//! cheaper thumbnail path bounded by a drawing size.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::{IncrementalDecodeSession, SessionState, StreamDecodeUseCase};
pub use domain::entities::{
    DecodingMode, DecodingOptions, DrawingSize, FrameSize, ImageSourceOptions, PropertyTable,
    PropertyValue, RepetitionCount, SubsamplingLevel,
};
pub use domain::repositories::{DataProvider, DecodeBackend, SourceStatus};
pub use domain::services::{DecodeOptionsBuilder, FrameMetadataResolver};
pub use infrastructure::backends::{BackendConfig, BackendError, ImageCrateBackend};
