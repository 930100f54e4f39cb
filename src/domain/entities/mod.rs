//! Domain entities
//!
//! Value types shared by the session, the metadata resolver and backends.

mod decoding_options;
mod property_table;
mod repetition_count;
mod source_options;
mod subsampling;

pub use decoding_options::{
    DecodingMode, DecodingOptions, DrawingSize, FrameSize, InvalidDrawingSize,
};
pub use property_table::{keys, PropertyTable, PropertyValue};
pub use repetition_count::RepetitionCount;
pub use source_options::ImageSourceOptions;
pub use subsampling::{InvalidSubsamplingLevel, SubsamplingLevel};
