//! Data transfer objects

mod stream_options;
mod stream_report;

pub use stream_options::StreamOptions;
pub use stream_report::{FrameReport, StreamProgress, StreamReport};
