//! Domain services
//!
//! Stateless logic layered over the repository traits.

mod decode_options;
mod frame_metadata;

pub use decode_options::DecodeOptionsBuilder;
pub use frame_metadata::{
    apply_duration_floor, FrameMetadataResolver, FALLBACK_FRAME_DURATION, MINIMUM_FRAME_DURATION,
};
