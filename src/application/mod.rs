//! Application layer
//!
//! The decode session and the use cases that drive it.

mod decode_session;
pub mod dto;
mod stream_decode;

pub use decode_session::{thumbnail_target, IncrementalDecodeSession, SessionState};
pub use stream_decode::{ProgressCallback, StreamDecodeUseCase};
