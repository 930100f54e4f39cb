//! Stream report DTOs

use crate::application::SessionState;
use crate::domain::entities::RepetitionCount;
use serde::Serialize;

/// Snapshot taken after each appended chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamProgress {
    pub bytes_received: u64,
    pub total_bytes: u64,
    pub frame_count: usize,
    pub complete_frames: usize,
}

impl StreamProgress {
    /// Returns the received share as a percentage (0.0 - 100.0)
    pub fn percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            return 100.0;
        }
        (self.bytes_received as f64 / self.total_bytes as f64) * 100.0
    }
}

/// Per-frame line of a stream report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub index: usize,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub complete: bool,
    /// Display duration in seconds
    pub duration: Option<f64>,
}

/// Outcome of streaming a whole source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamReport {
    pub bytes: u64,
    pub chunks: usize,
    pub state: SessionState,
    pub repetition: RepetitionCount,
    pub frames: Vec<FrameReport>,
}

impl StreamReport {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn complete_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.complete).count()
    }

    /// Sum of all known frame durations, in seconds
    pub fn total_duration(&self) -> f64 {
        self.frames.iter().filter_map(|f| f.duration).sum()
    }
}
