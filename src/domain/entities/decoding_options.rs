//! Decoding options entity
//!
//! Caller-supplied, per-decode-call settings plus the size types they use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How a frame should be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecodingMode {
    /// Exact decode at native resolution (subject to subsampling)
    Synchronous,
    /// Thumbnail-path decode, bounded by the drawing size
    #[default]
    Asynchronous,
}

/// Pixel dimensions as reported by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the pixel count
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Target on-screen size, in (possibly fractional) pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingSize {
    pub width: f64,
    pub height: f64,
}

impl DrawingSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Returns the larger of the two dimensions
    pub fn max_dimension(&self) -> f64 {
        self.width.max(self.height)
    }
}

impl From<FrameSize> for DrawingSize {
    fn from(size: FrameSize) -> Self {
        Self {
            width: f64::from(size.width),
            height: f64::from(size.height),
        }
    }
}

/// Rejected `WIDTHxHEIGHT` string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid size '{0}': expected WIDTHxHEIGHT, e.g. 320x240")]
pub struct InvalidDrawingSize(pub String);

impl FromStr for DrawingSize {
    type Err = InvalidDrawingSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidDrawingSize(s.to_string());
        let (w, h) = s.split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: f64 = w.trim().parse().map_err(|_| invalid())?;
        let height: f64 = h.trim().parse().map_err(|_| invalid())?;
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

/// Per-call decoding options
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DecodingOptions {
    pub mode: DecodingMode,
    /// Only consulted in asynchronous mode
    pub size_for_drawing: Option<DrawingSize>,
}

impl DecodingOptions {
    /// Asynchronous, no drawing size
    pub const DEFAULT: DecodingOptions = DecodingOptions {
        mode: DecodingMode::Asynchronous,
        size_for_drawing: None,
    };

    pub fn synchronous() -> Self {
        Self {
            mode: DecodingMode::Synchronous,
            size_for_drawing: None,
        }
    }

    pub fn asynchronous(size_for_drawing: Option<DrawingSize>) -> Self {
        Self {
            mode: DecodingMode::Asynchronous,
            size_for_drawing,
        }
    }
}
