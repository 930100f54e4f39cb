//! Backend diagnostics
//!
//! The decode contract reports every failure as absence. These errors are
//! kept on the side so callers can tell "malformed" from "not yet".

use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Errors seen while probing or updating an image source
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Unrecognised image format")]
    UnknownFormat,

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("GIF container error: {0}")]
    Gif(#[from] gif::DecodingError),

    #[error("PNG container error: {0}")]
    Png(#[from] png::DecodingError),

    #[error("Malformed APNG: {0}")]
    MalformedApng(&'static str),

    #[error("Data provider error: {0}")]
    Provider(#[from] io::Error),

    #[error("Frame limit reached: {limit} frames")]
    FrameLimit { limit: usize },

    #[error("Source incomplete: {0}")]
    Incomplete(#[source] Box<BackendError>),
}

impl BackendError {
    /// Whether more bytes could plausibly make this error go away
    pub fn is_truncation(&self) -> bool {
        match self {
            Self::Incomplete(_) => true,
            Self::UnknownFormat | Self::MalformedApng(_) | Self::FrameLimit { .. } => false,
            _ => ends_in_unexpected_eof(self),
        }
    }

    /// Tags codec errors met before the final bytes as incomplete input
    ///
    /// Codecs word running out of data in many ways, so anything they
    /// report on a non-final buffer counts as truncation. Structural and
    /// provider errors keep their own kind.
    pub fn while_streaming(self, is_final: bool) -> Self {
        if is_final {
            return self;
        }
        match self {
            Self::Image(_) | Self::Gif(_) | Self::Png(_) => Self::Incomplete(Box::new(self)),
            other => other,
        }
    }
}

fn ends_in_unexpected_eof(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(error) = current {
        if let Some(io_error) = error.downcast_ref::<io::Error>() {
            if io_error.kind() == io::ErrorKind::UnexpectedEof {
                return true;
            }
        }
        current = error.source();
    }
    false
}
