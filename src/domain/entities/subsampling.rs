//! Subsampling level entity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rejected subsampling factor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid subsampling factor: {0} (expected 1, 2, 4 or 8)")]
pub struct InvalidSubsamplingLevel(pub String);

/// Decode every Nth pixel per axis
///
/// A closed set: the backend only understands these four factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SubsamplingLevel {
    /// No subsampling
    #[default]
    Level0 = 1,
    Level1 = 2,
    Level2 = 4,
    Level3 = 8,
}

impl SubsamplingLevel {
    /// The level used when the caller does not ask for one
    pub const DEFAULT: SubsamplingLevel = SubsamplingLevel::Level0;

    /// All levels, finest first
    pub const ALL: [SubsamplingLevel; 4] = [
        SubsamplingLevel::Level0,
        SubsamplingLevel::Level1,
        SubsamplingLevel::Level2,
        SubsamplingLevel::Level3,
    ];

    /// Returns the per-axis factor
    pub fn factor(self) -> u32 {
        self as u32
    }

    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }

    /// Applies the factor to a pixel dimension, rounding up
    pub fn scale(self, dimension: u32) -> u32 {
        dimension.div_ceil(self.factor())
    }
}

impl TryFrom<u32> for SubsamplingLevel {
    type Error = InvalidSubsamplingLevel;

    fn try_from(factor: u32) -> Result<Self, Self::Error> {
        match factor {
            1 => Ok(Self::Level0),
            2 => Ok(Self::Level1),
            4 => Ok(Self::Level2),
            8 => Ok(Self::Level3),
            other => Err(InvalidSubsamplingLevel(other.to_string())),
        }
    }
}

impl From<SubsamplingLevel> for u32 {
    fn from(level: SubsamplingLevel) -> Self {
        level.factor()
    }
}

impl FromStr for SubsamplingLevel {
    type Err = InvalidSubsamplingLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map_err(|_| InvalidSubsamplingLevel(s.to_string()))
            .and_then(Self::try_from)
    }
}

impl fmt::Display for SubsamplingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1/{}", self.factor())
    }
}
