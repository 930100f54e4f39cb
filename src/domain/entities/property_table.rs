//! Property table entity
//!
//! Backends describe a source and its frames with loosely-typed keyed
//! tables. The shape differs per container format, so every read goes
//! through a typed getter that yields `None` on absence or mismatch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known property keys
pub mod keys {
    /// Per-frame pixel width
    pub const PIXEL_WIDTH: &str = "PixelWidth";
    /// Per-frame pixel height
    pub const PIXEL_HEIGHT: &str = "PixelHeight";
    /// Size in bytes of the data the backend currently holds
    pub const FILE_SIZE: &str = "FileSize";

    /// GIF-style animation sub-table
    pub const GIF_DICTIONARY: &str = "{GIF}";
    /// PNG-style (APNG) animation sub-table
    pub const PNG_DICTIONARY: &str = "{PNG}";
    /// HEIC image sequence sub-table
    pub const HEICS_DICTIONARY: &str = "{HEICS}";

    /// Frame delay as written by the encoder, in seconds
    pub const UNCLAMPED_DELAY_TIME: &str = "UnclampedDelayTime";
    /// Frame delay possibly clamped by the backend, in seconds
    pub const DELAY_TIME: &str = "DelayTime";
    /// Container-level ordered list of per-frame tables
    pub const FRAME_INFO: &str = "FrameInfo";
    /// Number of times an animation plays (0 = forever)
    pub const LOOP_COUNT: &str = "LoopCount";
    /// Logical screen width of a GIF
    pub const CANVAS_PIXEL_WIDTH: &str = "CanvasPixelWidth";
    /// Logical screen height of a GIF
    pub const CANVAS_PIXEL_HEIGHT: &str = "CanvasPixelHeight";
}

/// A single heterogeneous property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    String(String),
    Table(PropertyTable),
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Returns the number, if this value is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as an unsigned integer
    ///
    /// Only finite, non-negative, integral numbers within `u32` range qualify.
    pub fn as_u32(&self) -> Option<u32> {
        let n = self.as_number()?;
        if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 {
            Some(n as u32)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&PropertyTable> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[PropertyValue]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<u32> for PropertyValue {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<PropertyTable> for PropertyValue {
    fn from(t: PropertyTable) -> Self {
        Self::Table(t)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(l: Vec<PropertyValue>) -> Self {
        Self::List(l)
    }
}

/// Keyed table of property values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyTable {
    entries: BTreeMap<String, PropertyValue>,
}

impl PropertyTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<PropertyValue>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_number()
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key)?.as_u32()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    pub fn get_table(&self, key: &str) -> Option<&PropertyTable> {
        self.get(key)?.as_table()
    }

    pub fn get_list(&self, key: &str) -> Option<&[PropertyValue]> {
        self.get(key)?.as_list()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, PropertyValue)> for PropertyTable {
    fn from_iter<I: IntoIterator<Item = (K, PropertyValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
