//! Animation repetition count

use serde::Serialize;
use std::fmt;

/// How many times an animated source plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RepetitionCount {
    /// Still image, or no animation table present
    NotAnimated,
    /// Animated with no loop count: play once
    Once,
    /// Loops forever
    Infinite,
    Finite(u32),
}

impl fmt::Display for RepetitionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnimated => write!(f, "not animated"),
            Self::Once => write!(f, "once"),
            Self::Infinite => write!(f, "infinite"),
            Self::Finite(n) => write!(f, "{} times", n),
        }
    }
}
