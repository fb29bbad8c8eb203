//! Tile slot identifiers.
//!
//! A slot names a physical position in the tile grid. The engine never
//! creates poses for slots itself; it hands the identifier to a frame
//! repository, which is conceptually similar to a ROS TF2 frame lookup.

use serde::{Deserialize, Serialize};

/// Identifies a configured tile slot, e.g. `/Kalidescope/P19`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Slot id for a numbered slot under `prefix`.
    pub fn numbered(prefix: &str, number: u32) -> Self {
        Self(format!("{prefix}{number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing slot number, if the identifier ends in digits.
    pub fn number(&self) -> Option<u32> {
        let digits = self.0.len() - self.0.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return None;
        }
        self.0[self.0.len() - digits..].parse().ok()
    }
}

impl From<&str> for SlotId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SlotId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for SlotId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
