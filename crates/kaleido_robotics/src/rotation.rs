//! The two legal tile turns.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const TOLERANCE: f64 = 1e-9;

/// Rejected rotation value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RotationError {
    /// Only 120° and 240° turns are supported
    #[error("invalid rotation amount {degrees}°: only 120° and 240° turns are supported")]
    InvalidRotationAmount { degrees: f64 },
}

/// How far a tile is turned during one pick-and-turn.
///
/// Serialized as degrees (`120` or `240`), so a layout or plan file holding
/// any other value fails to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum RotationAmount {
    Turn120,
    Turn240,
}

impl RotationAmount {
    pub fn degrees(self) -> f64 {
        match self {
            RotationAmount::Turn120 => 120.0,
            RotationAmount::Turn240 => 240.0,
        }
    }

    pub fn radians(self) -> f64 {
        self.degrees().to_radians()
    }

    pub fn from_degrees(degrees: f64) -> Result<Self, RotationError> {
        if (degrees - 120.0).abs() < TOLERANCE {
            Ok(RotationAmount::Turn120)
        } else if (degrees - 240.0).abs() < TOLERANCE {
            Ok(RotationAmount::Turn240)
        } else {
            Err(RotationError::InvalidRotationAmount { degrees })
        }
    }

    pub fn from_radians(radians: f64) -> Result<Self, RotationError> {
        [RotationAmount::Turn120, RotationAmount::Turn240]
            .into_iter()
            .find(|turn| (turn.radians() - radians).abs() < TOLERANCE)
            .ok_or(RotationError::InvalidRotationAmount {
                degrees: radians.to_degrees(),
            })
    }
}

impl TryFrom<f64> for RotationAmount {
    type Error = RotationError;

    fn try_from(degrees: f64) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees)
    }
}

impl From<RotationAmount> for f64 {
    fn from(turn: RotationAmount) -> f64 {
        turn.degrees()
    }
}

impl std::fmt::Display for RotationAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}
