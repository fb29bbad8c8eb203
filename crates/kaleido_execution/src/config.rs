//! Engine configuration.
//!
//! Every field has a default matching the physical cell, so an empty JSON
//! object (`{}`) is a valid configuration file.

use std::path::Path;
use std::time::Duration;

use kaleido_robotics::SlotId;
use serde::{Deserialize, Serialize};

use crate::error::ChoreographyError;
use crate::traits::GripperCommand;

/// Gripper apertures and motion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GripperSettings {
    /// Aperture when releasing / approaching a tile (mm)
    pub open_mm: f64,
    /// Aperture when holding a tile (mm)
    pub closed_mm: f64,
    pub speed: u8,
    pub force: u8,
    /// Pause between deactivate and activate during gripper init
    pub reset_pause_ms: u64,
}

impl Default for GripperSettings {
    fn default() -> Self {
        Self {
            open_mm: 35.0,
            closed_mm: 24.0,
            speed: 50,
            force: 25,
            reset_pause_ms: 100,
        }
    }
}

impl GripperSettings {
    pub fn open(&self, wait: bool) -> GripperCommand {
        self.command(self.open_mm, wait)
    }

    pub fn close(&self, wait: bool) -> GripperCommand {
        self.command(self.closed_mm, wait)
    }

    pub fn reset_pause(&self) -> Duration {
        Duration::from_millis(self.reset_pause_ms)
    }

    fn command(&self, aperture_mm: f64, wait: bool) -> GripperCommand {
        GripperCommand {
            aperture_mm,
            speed: self.speed,
            force: self.force,
            wait,
        }
    }
}

/// Configuration for the choreography engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreographyConfig {
    /// Stand-off along the lateral axis before turning a tile (mm)
    pub lateral_offset_mm: f64,

    pub gripper: GripperSettings,

    /// Pause before entering each stage (ms)
    pub dwell_ms: u64,

    /// Arm speed override applied at initialize, in (0, 1]
    pub velocity_override: f64,

    /// Frame resolved as the home pose
    pub home_slot: SlotId,

    /// Tool attached to the flange at initialize
    pub tool: String,
}

impl Default for ChoreographyConfig {
    fn default() -> Self {
        Self {
            lateral_offset_mm: 65.0,
            gripper: GripperSettings::default(),
            dwell_ms: 10_000,
            velocity_override: 0.3,
            home_slot: SlotId::new("/Kalidescope/Home"),
            tool: "Robotiq_2F85".to_string(),
        }
    }
}

impl ChoreographyConfig {
    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ChoreographyError> {
        let config: Self = crate::error::load_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    pub fn with_dwell(mut self, dwell: Duration) -> Self {
        self.dwell_ms = dwell.as_millis() as u64;
        self
    }

    pub fn validate(&self) -> Result<(), ChoreographyError> {
        if !self.lateral_offset_mm.is_finite() || self.lateral_offset_mm <= 0.0 {
            return Err(ChoreographyError::InvalidConfig(format!(
                "lateral_offset_mm must be positive, got {}",
                self.lateral_offset_mm
            )));
        }
        if self.gripper.open_mm <= self.gripper.closed_mm {
            return Err(ChoreographyError::InvalidConfig(format!(
                "gripper open aperture ({} mm) must exceed closed aperture ({} mm)",
                self.gripper.open_mm, self.gripper.closed_mm
            )));
        }
        if !(self.velocity_override > 0.0 && self.velocity_override <= 1.0) {
            return Err(ChoreographyError::InvalidConfig(format!(
                "velocity_override must be in (0, 1], got {}",
                self.velocity_override
            )));
        }
        if self.tool.is_empty() {
            return Err(ChoreographyError::InvalidConfig("tool name is empty".into()));
        }
        Ok(())
    }
}
