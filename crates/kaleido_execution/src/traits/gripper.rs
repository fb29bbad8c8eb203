//! Gripper trait and command type.

use serde::{Deserialize, Serialize};

use super::DeviceError;

/// One gripper move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GripperCommand {
    /// Target finger aperture in mm
    pub aperture_mm: f64,

    /// Finger speed (device units, 0-255 on Robotiq-style grippers)
    pub speed: u8,

    /// Grip force (device units)
    pub force: u8,

    /// Block until the fingers stop moving
    pub wait: bool,
}

/// Trait for the parallel gripper on the tool flange.
///
/// # Implementation Notes
///
/// - `move_to()` with `wait == true` must not return before the fingers have
///   settled; the sequencer relies on this before moving a held tile
/// - `activate()` is expected after `deactivate()` to clear a faulted state
pub trait Gripper {
    /// Unique identifier for this device type.
    fn device_type(&self) -> &str;

    fn activate(&mut self) -> Result<(), DeviceError>;

    fn deactivate(&mut self) -> Result<(), DeviceError>;

    fn move_to(&mut self, cmd: &GripperCommand) -> Result<(), DeviceError>;

    /// Check if the gripper is activated and not faulted.
    fn is_ready(&self) -> bool;
}
