//! Traits for the hardware collaborators the engine drives.
//!
//! All three are synchronous: a call returns once the collaborator reports
//! completion (or failure). The engine is their only caller.

mod arm;
mod frames;
mod gripper;

pub use arm::ArmMotion;
pub use frames::FrameRepository;
pub use gripper::{Gripper, GripperCommand};

use kaleido_robotics::SlotId;
use thiserror::Error;

/// Error type for device operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeviceError {
    /// The slot identifier is not configured in the frame repository
    #[error("frame not found: {0}")]
    FrameNotFound(SlotId),

    /// The arm cannot reach or execute the target
    #[error("motion fault: {0}")]
    MotionFault(String),

    /// Gripper activation or move was rejected or timed out
    #[error("gripper fault: {0}")]
    GripperFault(String),

    /// Device is not connected
    #[error("device not connected")]
    NotConnected,
}
