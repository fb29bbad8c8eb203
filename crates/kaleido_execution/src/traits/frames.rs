//! FrameRepository trait for slot pose lookup.

use kaleido_robotics::{Pose, SlotId};

use super::DeviceError;

/// Resolves slot identifiers to their currently configured pose.
///
/// Slots are fixed at configuration time; the engine only reads them.
/// Implementations return [`DeviceError::FrameNotFound`] for unknown ids.
pub trait FrameRepository {
    fn resolve(&self, slot: &SlotId) -> Result<Pose, DeviceError>;

    /// Check whether a slot is configured.
    fn contains(&self, slot: &SlotId) -> bool {
        self.resolve(slot).is_ok()
    }
}
