//! Waypoint geometry for a single pick-and-turn.
//!
//! Given the pose of a tile slot, the tool:
//! 1. backs off along the lateral axis to `approach` (clear of neighbours),
//! 2. turns in place to `rotated_approach` (beta decreased by the turn),
//! 3. advances back to `rotated_place` to set the turned tile down.

use serde::{Deserialize, Serialize};

use crate::pose::Pose;
use crate::rotation::RotationAmount;

/// The poses visited by one pick-and-turn, all derived from `source`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoints {
    /// The slot pose itself (grasp pose)
    pub source: Pose,
    /// Stand-off in front of the slot
    pub approach: Pose,
    /// Stand-off with the tile turned
    pub rotated_approach: Pose,
    /// Turned tile back in the slot
    pub rotated_place: Pose,
}

/// Derive the pick-and-turn waypoints for one slot.
///
/// `lateral_offset` is the stand-off distance in mm. The function is pure:
/// the result depends only on its arguments.
pub fn derive_waypoints(source: &Pose, rotation: RotationAmount, lateral_offset: f64) -> Waypoints {
    let approach = source.shifted_lateral(-lateral_offset);
    let rotated_approach = approach.turned_beta(-rotation.radians());
    let rotated_place = rotated_approach.shifted_lateral(lateral_offset);

    Waypoints {
        source: *source,
        approach,
        rotated_approach,
        rotated_place,
    }
}
