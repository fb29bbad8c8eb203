//! Pick-and-turn sequencer.
//!
//! Executes one [`Operation`] as a fixed nine-step script:
//!
//! | # | Step          | Device  | Target             |
//! |---|---------------|---------|--------------------|
//! | 1 | open          | gripper | open aperture      |
//! | 2 | approach      | arm PTP | `approach`         |
//! | 3 | descend       | arm LIN | slot pose          |
//! | 4 | close         | gripper | closed aperture    |
//! | 5 | retract       | arm LIN | `approach`         |
//! | 6 | rotate        | arm LIN | `rotated_approach` |
//! | 7 | place         | arm LIN | `rotated_place`    |
//! | 8 | release       | gripper | open aperture      |
//! | 9 | final retreat | arm LIN | `rotated_approach` |
//!
//! Gripper moves block until the fingers settle, so a grasp or release is
//! confirmed before the dependent motion starts. The first failing step
//! aborts the script.

use kaleido_robotics::{derive_waypoints, Waypoints};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ChoreographyConfig, GripperSettings};
use crate::error::ChoreographyError;
use crate::planner::Operation;
use crate::traits::{ArmMotion, DeviceError, FrameRepository, Gripper};

/// Step of the pick-and-turn script, used to report where a fault occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickStep {
    /// Looking up the slot pose (before any motion)
    Resolve,
    Open,
    Approach,
    Descend,
    Close,
    Retract,
    Rotate,
    Place,
    Release,
    FinalRetreat,
}

impl std::fmt::Display for PickStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PickStep::Resolve => "resolve",
            PickStep::Open => "open",
            PickStep::Approach => "approach",
            PickStep::Descend => "descend",
            PickStep::Close => "close",
            PickStep::Retract => "retract",
            PickStep::Rotate => "rotate",
            PickStep::Place => "place",
            PickStep::Release => "release",
            PickStep::FinalRetreat => "final retreat",
        };
        f.write_str(name)
    }
}

/// Drives the arm and gripper through one pick-and-turn.
#[derive(Debug, Clone)]
pub struct PickAndTurnSequencer {
    lateral_offset_mm: f64,
    gripper: GripperSettings,
}

impl PickAndTurnSequencer {
    pub fn new(config: &ChoreographyConfig) -> Self {
        Self {
            lateral_offset_mm: config.lateral_offset_mm,
            gripper: config.gripper.clone(),
        }
    }

    /// Run the nine-step script for `op`.
    ///
    /// The slot pose is resolved once at the start; every waypoint is derived
    /// from it and dropped when the call returns. Returns the waypoints that
    /// were visited.
    pub fn execute<F, A, G>(
        &self,
        op: &Operation,
        frames: &F,
        arm: &mut A,
        gripper: &mut G,
    ) -> Result<Waypoints, ChoreographyError>
    where
        F: FrameRepository + ?Sized,
        A: ArmMotion + ?Sized,
        G: Gripper + ?Sized,
    {
        let fail = move |step: PickStep| {
            move |source: DeviceError| ChoreographyError::PickAndTurn {
                slot: op.slot.clone(),
                step,
                source,
            }
        };

        info!("starting pick and turn at {}", op.slot);

        let source = frames.resolve(&op.slot).map_err(fail(PickStep::Resolve))?;
        let wp = derive_waypoints(&source, op.rotation, self.lateral_offset_mm);

        debug!("open gripper");
        gripper
            .move_to(&self.gripper.open(true))
            .map_err(fail(PickStep::Open))?;

        debug!("approach {}", wp.approach);
        arm.move_coarse(&wp.approach).map_err(fail(PickStep::Approach))?;

        debug!("descend to {}", wp.source);
        arm.move_linear(&wp.source).map_err(fail(PickStep::Descend))?;

        debug!("close gripper");
        gripper
            .move_to(&self.gripper.close(true))
            .map_err(fail(PickStep::Close))?;

        debug!("retract to {}", wp.approach);
        arm.move_linear(&wp.approach).map_err(fail(PickStep::Retract))?;

        debug!("rotate to {}", wp.rotated_approach);
        arm.move_linear(&wp.rotated_approach)
            .map_err(fail(PickStep::Rotate))?;

        debug!("place at {}", wp.rotated_place);
        arm.move_linear(&wp.rotated_place).map_err(fail(PickStep::Place))?;

        debug!("release gripper");
        gripper
            .move_to(&self.gripper.open(true))
            .map_err(fail(PickStep::Release))?;

        debug!("retreat to {}", wp.rotated_approach);
        arm.move_linear(&wp.rotated_approach)
            .map_err(fail(PickStep::FinalRetreat))?;

        info!("completed pick and turn {} degrees", op.rotation.degrees());
        Ok(wp)
    }
}
