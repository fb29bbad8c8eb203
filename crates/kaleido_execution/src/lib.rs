//! Choreography engine for the kaleidoscope tile cell.
//!
//! A robot arm with a parallel gripper cycles a grid of hexagonal tiles
//! through three arrangements by picking individual tiles, turning them by
//! 120° or 240° and placing them back.
//!
//! # Architecture
//!
//! ```text
//! CycleController ──▶ PatternPlanner (linear | colour | hexagon)
//!        │                   │ PatternPlan: ordered (slot, turn) pairs
//!        ▼                   ▼
//! PickAndTurnSequencer ──▶ derive_waypoints (kaleido_robotics)
//!        │
//!        ▼
//! FrameRepository · ArmMotion · Gripper   (injected devices)
//! ```
//!
//! - **Planners** walk the [`GridLayout`] table, so the physical grid is
//!   configuration, not code.
//! - **The sequencer** runs the nine-step pick-and-turn script and aborts on
//!   the first device fault.
//! - **The controller** owns gripper initialization, homing, the dwell
//!   between stages and cancellation.
//!
//! # Device Traits
//!
//! - `FrameRepository`: slot id → pose
//! - `ArmMotion`: implemented by the arm driver (PTP and LIN moves)
//! - `Gripper`: implemented by the gripper driver
//!
//! Simulated implementations live in [`sim`] (feature `sim`, on by default).

use cfg_if::cfg_if;

pub mod cancel;
pub mod config;
pub mod controller;
pub mod error;
pub mod planner;
pub mod sequencer;
pub mod status;
pub mod traits;

pub use cancel::{BlockingPacer, CancelToken, Pacer};
pub use config::{ChoreographyConfig, GripperSettings};
pub use controller::{CycleController, InitStep, RunOutcome};
pub use error::ChoreographyError;
pub use planner::{
    planner_for, Cluster, ColourPlanner, ColourScan, GridLayout, HexagonPlanner, LinearPlanner,
    Operation, PatternPlan, PatternPlanner, RowSpan, Stage,
};
pub use sequencer::{PickAndTurnSequencer, PickStep};
pub use status::{CycleState, CycleStatus};
pub use traits::{ArmMotion, DeviceError, FrameRepository, Gripper, GripperCommand};

cfg_if! {
    if #[cfg(feature = "sim")] {
        pub mod sim;

        pub use sim::{Journal, SimArm, SimCell, SimEvent, SimFrameRepository, SimGripper, SimPacer};
    }
}
