//! Simulated devices.
//!
//! In-memory stand-ins for the frame repository, arm, gripper and dwell that
//! accept every command, track the resulting device state and append each
//! call to a shared [`Journal`]. They back the `kaleido_sim` binary and the
//! engine's tests, and can be told to fault on a given call.

mod arm;
mod frames;
mod gripper;
mod pacer;

pub use arm::SimArm;
pub use frames::SimFrameRepository;
pub use gripper::SimGripper;
pub use pacer::SimPacer;

use std::sync::Arc;
use std::time::Duration;

use kaleido_robotics::{Pose, SlotId};
use parking_lot::Mutex;

use crate::config::ChoreographyConfig;
use crate::planner::{GridLayout, Stage};
use crate::traits::GripperCommand;

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    Resolve(SlotId),
    AttachTool(String),
    VelocityOverride(f64),
    MoveCoarse(Pose),
    MoveLinear(Pose),
    GripperActivate,
    GripperDeactivate,
    GripperMove(GripperCommand),
    Dwell(Duration),
    Plan(Stage),
}

impl SimEvent {
    pub fn is_motion(&self) -> bool {
        matches!(self, SimEvent::MoveCoarse(_) | SimEvent::MoveLinear(_))
    }
}

/// Shared, append-only record of device calls.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    events: Arc<Mutex<Vec<SimEvent>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: SimEvent) {
        self.events.lock().push(event);
    }

    /// Copy of all events so far.
    pub fn events(&self) -> Vec<SimEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

/// A complete simulated cell sharing one journal.
#[derive(Debug, Clone)]
pub struct SimCell {
    pub frames: SimFrameRepository,
    pub arm: SimArm,
    pub gripper: SimGripper,
    pub journal: Journal,
}

impl SimCell {
    /// Devices for `layout`, with slot frames generated on a regular grid.
    pub fn new(config: &ChoreographyConfig, layout: &GridLayout) -> Self {
        let journal = Journal::new();
        Self {
            frames: SimFrameRepository::from_layout(config, layout).with_journal(journal.clone()),
            arm: SimArm::new(journal.clone()),
            gripper: SimGripper::new(journal.clone()),
            journal,
        }
    }

    /// Devices using frames loaded elsewhere.
    pub fn with_frames(frames: SimFrameRepository) -> Self {
        let journal = Journal::new();
        Self {
            frames: frames.with_journal(journal.clone()),
            arm: SimArm::new(journal.clone()),
            gripper: SimGripper::new(journal.clone()),
            journal,
        }
    }
}
