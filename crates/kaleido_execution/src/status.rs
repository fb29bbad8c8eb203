//! CycleStatus - snapshot of where the engine is in its cycle.
//!
//! The controller updates this after every state change and operation, so
//! an operator display (or a log line) can show progress without touching
//! the devices.

use serde::{Deserialize, Serialize};

use crate::planner::Stage;

/// Engine state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CycleState {
    /// Gripper activation and homing, before the first stage
    #[default]
    Init,
    Linear,
    Colour,
    Hexagon,
}

impl CycleState {
    /// The stage this state executes, `None` for `Init`.
    pub fn stage(self) -> Option<Stage> {
        match self {
            CycleState::Init => None,
            CycleState::Linear => Some(Stage::Linear),
            CycleState::Colour => Some(Stage::Colour),
            CycleState::Hexagon => Some(Stage::Hexagon),
        }
    }

    /// The state entered after this one. `Init` leads into `Linear`.
    pub fn next(self) -> CycleState {
        match self {
            CycleState::Init | CycleState::Hexagon => CycleState::Linear,
            CycleState::Linear => CycleState::Colour,
            CycleState::Colour => CycleState::Hexagon,
        }
    }
}

impl From<Stage> for CycleState {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Linear => CycleState::Linear,
            Stage::Colour => CycleState::Colour,
            Stage::Hexagon => CycleState::Hexagon,
        }
    }
}

/// Progress of the choreography.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleStatus {
    /// Current state
    pub state: CycleState,

    /// True while a stage plan is being executed (false during dwell)
    pub executing: bool,

    /// Stage entries completed since `run` started
    pub stages_completed: usize,

    /// Full linear → colour → hexagon rounds completed
    pub cycles_completed: usize,

    /// Index of the operation in progress within the current plan (0-based)
    pub current_index: usize,

    /// Operations in the current plan
    pub total_operations: usize,

    /// Operations of the current plan confirmed complete
    pub operations_completed: usize,

    /// Message of the fault that stopped the run, if any
    pub last_error: Option<String>,
}

impl CycleStatus {
    /// Reset per-plan progress when a new plan starts.
    pub fn begin_plan(&mut self, state: CycleState, total_operations: usize) {
        self.state = state;
        self.executing = true;
        self.current_index = 0;
        self.total_operations = total_operations;
        self.operations_completed = 0;
    }

    pub fn operation_completed(&mut self) {
        self.operations_completed += 1;
        self.current_index = self.operations_completed;
    }

    /// Record the end of a stage entry.
    pub fn finish_plan(&mut self) {
        self.executing = false;
        self.stages_completed += 1;
        if self.state == CycleState::Hexagon {
            self.cycles_completed += 1;
        }
    }

    /// Fraction of the current plan done, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.total_operations == 0 {
            return 0.0;
        }
        self.operations_completed as f64 / self.total_operations as f64
    }
}
