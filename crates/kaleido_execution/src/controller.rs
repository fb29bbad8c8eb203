//! Cycle controller - the engine entry point.
//!
//! # State machine
//!
//! ```text
//! INIT ──dwell──▶ LINEAR ──dwell──▶ COLOUR ──dwell──▶ HEXAGON ──dwell──┐
//!                   ▲                                                 │
//!                   └─────────────────────────────────────────────────┘
//! ```
//!
//! `INIT` resets and activates the gripper and homes the arm. Every stage
//! entry is preceded by the configured dwell, then the stage's planner builds
//! a fresh plan which is executed front to back and discarded.
//!
//! The loop has no terminal state. It ends when the [`CancelToken`] is
//! cancelled (checked around dwells and between operations), when a stage
//! limit is reached (`run_stages`), or on the first device fault.

use kaleido_robotics::{Pose, SlotId};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::cancel::{BlockingPacer, CancelToken, Pacer};
use crate::config::ChoreographyConfig;
use crate::error::ChoreographyError;
use crate::planner::{
    ColourPlanner, GridLayout, HexagonPlanner, LinearPlanner, PatternPlan, PatternPlanner, Stage,
};
use crate::sequencer::PickAndTurnSequencer;
use crate::status::{CycleState, CycleStatus};
use crate::traits::{ArmMotion, DeviceError, FrameRepository, Gripper};

/// Step of initialization, used to report where a fault occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitStep {
    AttachTool,
    VelocityOverride,
    ResolveHome,
    /// Checking every layout slot is configured
    ResolveSlots,
    GripperReset,
    Home,
}

impl std::fmt::Display for InitStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InitStep::AttachTool => "attach tool",
            InitStep::VelocityOverride => "velocity override",
            InitStep::ResolveHome => "resolve home",
            InitStep::ResolveSlots => "resolve slots",
            InitStep::GripperReset => "gripper reset",
            InitStep::Home => "home",
        };
        f.write_str(name)
    }
}

/// How a run ended without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The requested number of stages ran
    Completed { stages_completed: usize },
    /// The cancel token stopped the run at a safe point
    Cancelled { stages_completed: usize },
}

type BoxedPlanner = Box<dyn PatternPlanner + Send>;

/// Runs the linear → colour → hexagon cycle against the injected devices.
pub struct CycleController<F, A, G, P = BlockingPacer> {
    frames: F,
    arm: A,
    gripper: G,
    pacer: P,
    config: ChoreographyConfig,
    layout: GridLayout,
    planners: [BoxedPlanner; 3],
    sequencer: PickAndTurnSequencer,
    cancel: CancelToken,
    home: Option<Pose>,
    status: CycleStatus,
}

impl<F, A, G> CycleController<F, A, G, BlockingPacer>
where
    F: FrameRepository,
    A: ArmMotion,
    G: Gripper,
{
    /// Create a controller. Configuration and layout are validated here so
    /// bad data is rejected before any device moves.
    pub fn new(
        config: ChoreographyConfig,
        layout: GridLayout,
        frames: F,
        arm: A,
        gripper: G,
    ) -> Result<Self, ChoreographyError> {
        config.validate()?;
        layout.validate()?;

        Ok(Self {
            frames,
            arm,
            gripper,
            pacer: BlockingPacer,
            sequencer: PickAndTurnSequencer::new(&config),
            config,
            layout,
            planners: [
                Box::new(LinearPlanner),
                Box::new(ColourPlanner),
                Box::new(HexagonPlanner),
            ],
            cancel: CancelToken::new(),
            home: None,
            status: CycleStatus::default(),
        })
    }
}

impl<F, A, G, P> CycleController<F, A, G, P>
where
    F: FrameRepository,
    A: ArmMotion,
    G: Gripper,
    P: Pacer,
{
    /// Replace the dwell implementation.
    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> CycleController<F, A, G, Q> {
        CycleController {
            frames: self.frames,
            arm: self.arm,
            gripper: self.gripper,
            pacer,
            config: self.config,
            layout: self.layout,
            planners: self.planners,
            sequencer: self.sequencer,
            cancel: self.cancel,
            home: self.home,
            status: self.status,
        }
    }

    /// Replace the planner used for the planner's stage.
    pub fn with_planner(mut self, planner: BoxedPlanner) -> Self {
        let index = stage_index(planner.stage());
        self.planners[index] = planner;
        self
    }

    /// Use an externally owned cancel token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops `run` at the next safe point.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn status(&self) -> &CycleStatus {
        &self.status
    }

    pub fn config(&self) -> &ChoreographyConfig {
        &self.config
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn arm(&self) -> &A {
        &self.arm
    }

    pub fn gripper(&self) -> &G {
        &self.gripper
    }

    pub fn is_initialized(&self) -> bool {
        self.home.is_some()
    }

    /// Build the plan for `stage` from the layout.
    pub fn plan(&self, stage: Stage) -> PatternPlan {
        self.planners[stage_index(stage)].plan(&self.layout)
    }

    /// One-time setup: attach the tool, apply the speed override, resolve the
    /// home pose and check that every slot the layout uses is configured.
    pub fn initialize(&mut self) -> Result<(), ChoreographyError> {
        let init = |step: InitStep| move |source: DeviceError| ChoreographyError::Init { step, source };

        self.arm
            .attach_tool(&self.config.tool)
            .map_err(init(InitStep::AttachTool))?;
        self.arm
            .set_velocity_override(self.config.velocity_override)
            .map_err(init(InitStep::VelocityOverride))?;

        let home = self
            .frames
            .resolve(&self.config.home_slot)
            .map_err(init(InitStep::ResolveHome))?;

        let missing: Vec<SlotId> = self
            .layout
            .slot_numbers()
            .into_iter()
            .map(|n| self.layout.slot(n))
            .filter(|slot| !self.frames.contains(slot))
            .collect();
        if let Some(first) = missing.first() {
            error!("{} layout slot(s) have no frame: {:?}", missing.len(), missing);
            return Err(ChoreographyError::Init {
                step: InitStep::ResolveSlots,
                source: DeviceError::FrameNotFound(first.clone()),
            });
        }

        info!(
            "initialized: tool {} attached, override {}, home {}",
            self.config.tool, self.config.velocity_override, home
        );
        self.home = Some(home);
        Ok(())
    }

    /// Run the cycle until cancelled or faulted.
    pub fn run(&mut self) -> Result<RunOutcome, ChoreographyError> {
        self.run_until(None)
    }

    /// Run at most `limit` stage entries.
    pub fn run_stages(&mut self, limit: usize) -> Result<RunOutcome, ChoreographyError> {
        self.run_until(Some(limit))
    }

    fn run_until(&mut self, limit: Option<usize>) -> Result<RunOutcome, ChoreographyError> {
        let result = self.drive(limit);
        if let Err(e) = &result {
            error!("choreography stopped: {}", e);
            self.status.last_error = Some(e.to_string());
            self.status.executing = false;
        }
        result
    }

    fn drive(&mut self, limit: Option<usize>) -> Result<RunOutcome, ChoreographyError> {
        let home = self.home.ok_or(ChoreographyError::NotInitialized)?;

        self.status = CycleStatus::default();
        self.initialize_cell(&home)?;
        info!("...initialization complete");

        let mut state = CycleState::Init;
        loop {
            let stages_completed = self.status.stages_completed;
            if self.cancel.is_cancelled() {
                return Ok(self.cancelled());
            }
            if limit.is_some_and(|limit| stages_completed >= limit) {
                return Ok(RunOutcome::Completed { stages_completed });
            }

            let next = state.next();
            let Some(stage) = next.stage() else {
                continue;
            };

            debug!("dwelling {:?} before {} stage", self.config.dwell(), stage);
            self.pacer.dwell(self.config.dwell(), &self.cancel);
            if self.cancel.is_cancelled() {
                return Ok(self.cancelled());
            }

            info!("starting transition to {} stage", stage);
            let plan = self.plan(stage);
            self.status.begin_plan(next, plan.len());
            if !self.execute_plan(&plan)? {
                return Ok(self.cancelled());
            }
            self.status.finish_plan();
            info!("completed transition to {} stage", stage);

            state = next;
            info!("currently in {} stage", stage);
        }
    }

    /// Gripper reset/activation and homing (the INIT state).
    fn initialize_cell(&mut self, home: &Pose) -> Result<(), ChoreographyError> {
        let init = |step: InitStep| move |source: DeviceError| ChoreographyError::Init { step, source };
        self.status.state = CycleState::Init;

        self.gripper
            .deactivate()
            .map_err(init(InitStep::GripperReset))?;
        std::thread::sleep(self.config.gripper.reset_pause());
        self.gripper.activate().map_err(init(InitStep::GripperReset))?;
        self.gripper
            .move_to(&self.config.gripper.open(false))
            .map_err(init(InitStep::GripperReset))?;

        self.arm.move_coarse(home).map_err(init(InitStep::Home))?;
        Ok(())
    }

    /// Execute a plan front to back. Returns `Ok(false)` if cancelled between
    /// operations.
    fn execute_plan(&mut self, plan: &PatternPlan) -> Result<bool, ChoreographyError> {
        for op in plan {
            if self.cancel.is_cancelled() {
                warn!(
                    "cancelled during {} stage after {}/{} operations",
                    plan.stage,
                    self.status.operations_completed,
                    plan.len()
                );
                return Ok(false);
            }
            self.sequencer
                .execute(op, &self.frames, &mut self.arm, &mut self.gripper)?;
            self.status.operation_completed();
        }
        Ok(true)
    }

    fn cancelled(&mut self) -> RunOutcome {
        self.status.executing = false;
        let stages_completed = self.status.stages_completed;
        info!("choreography cancelled after {} stage(s)", stages_completed);
        RunOutcome::Cancelled { stages_completed }
    }
}

fn stage_index(stage: Stage) -> usize {
    match stage {
        Stage::Linear => 0,
        Stage::Colour => 1,
        Stage::Hexagon => 2,
    }
}
