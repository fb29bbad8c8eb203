#![cfg(feature = "sim")]

use std::time::Duration;

use kaleido_execution::{
    ArmMotion, CancelToken, ChoreographyConfig, ChoreographyError, CycleController, CycleState,
    DeviceError, GridLayout, InitStep, Journal, PatternPlan, PatternPlanner, RunOutcome, SimArm,
    SimCell, SimEvent, SimPacer, Stage, planner_for,
};
use kaleido_robotics::Pose;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn test_config() -> ChoreographyConfig {
    let mut config = ChoreographyConfig::default().with_dwell(Duration::from_millis(5));
    config.gripper.reset_pause_ms = 0;
    config
}

/// Built-in planner that also records each invocation in the journal.
struct RecordingPlanner {
    stage: Stage,
    journal: Journal,
}

impl PatternPlanner for RecordingPlanner {
    fn stage(&self) -> Stage {
        self.stage
    }

    fn plan(&self, layout: &GridLayout) -> PatternPlan {
        self.journal.record(SimEvent::Plan(self.stage));
        planner_for(self.stage).plan(layout)
    }
}

/// Arm that cancels the token once it has completed `after` moves.
struct CancellingArm {
    inner: SimArm,
    token: CancelToken,
    after: usize,
}

impl ArmMotion for CancellingArm {
    fn device_type(&self) -> &str {
        "cancelling_arm"
    }

    fn attach_tool(&mut self, tool: &str) -> Result<(), DeviceError> {
        self.inner.attach_tool(tool)
    }

    fn set_velocity_override(&mut self, factor: f64) -> Result<(), DeviceError> {
        self.inner.set_velocity_override(factor)
    }

    fn move_coarse(&mut self, target: &Pose) -> Result<(), DeviceError> {
        self.inner.move_coarse(target)?;
        self.check();
        Ok(())
    }

    fn move_linear(&mut self, target: &Pose) -> Result<(), DeviceError> {
        self.inner.move_linear(target)?;
        self.check();
        Ok(())
    }
}

impl CancellingArm {
    fn check(&self) {
        if self.inner.moves() >= self.after {
            self.token.cancel();
        }
    }
}

#[test]
fn test_run_visits_stages_in_fixed_order_with_dwell_between() {
    init_tracing();
    let config = test_config();
    let layout = GridLayout::default();
    let cell = SimCell::new(&config, &layout);
    let journal = cell.journal.clone();

    let mut controller = CycleController::new(config, layout, cell.frames, cell.arm, cell.gripper)
        .unwrap()
        .with_pacer(SimPacer::new(journal.clone()).cancel_after(5));
    for stage in Stage::ALL {
        controller = controller.with_planner(Box::new(RecordingPlanner {
            stage,
            journal: journal.clone(),
        }));
    }

    controller.initialize().unwrap();
    let outcome = controller.run().unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled { stages_completed: 4 });

    let pacing: Vec<SimEvent> = journal
        .events()
        .into_iter()
        .filter(|e| matches!(e, SimEvent::Plan(_) | SimEvent::Dwell(_)))
        .collect();
    let dwell = SimEvent::Dwell(Duration::from_millis(5));
    assert_eq!(
        pacing,
        vec![
            dwell.clone(),
            SimEvent::Plan(Stage::Linear),
            dwell.clone(),
            SimEvent::Plan(Stage::Colour),
            dwell.clone(),
            SimEvent::Plan(Stage::Hexagon),
            dwell.clone(),
            SimEvent::Plan(Stage::Linear),
            dwell,
        ]
    );

    let status = controller.status();
    assert_eq!(status.state, CycleState::Linear);
    assert_eq!(status.cycles_completed, 1);
    assert!(!status.executing);
}

#[test]
fn test_run_stages_executes_every_operation() {
    let config = test_config();
    let layout = GridLayout::default();
    let cell = SimCell::new(&config, &layout);
    let journal = cell.journal.clone();

    let mut controller = CycleController::new(config, layout, cell.frames, cell.arm, cell.gripper)
        .unwrap()
        .with_pacer(SimPacer::new(journal.clone()));
    controller.initialize().unwrap();

    let outcome = controller.run_stages(3).unwrap();
    assert_eq!(outcome, RunOutcome::Completed { stages_completed: 3 });

    // 40 linear + 36 colour + 50 hexagon, one resolve each (home resolved at initialize)
    let resolves = journal
        .events()
        .iter()
        .filter(|e| matches!(e, SimEvent::Resolve(_)))
        .count();
    assert_eq!(resolves, 1 + 40 + 36 + 50);

    // one home move plus six arm moves per pick-and-turn
    assert_eq!(controller.arm().moves(), 1 + 6 * 126);
    assert_eq!(controller.status().cycles_completed, 1);
    assert_eq!(controller.status().operations_completed, 50);
}

#[test]
fn test_initialization_sequence() {
    let config = test_config();
    let layout = GridLayout::default();
    let cell = SimCell::new(&config, &layout);
    let journal = cell.journal.clone();
    let home = config.home_slot.clone();

    let mut controller = CycleController::new(config.clone(), layout, cell.frames, cell.arm, cell.gripper)
        .unwrap()
        .with_pacer(SimPacer::new(journal.clone()));
    controller.initialize().unwrap();
    assert!(controller.is_initialized());
    controller.run_stages(0).unwrap();

    let events = journal.events();
    assert_eq!(events[0], SimEvent::AttachTool("Robotiq_2F85".into()));
    assert_eq!(events[1], SimEvent::VelocityOverride(0.3));
    assert_eq!(events[2], SimEvent::Resolve(home));
    assert_eq!(events[3], SimEvent::GripperDeactivate);
    assert_eq!(events[4], SimEvent::GripperActivate);
    assert_eq!(events[5], SimEvent::GripperMove(config.gripper.open(false)));
    assert!(matches!(events[6], SimEvent::MoveCoarse(_)));
    assert_eq!(events.len(), 7);
    assert_eq!(controller.gripper().aperture_mm(), Some(35.0));
}

#[test]
fn test_run_requires_initialize() {
    let config = test_config();
    let layout = GridLayout::default();
    let cell = SimCell::new(&config, &layout);
    let journal = cell.journal.clone();

    let mut controller = CycleController::new(config, layout, cell.frames, cell.arm, cell.gripper).unwrap();
    assert!(matches!(controller.run(), Err(ChoreographyError::NotInitialized)));
    assert!(journal.is_empty());
}

#[test]
fn test_missing_slot_frame_rejected_at_initialize() {
    let config = test_config();
    let layout = GridLayout::default();
    let mut cell = SimCell::new(&config, &layout);
    cell.frames.remove(&layout.slot(46));

    let mut controller =
        CycleController::new(config, layout, cell.frames, cell.arm, cell.gripper).unwrap();
    let err = controller.initialize().unwrap_err();

    match err {
        ChoreographyError::Init { step, source } => {
            assert_eq!(step, InitStep::ResolveSlots);
            assert_eq!(
                source,
                DeviceError::FrameNotFound("/Kalidescope/P46".into())
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!controller.is_initialized());
}

#[test]
fn test_motion_fault_aborts_run() {
    let config = test_config();
    let layout = GridLayout::default();
    let cell = SimCell::new(&config, &layout);
    let journal = cell.journal.clone();
    // move 0 is homing; 1 + 6*2 starts the third pick-and-turn, +2 is its retract
    let arm = cell.arm.fail_at_move(1 + 6 * 2 + 2);

    let mut controller = CycleController::new(config, layout, cell.frames, arm, cell.gripper)
        .unwrap()
        .with_pacer(SimPacer::new(journal.clone()));
    controller.initialize().unwrap();

    let err = controller.run().unwrap_err();
    match &err {
        ChoreographyError::PickAndTurn { slot, step, source } => {
            // third linear operation: P18
            assert_eq!(slot.as_str(), "/Kalidescope/P18");
            assert_eq!(step.to_string(), "retract");
            assert!(matches!(source, DeviceError::MotionFault(_)));
        }
        other => panic!("unexpected error: {other}"),
    }

    let status = controller.status();
    assert_eq!(status.operations_completed, 2);
    assert_eq!(status.stages_completed, 0);
    assert!(status.last_error.is_some());
    assert!(matches!(journal.events().last(), Some(SimEvent::GripperMove(_))));
}

#[test]
fn test_cancel_waits_for_operation_in_progress() {
    let config = test_config();
    let layout = GridLayout::default();
    let cell = SimCell::new(&config, &layout);
    let journal = cell.journal.clone();
    let token = CancelToken::new();

    // cancel during the descend of the third pick-and-turn
    let arm = CancellingArm {
        inner: cell.arm,
        token: token.clone(),
        after: 1 + 6 * 2 + 2,
    };

    let mut controller = CycleController::new(config, layout, cell.frames, arm, cell.gripper)
        .unwrap()
        .with_cancel_token(token)
        .with_pacer(SimPacer::new(journal.clone()));
    controller.initialize().unwrap();

    let outcome = controller.run().unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled { stages_completed: 0 });
    assert_eq!(controller.status().operations_completed, 3);

    // the third operation finished with the tile released and the arm clear
    let events = journal.events();
    let n = events.len();
    assert!(matches!(events[n - 2], SimEvent::GripperMove(cmd) if cmd.aperture_mm == 35.0));
    assert!(matches!(events[n - 1], SimEvent::MoveLinear(_)));
}

#[test]
fn test_every_operation_grips_before_retreat_and_releases_before_final_retreat() {
    let config = test_config();
    let layout = GridLayout::default();
    let cell = SimCell::new(&config, &layout);
    let journal = cell.journal.clone();

    let mut controller = CycleController::new(config.clone(), layout, cell.frames, cell.arm, cell.gripper)
        .unwrap()
        .with_pacer(SimPacer::new(journal.clone()));
    controller.initialize().unwrap();
    journal.clear();
    controller.run_stages(3).unwrap();

    let events: Vec<SimEvent> = journal
        .events()
        .into_iter()
        .skip_while(|e| !matches!(e, SimEvent::Resolve(_)))
        .filter(|e| !matches!(e, SimEvent::Dwell(_)))
        .collect();
    let close = config.gripper.close(true);
    let open = config.gripper.open(true);

    let ops: Vec<&[SimEvent]> = events.chunks(10).collect();
    assert_eq!(ops.len(), 126);
    for op in ops {
        assert!(matches!(op[0], SimEvent::Resolve(_)));
        assert_eq!(op[1], SimEvent::GripperMove(open));
        assert!(matches!(op[2], SimEvent::MoveCoarse(_)));
        assert_eq!(op[4], SimEvent::GripperMove(close));
        assert!(matches!(op[5], SimEvent::MoveLinear(_)));
        assert_eq!(op[8], SimEvent::GripperMove(open));
        assert_eq!(op[9], op[6]);
    }
}
