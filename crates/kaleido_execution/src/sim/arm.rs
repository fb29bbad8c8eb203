use kaleido_robotics::Pose;

use super::{Journal, SimEvent};
use crate::traits::{ArmMotion, DeviceError};

/// Arm that reaches every target instantly.
#[derive(Debug, Clone)]
pub struct SimArm {
    journal: Journal,
    tool: Option<String>,
    velocity_override: f64,
    current: Option<Pose>,
    moves: usize,
    fail_at_move: Option<usize>,
}

impl SimArm {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            tool: None,
            velocity_override: 1.0,
            current: None,
            moves: 0,
            fail_at_move: None,
        }
    }

    /// Fault the `n`-th move (0-based, coarse and linear counted together).
    pub fn fail_at_move(mut self, n: usize) -> Self {
        self.fail_at_move = Some(n);
        self
    }

    pub fn tool(&self) -> Option<&str> {
        self.tool.as_deref()
    }

    pub fn velocity_override(&self) -> f64 {
        self.velocity_override
    }

    /// Moves completed so far.
    pub fn moves(&self) -> usize {
        self.moves
    }

    fn go(&mut self, target: &Pose, event: SimEvent) -> Result<(), DeviceError> {
        if self.fail_at_move == Some(self.moves) {
            return Err(DeviceError::MotionFault(format!("target {target} unreachable")));
        }
        self.journal.record(event);
        self.current = Some(*target);
        self.moves += 1;
        Ok(())
    }
}

impl ArmMotion for SimArm {
    fn device_type(&self) -> &str {
        "sim_arm"
    }

    fn attach_tool(&mut self, tool: &str) -> Result<(), DeviceError> {
        self.journal.record(SimEvent::AttachTool(tool.to_string()));
        self.tool = Some(tool.to_string());
        Ok(())
    }

    fn set_velocity_override(&mut self, factor: f64) -> Result<(), DeviceError> {
        self.journal.record(SimEvent::VelocityOverride(factor));
        self.velocity_override = factor;
        Ok(())
    }

    fn move_coarse(&mut self, target: &Pose) -> Result<(), DeviceError> {
        self.go(target, SimEvent::MoveCoarse(*target))
    }

    fn move_linear(&mut self, target: &Pose) -> Result<(), DeviceError> {
        if self.tool.is_none() {
            return Err(DeviceError::MotionFault("no tool attached".into()));
        }
        self.go(target, SimEvent::MoveLinear(*target))
    }

    fn current_pose(&self) -> Option<Pose> {
        self.current
    }
}
