use super::{Journal, SimEvent};
use crate::traits::{DeviceError, Gripper, GripperCommand};

/// Gripper that settles instantly.
#[derive(Debug, Clone)]
pub struct SimGripper {
    journal: Journal,
    active: bool,
    aperture_mm: Option<f64>,
    moves: usize,
    fail_at_move: Option<usize>,
}

impl SimGripper {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            active: false,
            aperture_mm: None,
            moves: 0,
            fail_at_move: None,
        }
    }

    /// Fault the `n`-th finger move (0-based).
    pub fn fail_at_move(mut self, n: usize) -> Self {
        self.fail_at_move = Some(n);
        self
    }

    /// Last commanded aperture.
    pub fn aperture_mm(&self) -> Option<f64> {
        self.aperture_mm
    }

    pub fn moves(&self) -> usize {
        self.moves
    }
}

impl Gripper for SimGripper {
    fn device_type(&self) -> &str {
        "sim_gripper"
    }

    fn activate(&mut self) -> Result<(), DeviceError> {
        self.journal.record(SimEvent::GripperActivate);
        self.active = true;
        Ok(())
    }

    fn deactivate(&mut self) -> Result<(), DeviceError> {
        self.journal.record(SimEvent::GripperDeactivate);
        self.active = false;
        Ok(())
    }

    fn move_to(&mut self, cmd: &GripperCommand) -> Result<(), DeviceError> {
        if !self.active {
            return Err(DeviceError::GripperFault("gripper not activated".into()));
        }
        if self.fail_at_move == Some(self.moves) {
            return Err(DeviceError::GripperFault(format!(
                "move to {} mm timed out",
                cmd.aperture_mm
            )));
        }
        self.journal.record(SimEvent::GripperMove(*cmd));
        self.aperture_mm = Some(cmd.aperture_mm);
        self.moves += 1;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.active
    }
}
