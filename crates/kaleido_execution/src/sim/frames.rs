use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::path::Path;

use kaleido_robotics::{Pose, SlotId};

use super::{Journal, SimEvent};
use crate::config::ChoreographyConfig;
use crate::error::ChoreographyError;
use crate::planner::GridLayout;
use crate::traits::{DeviceError, FrameRepository};

/// Slots per simulated grid row.
const ROW_LENGTH: u32 = 16;
/// Centre-to-centre slot spacing of the simulated grid (mm).
const PITCH_MM: f64 = 45.0;

/// In-memory slot frames.
#[derive(Debug, Clone, Default)]
pub struct SimFrameRepository {
    frames: BTreeMap<SlotId, Pose>,
    journal: Option<Journal>,
}

impl SimFrameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames for every slot of `layout` plus the configured home frame.
    ///
    /// Slot `n` sits at row `(n - 1) / 16`, column `(n - 1) % 16` of a flat
    /// grid with the tool pointing down.
    pub fn from_layout(config: &ChoreographyConfig, layout: &GridLayout) -> Self {
        let mut repo = Self::new();
        repo.insert(
            config.home_slot.clone(),
            Pose::new(300.0, -300.0, 500.0, 0.0, 0.0, PI),
        );
        for number in layout.slot_numbers() {
            let index = number.saturating_sub(1);
            let (row, col) = (index / ROW_LENGTH, index % ROW_LENGTH);
            let pose = Pose::new(
                400.0 + f64::from(col) * PITCH_MM,
                f64::from(row) * PITCH_MM,
                100.0,
                0.0,
                0.0,
                PI,
            );
            repo.insert(layout.slot(number), pose);
        }
        repo
    }

    /// Load a JSON object mapping slot ids to poses.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ChoreographyError> {
        let frames: BTreeMap<SlotId, Pose> = crate::error::load_json(path.as_ref())?;
        Ok(Self {
            frames,
            journal: None,
        })
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn insert(&mut self, slot: SlotId, pose: Pose) {
        self.frames.insert(slot, pose);
    }

    pub fn remove(&mut self, slot: &SlotId) -> Option<Pose> {
        self.frames.remove(slot)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameRepository for SimFrameRepository {
    fn resolve(&self, slot: &SlotId) -> Result<Pose, DeviceError> {
        if let Some(journal) = &self.journal {
            journal.record(SimEvent::Resolve(slot.clone()));
        }
        self.frames
            .get(slot)
            .copied()
            .ok_or_else(|| DeviceError::FrameNotFound(slot.clone()))
    }

    fn contains(&self, slot: &SlotId) -> bool {
        self.frames.contains_key(slot)
    }
}
