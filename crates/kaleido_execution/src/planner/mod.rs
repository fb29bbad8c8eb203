//! Pattern planners.
//!
//! Each stage of the cycle has a planner that turns the grid layout into an
//! ordered list of pick-and-turn operations. The order is part of the visible
//! choreography, so planners only walk the layout table; they never sort or
//! optimize.
//!
//! | Stage   | Per cluster / row                                   |
//! |---------|-----------------------------------------------------|
//! | linear  | lead 120°, pivot_a 240°, pivot_b 240°, trail 120°   |
//! | colour  | every second slot of each row at 120°, then trailing |
//! | hexagon | seed 120° followed by the linear block              |

mod layout;
mod strategies;

pub use layout::{Cluster, ColourScan, GridLayout, RowSpan};
pub use strategies::{ColourPlanner, HexagonPlanner, LinearPlanner};

use kaleido_robotics::{RotationAmount, SlotId};
use serde::{Deserialize, Serialize};

/// One arrangement of the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Linear,
    Colour,
    Hexagon,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Linear, Stage::Colour, Stage::Hexagon];

    /// The stage that follows this one in the cycle.
    pub fn next(self) -> Stage {
        match self {
            Stage::Linear => Stage::Colour,
            Stage::Colour => Stage::Hexagon,
            Stage::Hexagon => Stage::Linear,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Linear => "linear",
            Stage::Colour => "colour",
            Stage::Hexagon => "hexagon",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Stage::Linear),
            "colour" | "color" => Ok(Stage::Colour),
            "hexagon" => Ok(Stage::Hexagon),
            other => Err(format!("unknown stage '{other}'")),
        }
    }
}

/// A single pick-and-turn: which slot, and how far to turn it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    pub slot: SlotId,
    pub rotation: RotationAmount,
}

impl Operation {
    pub fn new(slot: SlotId, rotation: RotationAmount) -> Self {
        Self { slot, rotation }
    }
}

/// Ordered operations for one stage. Consumed once, front to back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternPlan {
    pub stage: Stage,
    pub operations: Vec<Operation>,
}

impl PatternPlan {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }
}

impl<'a> IntoIterator for &'a PatternPlan {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

/// Strategy producing the plan for one stage.
pub trait PatternPlanner {
    fn stage(&self) -> Stage;

    /// Build the plan. Pure: the same layout always yields the same plan.
    fn plan(&self, layout: &GridLayout) -> PatternPlan;
}

/// The planner responsible for `stage`.
pub fn planner_for(stage: Stage) -> &'static dyn PatternPlanner {
    match stage {
        Stage::Linear => &LinearPlanner,
        Stage::Colour => &ColourPlanner,
        Stage::Hexagon => &HexagonPlanner,
    }
}
