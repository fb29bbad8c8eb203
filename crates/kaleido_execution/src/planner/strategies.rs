//! The three stage planners.

use kaleido_robotics::RotationAmount::{Turn120, Turn240};

use super::{Cluster, GridLayout, Operation, PatternPlan, PatternPlanner, Stage};

/// Turns one cluster at a time into its linear arrangement.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearPlanner;

/// Turns every second tile of each row, scanning row by row.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColourPlanner;

/// Assembles one complete hexagon at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexagonPlanner;

fn linear_block(layout: &GridLayout, cluster: &Cluster) -> [Operation; 4] {
    [
        Operation::new(layout.slot(cluster.lead), Turn120),
        Operation::new(layout.slot(cluster.pivot_a), Turn240),
        Operation::new(layout.slot(cluster.pivot_b), Turn240),
        Operation::new(layout.slot(cluster.trail), Turn120),
    ]
}

impl PatternPlanner for LinearPlanner {
    fn stage(&self) -> Stage {
        Stage::Linear
    }

    fn plan(&self, layout: &GridLayout) -> PatternPlan {
        let operations = layout
            .clusters
            .iter()
            .flat_map(|cluster| linear_block(layout, cluster))
            .collect();
        PatternPlan {
            stage: Stage::Linear,
            operations,
        }
    }
}

impl PatternPlanner for ColourPlanner {
    fn stage(&self) -> Stage {
        Stage::Colour
    }

    fn plan(&self, layout: &GridLayout) -> PatternPlan {
        let scan = &layout.colour;
        let operations = scan
            .rows
            .iter()
            .flat_map(|row| row.slots())
            .chain(scan.trailing.iter().copied())
            .map(|number| Operation::new(layout.slot(number), Turn120))
            .collect();
        PatternPlan {
            stage: Stage::Colour,
            operations,
        }
    }
}

impl PatternPlanner for HexagonPlanner {
    fn stage(&self) -> Stage {
        Stage::Hexagon
    }

    fn plan(&self, layout: &GridLayout) -> PatternPlan {
        let mut operations = Vec::with_capacity(layout.clusters.len() * 5);
        for cluster in &layout.clusters {
            operations.push(Operation::new(layout.slot(cluster.seed), Turn120));
            operations.extend(linear_block(layout, cluster));
        }
        PatternPlan {
            stage: Stage::Hexagon,
            operations,
        }
    }
}
