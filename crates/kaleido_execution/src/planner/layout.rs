//! Grid layout table.
//!
//! The slot numbering, cluster membership and row ranges encode how the
//! physical grid is built. They are data, not something derivable, so the
//! built-in table is copied from the cell and can be replaced by a JSON file.

use std::collections::HashSet;
use std::path::Path;

use kaleido_robotics::SlotId;
use serde::{Deserialize, Serialize};

use crate::error::ChoreographyError;

/// Five slots that assemble into one hexagon.
///
/// `lead`/`trail` turn 120° and `pivot_a`/`pivot_b` turn 240°. The `seed`
/// tile is only turned by the hexagon stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub seed: u32,
    pub lead: u32,
    pub pivot_a: u32,
    pub pivot_b: u32,
    pub trail: u32,
}

impl Cluster {
    pub const fn new(seed: u32, lead: u32, pivot_a: u32, pivot_b: u32, trail: u32) -> Self {
        Self {
            seed,
            lead,
            pivot_a,
            pivot_b,
            trail,
        }
    }

    pub fn slots(&self) -> [u32; 5] {
        [self.seed, self.lead, self.pivot_a, self.pivot_b, self.trail]
    }
}

/// Inclusive slot range visited with a fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSpan {
    pub start: u32,
    pub end: u32,
    #[serde(default = "default_step")]
    pub step: u32,
}

fn default_step() -> u32 {
    2
}

impl RowSpan {
    pub const fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            end,
            step: 2,
        }
    }

    /// Slot numbers in visiting order.
    pub fn slots(&self) -> impl Iterator<Item = u32> + use<> {
        (self.start..=self.end).step_by(self.step.max(1) as usize)
    }
}

/// Row-by-row scan used by the colour stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColourScan {
    pub rows: Vec<RowSpan>,
    /// Irregular slots visited one by one after the rows
    #[serde(default)]
    pub trailing: Vec<u32>,
}

/// Slot topology of the tile grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Prefix joined with a slot number to form the slot id
    pub slot_prefix: String,
    /// Clusters in traversal order
    pub clusters: Vec<Cluster>,
    pub colour: ColourScan,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            slot_prefix: "/Kalidescope/P".to_string(),
            clusters: vec![
                Cluster::new(2, 3, 4, 18, 19),
                Cluster::new(6, 7, 8, 22, 23),
                Cluster::new(10, 11, 12, 26, 27),
                Cluster::new(14, 15, 16, 30, 31),
                Cluster::new(34, 35, 36, 46, 47),
                Cluster::new(38, 39, 40, 50, 51),
                Cluster::new(42, 43, 44, 54, 55),
                Cluster::new(58, 59, 60, 66, 67),
                Cluster::new(62, 63, 64, 70, 71),
                Cluster::new(74, 75, 76, 78, 79),
            ],
            colour: ColourScan {
                rows: vec![
                    RowSpan::new(2, 17),
                    RowSpan::new(19, 32),
                    RowSpan::new(34, 45),
                    RowSpan::new(47, 56),
                    RowSpan::new(58, 65),
                    RowSpan::new(67, 72),
                ],
                trailing: vec![74, 76, 79],
            },
        }
    }
}

impl GridLayout {
    /// Load and validate a JSON layout file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ChoreographyError> {
        let layout: Self = crate::error::load_json(path.as_ref())?;
        layout.validate()?;
        Ok(layout)
    }

    /// Slot id for a slot number.
    pub fn slot(&self, number: u32) -> SlotId {
        SlotId::numbered(&self.slot_prefix, number)
    }

    /// Every slot number referenced by any stage, ascending.
    pub fn slot_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self
            .clusters
            .iter()
            .flat_map(|c| c.slots())
            .chain(self.colour.rows.iter().flat_map(|r| r.slots()))
            .chain(self.colour.trailing.iter().copied())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        numbers.sort_unstable();
        numbers
    }

    pub fn validate(&self) -> Result<(), ChoreographyError> {
        if self.slot_prefix.is_empty() {
            return Err(ChoreographyError::InvalidLayout("slot_prefix is empty".into()));
        }
        if self.clusters.is_empty() {
            return Err(ChoreographyError::InvalidLayout("no clusters defined".into()));
        }
        for (i, cluster) in self.clusters.iter().enumerate() {
            let unique: HashSet<u32> = cluster.slots().into_iter().collect();
            if unique.len() != 5 {
                return Err(ChoreographyError::InvalidLayout(format!(
                    "cluster {i} repeats a slot: {:?}",
                    cluster.slots()
                )));
            }
        }
        for (i, row) in self.colour.rows.iter().enumerate() {
            if row.step == 0 {
                return Err(ChoreographyError::InvalidLayout(format!("row {i} has step 0")));
            }
            if row.start > row.end {
                return Err(ChoreographyError::InvalidLayout(format!(
                    "row {i} range {}..={} is inverted",
                    row.start, row.end
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_is_valid() {
        let layout = GridLayout::default();
        assert!(layout.validate().is_ok());
        assert_eq!(layout.clusters.len(), 10);
        assert_eq!(layout.slot(19).as_str(), "/Kalidescope/P19");
    }

    #[test]
    fn test_row_span_steps() {
        let row = RowSpan::new(2, 17);
        assert_eq!(row.slots().collect::<Vec<_>>(), vec![2, 4, 6, 8, 10, 12, 14, 16]);
        let row = RowSpan::new(67, 72);
        assert_eq!(row.slots().collect::<Vec<_>>(), vec![67, 69, 71]);
    }

    #[test]
    fn test_slot_numbers_deduplicated() {
        let numbers = GridLayout::default().slot_numbers();
        assert_eq!(numbers.first(), Some(&2));
        assert_eq!(numbers.last(), Some(&79));
        let mut sorted = numbers.clone();
        sorted.dedup();
        assert_eq!(sorted, numbers);
    }

    #[test]
    fn test_json_fills_step_default() {
        let json = r#"{
            "slot_prefix": "/Grid/S",
            "clusters": [ { "seed": 1, "lead": 2, "pivot_a": 3, "pivot_b": 4, "trail": 5 } ],
            "colour": { "rows": [ { "start": 1, "end": 5 } ] }
        }"#;
        let layout: GridLayout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.colour.rows[0].step, 2);
        assert!(layout.colour.trailing.is_empty());
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_layouts() {
        let mut layout = GridLayout::default();
        layout.clusters[0].trail = layout.clusters[0].lead;
        assert!(matches!(layout.validate(), Err(ChoreographyError::InvalidLayout(_))));

        let mut layout = GridLayout::default();
        layout.colour.rows[1].step = 0;
        assert!(matches!(layout.validate(), Err(ChoreographyError::InvalidLayout(_))));

        let mut layout = GridLayout::default();
        layout.colour.rows[2] = RowSpan::new(45, 34);
        assert!(matches!(layout.validate(), Err(ChoreographyError::InvalidLayout(_))));

        let mut layout = GridLayout::default();
        layout.clusters.clear();
        assert!(layout.validate().is_err());
    }
}
