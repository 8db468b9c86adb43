//! Connector module layout along a symmetry axis.
//!
//! Modules alternate A, B, A, B, ... starting and ending with an A module.
//! Each A/B pair occupies one [`MODULE_PITCH`]. Unused length is split evenly
//! between both ends so the layout stays centred on the axis.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Footprint of the wide connector module.
pub const MODULE_A_FOOTPRINT: f64 = 40.0;
/// Footprint of the narrow connector module.
pub const MODULE_B_FOOTPRINT: f64 = 20.0;
/// Length of one A/B module pair.
pub const MODULE_PITCH: f64 = MODULE_A_FOOTPRINT + MODULE_B_FOOTPRINT;
/// Sum of the two fixed end margins.
pub const END_MARGINS: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    A,
    B,
}

impl ModuleKind {
    pub fn footprint(&self) -> f64 {
        match self {
            ModuleKind::A => MODULE_A_FOOTPRINT,
            ModuleKind::B => MODULE_B_FOOTPRINT,
        }
    }
}

/// One module instance, `center` measured from the start of the axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModulePlacement {
    pub kind: ModuleKind,
    pub index: usize,
    pub center: f64,
}

/// Module counts and centring slack for one axis length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModuleLayout {
    pub length: f64,
    pub count_a: usize,
    pub count_b: usize,
    /// Free length left at each end beyond the half margin.
    pub slack: f64,
}

impl ModuleLayout {
    pub fn solve(length: f64) -> Self {
        let count_a = ((length - END_MARGINS + MODULE_A_FOOTPRINT / 2.0) / MODULE_PITCH)
            .floor()
            .max(0.0) as usize;
        let mut count_b = ((length - END_MARGINS - MODULE_A_FOOTPRINT + MODULE_B_FOOTPRINT / 2.0)
            / MODULE_PITCH)
            .floor()
            .max(0.0) as usize;

        // Never end a run on a B module.
        if count_b >= count_a && count_b > 0 {
            count_b -= 1;
        }

        let slack = (length
            - END_MARGINS
            - MODULE_A_FOOTPRINT * count_a as f64
            - MODULE_B_FOOTPRINT * count_b as f64)
            * 0.5;

        debug!(length, count_a, count_b, slack, "module layout solved");

        Self {
            length,
            count_a,
            count_b,
            slack,
        }
    }

    /// Distance from the axis start to the leading edge of the first module.
    pub fn leading_offset(&self) -> f64 {
        END_MARGINS * 0.5 + self.slack
    }

    pub fn center_a(&self, index: usize) -> f64 {
        self.leading_offset() + MODULE_A_FOOTPRINT * 0.5 + MODULE_PITCH * index as f64
    }

    pub fn center_b(&self, index: usize) -> f64 {
        self.leading_offset()
            + MODULE_A_FOOTPRINT
            + MODULE_B_FOOTPRINT * 0.5
            + MODULE_PITCH * index as f64
    }

    pub fn module_count(&self) -> usize {
        self.count_a + self.count_b
    }

    /// Length covered by module footprints.
    pub fn occupied(&self) -> f64 {
        MODULE_A_FOOTPRINT * self.count_a as f64 + MODULE_B_FOOTPRINT * self.count_b as f64
    }

    /// First and last along-axis coordinates touched by a module.
    pub fn span(&self) -> (f64, f64) {
        let start = self.leading_offset();
        (start, start + self.occupied())
    }

    /// All placements ordered along the axis.
    pub fn placements(&self) -> Vec<ModulePlacement> {
        let mut placements: Vec<ModulePlacement> = (0..self.count_a)
            .map(|index| ModulePlacement {
                kind: ModuleKind::A,
                index,
                center: self.center_a(index),
            })
            .chain((0..self.count_b).map(|index| ModulePlacement {
                kind: ModuleKind::B,
                index,
                center: self.center_b(index),
            }))
            .collect();
        placements.sort_by(|a, b| a.center.total_cmp(&b.center));
        placements
    }

    /// Indices of the A modules that carry a splitter, ascending.
    pub fn split_indices(&self, policy: &SplitPolicy) -> Vec<usize> {
        let indices = match *policy {
            SplitPolicy::Periodic { max_part_length } => self.periodic_splits(max_part_length),
            SplitPolicy::CornerLimited {
                max_straight_length,
                max_corner_length,
                offset_at_start,
                offset_at_end,
            } => self.corner_limited_splits(
                max_straight_length,
                max_corner_length,
                offset_at_start,
                offset_at_end,
            ),
        };
        debug!(?indices, ?policy, "split points chosen");
        indices
    }

    fn periodic_splits(&self, max_part_length: f64) -> Vec<usize> {
        if max_part_length >= self.length {
            return Vec::new();
        }
        let step = (max_part_length / MODULE_PITCH).floor().max(1.0) as usize;
        (1..)
            .map(|j| step * j - 1)
            .take_while(|&k| k < self.count_a)
            .collect()
    }

    fn corner_limited_splits(
        &self,
        max_straight_length: f64,
        max_corner_length: f64,
        offset_at_start: f64,
        offset_at_end: f64,
    ) -> Vec<usize> {
        let positions: Vec<f64> = (0..self.count_a).map(|k| self.center_a(k)).collect();
        if positions.is_empty() {
            return Vec::new();
        }

        // Every split must clear both corners; the first A module far
        // enough from the start corner bounds the whole scan.
        let Some(start) = positions
            .iter()
            .position(|d| offset_at_start + d >= max_corner_length)
        else {
            return Vec::new();
        };
        let clears_end =
            |k: usize| offset_at_end + (self.length - positions[k]) >= max_corner_length;
        if !clears_end(start) {
            return Vec::new();
        }

        let lower = start + 1;
        let end = (lower..positions.len()).rev().find(|&k| clears_end(k));

        let mut splits = vec![start];

        let upper = end.unwrap_or(lower);
        let mut anchor = positions[start];
        for (k, &d) in positions.iter().enumerate().take(upper).skip(lower) {
            if d - anchor + MODULE_PITCH >= max_straight_length {
                splits.push(k);
                anchor = d;
            }
        }

        splits.extend(end);
        splits
    }
}

/// How split points are chosen among the A modules of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SplitPolicy {
    /// Every `floor(max_part_length / 60)` A modules, when the run is too long.
    Periodic { max_part_length: f64 },
    /// Keep splits away from corners, then cap the straight runs between them.
    CornerLimited {
        max_straight_length: f64,
        max_corner_length: f64,
        offset_at_start: f64,
        offset_at_end: f64,
    },
}
