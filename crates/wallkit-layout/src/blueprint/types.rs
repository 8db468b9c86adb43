//! Blueprint type definitions: parameters, wall input, part provenance and the blueprint itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wallkit_core::Curve;

use crate::guide_lines::{GuideLine, GuideLineGeometry};
use crate::part_splitter::ContainmentMode;

/// Which flavour of wall is being planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallVariant {
    /// A single straight run with transversal braces.
    Straight,
    /// A polyline guide with mitred corners.
    Irregular,
}

/// Side of the guide a wide panel belongs to, looking along the guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Right,
    Left,
}

/// Panel family of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    Narrow,
    Wide,
    Transversal,
}

/// Where a part came from, kept for reassembly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartSource {
    /// Laid out in plan view on top of the guide.
    Narrow,
    /// Flattened side panel along one edge of the wall outline.
    Wide {
        segment: usize,
        side: Side,
        /// Across offset of the panel on the cutting sheet.
        sheet_offset: f64,
    },
    /// Brace number `slot` of a straight wall.
    Transversal { slot: usize },
}

impl PartSource {
    pub fn kind(&self) -> PartKind {
        match self {
            PartSource::Narrow => PartKind::Narrow,
            PartSource::Wide { .. } => PartKind::Wide,
            PartSource::Transversal { .. } => PartKind::Transversal,
        }
    }
}

/// Numeric knobs of the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueprintParameters {
    /// Longest straight run a single part may have.
    pub max_part_length: f64,
    /// Longest distance from a corner to the first split.
    pub max_corner_length: f64,
    /// Sheet material thickness.
    pub thickness: f64,
    /// Diameter of the tool cutting the half mills.
    pub milling_diameter: f64,
    pub containment: ContainmentMode,
}

impl Default for BlueprintParameters {
    fn default() -> Self {
        Self {
            max_part_length: 250.0,
            max_corner_length: 100.0,
            thickness: 1.8,
            milling_diameter: 0.5,
            containment: ContainmentMode::Region,
        }
    }
}

/// Inclusive bounds a parameter is clamped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterLimits {
    pub min_part_length: f64,
    pub min_corner_length: f64,
    pub thickness: (f64, f64),
    pub milling_diameter: (f64, f64),
}

impl ParameterLimits {
    pub fn for_variant(variant: WallVariant) -> Self {
        match variant {
            WallVariant::Straight => Self {
                min_part_length: 60.0,
                min_corner_length: 10.0,
                thickness: (1.0, 3.0),
                milling_diameter: (0.25, 1.0),
            },
            WallVariant::Irregular => Self {
                min_part_length: 120.0,
                min_corner_length: 10.0,
                thickness: (1.0, 3.0),
                milling_diameter: (0.0, 1.0),
            },
        }
    }
}

/// Shortest straight wall the engine will lay out.
pub const MIN_STRAIGHT_LENGTH: f64 = 60.0;

fn clamp_logged(name: &str, value: f64, min: f64, max: f64) -> f64 {
    let clamped = if value.is_nan() { min } else { value.clamp(min, max) };
    if clamped != value {
        tracing::warn!("Clamped {} from {} to {}", name, value, clamped);
    }
    clamped
}

impl BlueprintParameters {
    /// Returns a copy with every field forced into the range allowed for `variant`.
    pub fn clamped(&self, variant: WallVariant) -> Self {
        let limits = ParameterLimits::for_variant(variant);
        Self {
            max_part_length: clamp_logged(
                "max_part_length",
                self.max_part_length,
                limits.min_part_length,
                f64::INFINITY,
            ),
            max_corner_length: clamp_logged(
                "max_corner_length",
                self.max_corner_length,
                limits.min_corner_length,
                f64::INFINITY,
            ),
            thickness: clamp_logged(
                "thickness",
                self.thickness,
                limits.thickness.0,
                limits.thickness.1,
            ),
            milling_diameter: clamp_logged(
                "milling_diameter",
                self.milling_diameter,
                limits.milling_diameter.0,
                limits.milling_diameter.1,
            ),
            containment: self.containment,
        }
    }
}

/// What to build.
#[derive(Debug, Clone, PartialEq)]
pub enum WallInput {
    Straight { length: f64 },
    Irregular { guide: GuideLine },
}

impl WallInput {
    pub fn variant(&self) -> WallVariant {
        match self {
            WallInput::Straight { .. } => WallVariant::Straight,
            WallInput::Irregular { .. } => WallVariant::Irregular,
        }
    }
}

/// Cutting plan for one wall.
///
/// The three cut maps are keyed by part index; every part has an entry in
/// each map, possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub variant: WallVariant,
    /// Parameters after clamping.
    pub parameters: BlueprintParameters,
    pub outside_cuts: BTreeMap<usize, Vec<Curve>>,
    pub inside_cuts: BTreeMap<usize, Vec<Curve>>,
    pub half_mills: BTreeMap<usize, Vec<Curve>>,
    pub narrow_indices: Vec<usize>,
    pub wide_indices: Vec<usize>,
    pub transversal_indices: Vec<usize>,
    /// Provenance, indexed by part index.
    pub part_sources: Vec<PartSource>,
    pub guide: GuideLineGeometry,
    pub skipped_splitters: usize,
}

impl Blueprint {
    pub fn part_count(&self) -> usize {
        self.part_sources.len()
    }

    pub fn kind_of(&self, index: usize) -> Option<PartKind> {
        self.part_sources.get(index).map(PartSource::kind)
    }

    pub fn indices_of(&self, kind: PartKind) -> &[usize] {
        match kind {
            PartKind::Narrow => &self.narrow_indices,
            PartKind::Wide => &self.wide_indices,
            PartKind::Transversal => &self.transversal_indices,
        }
    }

    /// Outer contour of part `index`.
    pub fn contour(&self, index: usize) -> Option<&Curve> {
        self.outside_cuts.get(&index).and_then(|cuts| cuts.first())
    }

    pub fn holes(&self, index: usize) -> &[Curve] {
        self.inside_cuts.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn mills(&self, index: usize) -> &[Curve] {
        self.half_mills.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }
}
