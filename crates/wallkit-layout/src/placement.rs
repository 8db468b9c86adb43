//! Spatial placement of flat parts for reassembly.
//!
//! Each part is handled independently, so the work fans out over the rayon
//! pool and is gathered back in part index order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wallkit_core::{Curve, Frame3, Point2, Point3, Vector3};

use crate::blueprint::panels::transversal_position;
use crate::blueprint::{Blueprint, PartKind, PartSource, Side};
use crate::error::{LayoutError, LayoutResult};
use crate::module_layout::MODULE_PITCH;
use crate::templates::WIDE_HALF_WIDTH;

/// One part ready for extrusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSolid {
    pub index: usize,
    pub kind: PartKind,
    /// Area enclosed by the outer contour.
    pub outline_area: f64,
    /// Outline area minus the through holes.
    pub net_area: f64,
    pub volume: f64,
    /// Where copies of the flat part go in space; narrow parts are used twice.
    pub placements: Vec<Frame3>,
}

impl PartSolid {
    /// Outer contour of the flat part mapped through placement `copy`.
    pub fn outline_in_space(&self, blueprint: &Blueprint, copy: usize) -> Vec<Point3<f64>> {
        let (Some(contour), Some(frame)) = (blueprint.contour(self.index), self.placements.get(copy))
        else {
            return Vec::new();
        };
        contour.points().iter().map(|p| frame.map(p)).collect()
    }
}

/// Computes a [`PartSolid`] for every part of `blueprint`, in index order.
pub fn place_parts(blueprint: &Blueprint) -> LayoutResult<Vec<PartSolid>> {
    let solids = blueprint
        .part_sources
        .par_iter()
        .enumerate()
        .map(|(index, source)| solid_for(blueprint, index, source))
        .collect::<LayoutResult<Vec<PartSolid>>>()?;

    debug!(parts = solids.len(), "placed parts");
    Ok(solids)
}

fn solid_for(blueprint: &Blueprint, index: usize, source: &PartSource) -> LayoutResult<PartSolid> {
    let thickness = blueprint.parameters.thickness;
    let contour = blueprint.contour(index).ok_or_else(|| {
        LayoutError::InconsistentBlueprint(format!("part {} has no contour", index))
    })?;
    let outline_area = contour.area();
    let hole_area: f64 = blueprint.holes(index).iter().map(Curve::area).sum();
    let net_area = (outline_area - hole_area).max(0.0);

    Ok(PartSolid {
        index,
        kind: source.kind(),
        outline_area,
        net_area,
        volume: net_area * thickness,
        placements: frames_for(blueprint, source)?,
    })
}

fn frames_for(blueprint: &Blueprint, source: &PartSource) -> LayoutResult<Vec<Frame3>> {
    let half = blueprint.parameters.thickness * 0.5;
    let geometry = &blueprint.guide;

    match *source {
        PartSource::Narrow => {
            let z = WIDE_HALF_WIDTH - half;
            Ok(vec![Frame3::world_xy(z), Frame3::world_xy(-z)])
        }
        PartSource::Wide {
            segment,
            side,
            sheet_offset,
        } => {
            let guide_segment = geometry.segments.get(segment).ok_or_else(|| {
                LayoutError::InconsistentBlueprint(format!(
                    "wide part on missing segment {}",
                    segment
                ))
            })?;
            let direction = guide_segment.direction();
            let right = guide_segment.right_normal();
            let (start, inward) = match side {
                Side::Right => (geometry.right_corner(segment), -right),
                Side::Left => (geometry.left_corner(segment), right),
            };
            let anchor = start + inward * half;
            Ok(vec![Frame3::anchored(
                Point2::new(sheet_offset, 0.0),
                Point3::new(anchor.x, anchor.y, 0.0),
                Vector3::z(),
                Vector3::new(direction.x, direction.y, 0.0),
            )])
        }
        PartSource::Transversal { slot } => {
            let first = geometry.segments.first().ok_or_else(|| {
                LayoutError::InconsistentBlueprint("guide has no segments".to_string())
            })?;
            let right = first.right_normal();
            let along = MODULE_PITCH * (slot + 1) as f64;
            let anchor = first.point_at_distance(along);
            Ok(vec![Frame3::anchored(
                transversal_position(slot),
                Point3::new(anchor.x, anchor.y, 0.0),
                Vector3::z(),
                Vector3::new(right.x, right.y, 0.0),
            )])
        }
    }
}
