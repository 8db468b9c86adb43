//! Blueprint export.
//!
//! Cuts are written as lightweight polylines, one DXF layer per cut family,
//! so the sheet can go straight to a laser or router workflow. The JSON
//! helpers dump the whole blueprint for downstream tooling.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use dxf::entities::{Entity, EntityType, LwPolyline};
use dxf::enums::AcadVersion;
use dxf::tables::Layer;
use dxf::{Drawing, LwPolylineVertex};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wallkit_core::Curve;

use crate::blueprint::Blueprint;
use crate::error::{LayoutError, LayoutResult};

/// Layer names used for the three cut families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DxfLayers {
    pub outside: String,
    pub inside: String,
    pub mill: String,
}

impl Default for DxfLayers {
    fn default() -> Self {
        Self {
            outside: "OUTSIDE".to_string(),
            inside: "INSIDE".to_string(),
            mill: "MILL".to_string(),
        }
    }
}

fn polyline_entity(curve: &Curve, layer: &str) -> Option<Entity> {
    let points = curve.points();
    if points.len() < 2 {
        return None;
    }

    let closed = curve.is_closed();
    // A closed DXF polyline repeats its first vertex implicitly.
    let take = if closed { points.len() - 1 } else { points.len() };

    let mut polyline = LwPolyline::default();
    polyline.vertices = points[..take]
        .iter()
        .map(|p| LwPolylineVertex {
            x: p.x,
            y: p.y,
            ..Default::default()
        })
        .collect();
    if closed {
        // Bit 0 (value 1) marks the polyline closed
        polyline.flags |= 1;
    }

    let mut entity = Entity::new(EntityType::LwPolyline(polyline));
    entity.common.layer = layer.to_string();
    Some(entity)
}

/// Builds a DXF drawing holding every cut of `blueprint`.
pub fn to_drawing(blueprint: &Blueprint, layers: &DxfLayers) -> Drawing {
    let mut drawing = Drawing::new();
    // R12 has no LWPOLYLINE entity; the writer would silently drop them.
    drawing.header.version = AcadVersion::R2000;
    for name in [&layers.outside, &layers.inside, &layers.mill] {
        drawing.add_layer(Layer {
            name: name.clone(),
            ..Default::default()
        });
    }

    let mut written = 0usize;
    let families = [
        (&blueprint.outside_cuts, &layers.outside),
        (&blueprint.inside_cuts, &layers.inside),
        (&blueprint.half_mills, &layers.mill),
    ];
    for (cuts, layer) in families {
        for curve in cuts.values().flatten() {
            if let Some(entity) = polyline_entity(curve, layer) {
                drawing.add_entity(entity);
                written += 1;
            }
        }
    }

    debug!(entities = written, parts = blueprint.part_count(), "built DXF drawing");
    drawing
}

/// Writes the blueprint cuts to a DXF file at `path`.
pub fn save_dxf(blueprint: &Blueprint, layers: &DxfLayers, path: &Path) -> LayoutResult<()> {
    let drawing = to_drawing(blueprint, layers);
    drawing
        .save_file(path)
        .map_err(|e| LayoutError::Export(format!("{}: {}", path.display(), e)))?;
    info!("Wrote DXF cutting plan to {}", path.display());
    Ok(())
}

/// Serializes the blueprint as JSON.
pub fn to_json(blueprint: &Blueprint, pretty: bool) -> LayoutResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(blueprint)?
    } else {
        serde_json::to_string(blueprint)?
    };
    Ok(json)
}

/// Writes the blueprint as JSON to `path`.
pub fn save_json(blueprint: &Blueprint, path: &Path, pretty: bool) -> LayoutResult<()> {
    let json = to_json(blueprint, pretty)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    info!("Wrote blueprint JSON to {}", path.display());
    Ok(())
}
