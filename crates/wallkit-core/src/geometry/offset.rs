//! Parallel offsetting.
//!
//! Positive distances offset to the left of the curve direction.
//! [`CornerStyle::Round`] widens mill paths; [`CornerStyle::Sharp`] gives
//! the mitred joins of a wall outline and is part of the public kernel
//! surface for callers that draw outlines from a guide polyline.

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::curve::{Curve, ARC_SEGMENTS_PER_HALF_TURN};
use crate::error::{GeometryError, GeometryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CornerStyle {
    /// Rounded joins (arcs around convex corners).
    #[default]
    Round,
    /// Mitred joins.
    Sharp,
}

/// Offsets `curve` by `distance`, returning every resulting piece.
pub fn offset(curve: &Curve, distance: f64, style: CornerStyle) -> GeometryResult<Vec<Curve>> {
    if curve.segment_count() == 0 {
        return Err(GeometryError::EmptyInput("cannot offset an empty curve".to_string()));
    }
    let result = match style {
        CornerStyle::Round => round_offset(curve, distance),
        CornerStyle::Sharp => vec![sharp_offset(curve, distance)],
    };
    if result.is_empty() {
        return Err(GeometryError::OffsetFailed { distance });
    }
    Ok(result)
}

fn to_pline(curve: &Curve) -> Polyline {
    let closed = curve.is_closed();
    let points = curve.points();
    let count = if closed { points.len() - 1 } else { points.len() };

    let mut polyline = Polyline::new();
    for p in &points[..count] {
        polyline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    polyline.set_is_closed(closed);
    polyline
}

fn round_offset(curve: &Curve, distance: f64) -> Vec<Curve> {
    to_pline(curve)
        .parallel_offset(distance)
        .iter()
        .map(from_pline)
        .filter(|c| c.segment_count() > 0)
        .collect()
}

fn from_pline(polyline: &Polyline) -> Curve {
    let vertices = &polyline.vertex_data;
    let closed = polyline.is_closed();
    let mut points = Vec::with_capacity(vertices.len() * 2);

    let edge_count = if closed {
        vertices.len()
    } else {
        vertices.len().saturating_sub(1)
    };

    if let Some(first) = vertices.first() {
        points.push(Point2::new(first.x, first.y));
    }
    for i in 0..edge_count {
        let v0 = vertices[i];
        let v1 = vertices[(i + 1) % vertices.len()];
        let p0 = Point2::new(v0.x, v0.y);
        let p1 = Point2::new(v1.x, v1.y);
        if v0.bulge.abs() > 1e-12 {
            points.extend(bulge_points(&p0, &p1, v0.bulge));
        }
        points.push(p1);
    }

    if closed {
        Curve::closed_polyline(points)
    } else {
        Curve::polyline(points)
    }
}

/// Interior points of the arc from `p0` to `p1` with the given bulge.
fn bulge_points(p0: &Point2<f64>, p1: &Point2<f64>, bulge: f64) -> Vec<Point2<f64>> {
    let chord = p1 - p0;
    let chord_len = chord.norm();
    if chord_len <= f64::EPSILON {
        return Vec::new();
    }
    let sweep = 4.0 * bulge.atan();
    let left = Vector2::new(-chord.y, chord.x) / chord_len;
    let h = chord_len * 0.5 * (1.0 - bulge * bulge) / (2.0 * bulge);
    let center = nalgebra::center(p0, p1) + left * h;
    let radius = (p0 - center).norm();
    let a0 = (p0.y - center.y).atan2(p0.x - center.x);

    let steps = ((sweep.abs() / std::f64::consts::PI) * ARC_SEGMENTS_PER_HALF_TURN as f64)
        .ceil()
        .max(1.0) as usize;
    (1..steps)
        .map(|k| {
            let angle = a0 + sweep * k as f64 / steps as f64;
            center + Vector2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

fn left_normal(a: &Point2<f64>, b: &Point2<f64>) -> Vector2<f64> {
    let d = (b - a).normalize();
    Vector2::new(-d.y, d.x)
}

fn sharp_offset(curve: &Curve, distance: f64) -> Curve {
    let closed = curve.is_closed();
    let pts = curve.points();
    let count = if closed { pts.len() - 1 } else { pts.len() };
    let pts = &pts[..count];

    let mut result = Vec::with_capacity(count + 1);
    for i in 0..count {
        let prev = if i > 0 {
            Some(i - 1)
        } else if closed {
            Some(count - 1)
        } else {
            None
        };
        let next = if i + 1 < count {
            Some(i + 1)
        } else if closed {
            Some(0)
        } else {
            None
        };

        let point = match (prev, next) {
            (Some(p), Some(n)) => {
                let n_in = left_normal(&pts[p], &pts[i]);
                let n_out = left_normal(&pts[i], &pts[n]);
                let bisector = n_in + n_out;
                let cos_half = (1.0 + n_in.dot(&n_out)) * 0.5;
                if bisector.norm() <= 1e-12 || cos_half <= 1e-12 {
                    pts[i] + n_out * distance
                } else {
                    pts[i] + bisector.normalize() * (distance / cos_half.sqrt())
                }
            }
            (None, Some(n)) => pts[i] + left_normal(&pts[i], &pts[n]) * distance,
            (Some(p), None) => pts[i] + left_normal(&pts[p], &pts[i]) * distance,
            (None, None) => pts[i],
        };
        result.push(point);
    }

    if closed {
        Curve::closed_polyline(result)
    } else {
        Curve::polyline(result)
    }
}
