//! Point-in-region classification.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use super::curve::Curve;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Containment {
    Inside,
    Outside,
    /// Within tolerance of the region boundary.
    Coincident,
}

/// Distance from `point` to the segment `a`-`b`.
pub fn distance_to_segment(point: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 <= f64::EPSILON {
        return (point - a).norm();
    }
    let t = ((point - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (point - (a + ab * t)).norm()
}

/// Classifies `point` against the region bounded by `region`.
///
/// An open region is treated as closed by its start and end points.
pub fn contains_point(region: &Curve, point: &Point2<f64>, tolerance: f64) -> Containment {
    let pts = region.points();
    if pts.len() < 3 {
        return Containment::Outside;
    }

    let n = pts.len();
    let edges = (0..n).map(|i| (pts[i], pts[(i + 1) % n]));

    let mut inside = false;
    for (a, b) in edges {
        if distance_to_segment(point, &a, &b) <= tolerance {
            return Containment::Coincident;
        }
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
    }

    if inside {
        Containment::Inside
    } else {
        Containment::Outside
    }
}
