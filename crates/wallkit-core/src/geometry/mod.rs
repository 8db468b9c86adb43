//! Curve kernel.
//!
//! Construction, joining, intersection, splitting, containment and offsetting
//! of planar polylines.

pub mod curve;
pub mod frame;
pub mod intersect;
pub mod join;
pub mod offset;
pub mod region;

pub use curve::{BoundingBox, Curve};
pub use frame::{Frame2, Frame3};
pub use intersect::{intersect, CurveIntersection};
pub use join::{join, join_closed, join_single};
pub use offset::{offset, CornerStyle};
pub use region::{contains_point, distance_to_segment, Containment};

/// Tolerance for endpoint coincidence when joining.
pub const ABSOLUTE_TOLERANCE: f64 = 1e-6;

/// Tolerance for intersections and containment tests.
pub const INTERSECTION_TOLERANCE: f64 = 1e-3;

/// Splits `curve` at the given parameters.
///
/// An open curve yields one piece more than there are distinct parameters. A
/// closed curve yields one piece per parameter, the last piece running through
/// the seam back to the first parameter.
pub fn split(curve: &Curve, params: &[f64]) -> Vec<Curve> {
    let n = curve.segment_count() as f64;
    let mut cuts: Vec<f64> = params.iter().map(|t| t.clamp(0.0, n)).collect();
    cuts.sort_by(f64::total_cmp);
    cuts.dedup_by(|a, b| (*a - *b).abs() < 1e-12);

    if curve.is_closed() {
        if cuts.is_empty() {
            return vec![curve.clone()];
        }
        let mut pieces: Vec<Curve> = cuts
            .windows(2)
            .map(|w| curve.trim(w[0], w[1]))
            .collect();

        let (first, last) = (cuts[0], cuts[cuts.len() - 1]);
        let mut wrap = curve.trim(last, n).into_points();
        wrap.extend(curve.trim(0.0, first).into_points().into_iter().skip(1));
        pieces.push(Curve::polyline(wrap));
        pieces.retain(|c| c.segment_count() > 0);
        return pieces;
    }

    cuts.retain(|t| *t > 1e-12 && *t < n - 1e-12);
    let mut bounds = Vec::with_capacity(cuts.len() + 2);
    bounds.push(0.0);
    bounds.extend(cuts);
    bounds.push(n);
    bounds.windows(2).map(|w| curve.trim(w[0], w[1])).collect()
}
