//! Curve/curve intersection.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::curve::Curve;

/// One hit between two curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveIntersection {
    /// Parameter on the first curve.
    pub param_a: f64,
    /// Parameter on the second curve.
    pub param_b: f64,
    pub point: Point2<f64>,
    /// `false` when the curves overlap along a stretch instead of crossing.
    pub is_point: bool,
}

fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Intersects two curves segment by segment.
///
/// Hits closer than `tolerance` to an earlier hit are merged, so a crossing
/// through a shared vertex is reported once. On a closed curve a hit at the
/// seam is reported at parameter 0. Results are sorted by `param_a`.
pub fn intersect(a: &Curve, b: &Curve, tolerance: f64) -> Vec<CurveIntersection> {
    let mut hits = Vec::new();

    for (i, (p0, p1)) in a.segments().enumerate() {
        for (j, (q0, q1)) in b.segments().enumerate() {
            if let Some((t, u, is_point)) = segment_hit(&p0, &p1, &q0, &q1, tolerance) {
                hits.push(CurveIntersection {
                    param_a: i as f64 + t,
                    param_b: j as f64 + u,
                    point: p0 + (p1 - p0) * t,
                    is_point,
                });
            }
        }
    }

    fold_seam(&mut hits, a, b);
    hits.sort_by(|x, y| x.param_a.total_cmp(&y.param_a));

    let mut unique: Vec<CurveIntersection> = Vec::with_capacity(hits.len());
    for hit in hits {
        let duplicate = unique
            .iter()
            .any(|kept| (kept.point - hit.point).norm() <= tolerance);
        if !duplicate {
            unique.push(hit);
        }
    }
    unique
}

fn fold_seam(hits: &mut [CurveIntersection], a: &Curve, b: &Curve) {
    let na = a.segment_count() as f64;
    let nb = b.segment_count() as f64;
    for hit in hits.iter_mut() {
        if a.is_closed() && (hit.param_a - na).abs() < 1e-9 {
            hit.param_a = 0.0;
        }
        if b.is_closed() && (hit.param_b - nb).abs() < 1e-9 {
            hit.param_b = 0.0;
        }
    }
}

/// Returns `(t, u, is_point)` for segments `p0p1` and `q0q1`.
fn segment_hit(
    p0: &Point2<f64>,
    p1: &Point2<f64>,
    q0: &Point2<f64>,
    q1: &Point2<f64>,
    tolerance: f64,
) -> Option<(f64, f64, bool)> {
    let r = p1 - p0;
    let s = q1 - q0;
    let r_len = r.norm();
    let s_len = s.norm();
    if r_len <= f64::EPSILON || s_len <= f64::EPSILON {
        return None;
    }

    let qp = q0 - p0;
    let denom = cross(&r, &s);

    if denom.abs() <= 1e-12 * r_len * s_len {
        // Parallel: only collinear segments can touch.
        if cross(&qp, &r).abs() / r_len > tolerance {
            return None;
        }
        let t_q0 = qp.dot(&r) / (r_len * r_len);
        let t_q1 = (q1 - p0).dot(&r) / (r_len * r_len);
        let lo = t_q0.min(t_q1).max(0.0);
        let hi = t_q0.max(t_q1).min(1.0);
        let slack = tolerance / r_len;
        if hi < lo - slack {
            return None;
        }
        let t = lo.clamp(0.0, 1.0);
        let point = p0 + r * t;
        let u = ((point - q0).dot(&s) / (s_len * s_len)).clamp(0.0, 1.0);
        let is_point = (hi - lo) * r_len <= tolerance;
        return Some((t, u, is_point));
    }

    let t = cross(&qp, &s) / denom;
    let u = cross(&qp, &r) / denom;
    let slack_t = tolerance / r_len;
    let slack_u = tolerance / s_len;
    if t < -slack_t || t > 1.0 + slack_t || u < -slack_u || u > 1.0 + slack_u {
        return None;
    }
    Some((t.clamp(0.0, 1.0), u.clamp(0.0, 1.0), true))
}
