//! Endpoint chaining of curves.

use nalgebra::Point2;

use super::curve::Curve;
use crate::error::{GeometryError, GeometryResult};

fn close_enough(a: &Point2<f64>, b: &Point2<f64>, tolerance: f64) -> bool {
    (a - b).norm() <= tolerance
}

/// Joins curves whose endpoints coincide within `tolerance`.
///
/// Chains grow greedily in input order, flipping pieces when needed.
/// Zero-length inputs are ignored. The output is deterministic for a given
/// input order.
pub fn join(curves: &[Curve], tolerance: f64) -> Vec<Curve> {
    let mut pool: Vec<Option<Vec<Point2<f64>>>> = curves
        .iter()
        .filter(|c| c.segment_count() > 0 && c.length() > tolerance)
        .map(|c| Some(c.points().to_vec()))
        .collect();

    let mut joined = Vec::new();

    for seed in 0..pool.len() {
        let Some(mut chain) = pool[seed].take() else {
            continue;
        };

        loop {
            if is_loop(&chain, tolerance) {
                break;
            }

            let (Some(&head), Some(&tail)) = (chain.first(), chain.last()) else {
                break;
            };

            let mut attached = false;
            for slot in pool.iter_mut() {
                let Some(candidate) = slot.as_ref() else {
                    continue;
                };
                let (Some(&c_start), Some(&c_end)) = (candidate.first(), candidate.last()) else {
                    continue;
                };

                if close_enough(&c_start, &tail, tolerance) {
                    chain.extend(candidate.iter().skip(1));
                } else if close_enough(&c_end, &tail, tolerance) {
                    chain.extend(candidate.iter().rev().skip(1));
                } else if close_enough(&c_end, &head, tolerance) {
                    let mut merged = candidate.clone();
                    merged.extend(chain.iter().skip(1));
                    chain = merged;
                } else if close_enough(&c_start, &head, tolerance) {
                    let mut merged: Vec<_> = candidate.iter().rev().copied().collect();
                    merged.extend(chain.iter().skip(1));
                    chain = merged;
                } else {
                    continue;
                }

                *slot = None;
                attached = true;
                break;
            }

            if !attached {
                break;
            }
        }

        if is_loop(&chain, tolerance) {
            if let Some(&first) = chain.first() {
                if let Some(last) = chain.last_mut() {
                    *last = first;
                }
            }
        }

        joined.push(Curve::polyline(chain));
    }

    joined
}

fn is_loop(chain: &[Point2<f64>], tolerance: f64) -> bool {
    match (chain.first(), chain.last()) {
        (Some(first), Some(last)) if chain.len() >= 4 => close_enough(first, last, tolerance),
        _ => false,
    }
}

/// Joins and expects exactly one connected result.
pub fn join_single(curves: &[Curve], tolerance: f64) -> GeometryResult<Curve> {
    let mut joined = join(curves, tolerance);
    match joined.len() {
        1 => Ok(joined.remove(0)),
        fragments => {
            tracing::debug!(inputs = curves.len(), fragments, "join left loose fragments");
            Err(GeometryError::JoinFailed { fragments })
        }
    }
}

/// Joins and expects exactly one closed result.
pub fn join_closed(curves: &[Curve], tolerance: f64) -> GeometryResult<Curve> {
    let curve = join_single(curves, tolerance)?;
    if curve.is_closed() {
        Ok(curve)
    } else {
        Err(GeometryError::OpenContour)
    }
}
