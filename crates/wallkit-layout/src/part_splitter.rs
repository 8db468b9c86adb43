//! Splitting of oversized panel contours into fabricable parts.
//!
//! Splitters are applied in order. Each one divides whichever of the two
//! most recent halves it crosses; the half it misses is finished and
//! archived. Holes and mill paths are then handed to the part that owns
//! them.

use serde::{Deserialize, Serialize};
use tracing::debug;
use wallkit_core::{
    contains_point, intersect, join_closed, split, Containment, Curve, CurveIntersection,
    GeometryError, Point2, INTERSECTION_TOLERANCE,
};

use crate::error::LayoutResult;

/// How a hole is matched to the part that contains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentMode {
    /// Point-in-region test against the part contour.
    #[default]
    Region,
    /// Cheaper test against the part's bounding box.
    BoundingBox,
}

/// One fabricable piece of a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub index: usize,
    pub contour: Curve,
    pub holes: Vec<Curve>,
    pub mills: Vec<Curve>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitOutcome {
    pub parts: Vec<Part>,
    /// Splitters that crossed neither candidate and were ignored.
    pub skipped_splitters: usize,
}

impl SplitOutcome {
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}

/// Divides closed contours along splitter curves.
#[derive(Debug, Clone, Copy)]
pub struct PartSplitter {
    containment: ContainmentMode,
    tolerance: f64,
}

impl Default for PartSplitter {
    fn default() -> Self {
        Self::new(ContainmentMode::default())
    }
}

impl PartSplitter {
    pub fn new(containment: ContainmentMode) -> Self {
        Self {
            containment,
            tolerance: INTERSECTION_TOLERANCE,
        }
    }

    pub fn containment(&self) -> ContainmentMode {
        self.containment
    }

    /// Splits `contour` and distributes `holes` and `mills` over the parts.
    ///
    /// Parts are numbered from `base_index` in the order they are finished.
    pub fn split(
        &self,
        contour: &Curve,
        splitters: &[Curve],
        holes: Vec<Curve>,
        mills: Vec<Curve>,
        base_index: usize,
    ) -> LayoutResult<SplitOutcome> {
        if !contour.is_closed() {
            return Err(GeometryError::OpenContour.into());
        }

        let mut finished: Vec<Curve> = Vec::with_capacity(splitters.len() + 1);
        let mut candidate_a = contour.clone();
        let mut candidate_b = contour.clone();
        let mut has_split = false;
        let mut skipped_splitters = 0;

        for (n, splitter) in splitters.iter().enumerate() {
            let hits_a = self.crossings(&candidate_a, splitter);
            let (target, other, hits) = if hits_a.len() >= 2 {
                (&candidate_a, &candidate_b, hits_a)
            } else {
                let hits_b = self.crossings(&candidate_b, splitter);
                if hits_b.len() >= 2 {
                    (&candidate_b, &candidate_a, hits_b)
                } else {
                    tracing::warn!("Splitter {} does not cross the panel, skipping", n);
                    skipped_splitters += 1;
                    continue;
                }
            };

            if has_split {
                finished.push(other.clone());
            }

            let (first, second) = self.cut(target, splitter, &hits)?;
            candidate_a = first;
            candidate_b = second;
            has_split = true;
        }

        finished.push(candidate_a);
        if has_split {
            finished.push(candidate_b);
        }

        let hole_bags = self.distribute(&finished, holes, |contour, hole| {
            hole.start()
                .is_some_and(|start| self.encloses(contour, &start))
        });
        let mill_bags = self.distribute(&finished, mills, |contour, mill| {
            !intersect(contour, mill, self.tolerance).is_empty()
                || mill
                    .start()
                    .is_some_and(|start| self.encloses(contour, &start))
        });

        let parts: Vec<Part> = finished
            .into_iter()
            .zip(hole_bags)
            .zip(mill_bags)
            .enumerate()
            .map(|(position, ((contour, holes), mills))| Part {
                index: base_index + position,
                contour,
                holes,
                mills,
            })
            .collect();

        debug!(
            parts = parts.len(),
            skipped_splitters, base_index, "panel split"
        );

        Ok(SplitOutcome {
            parts,
            skipped_splitters,
        })
    }

    fn crossings(&self, candidate: &Curve, splitter: &Curve) -> Vec<CurveIntersection> {
        intersect(candidate, splitter, self.tolerance)
            .into_iter()
            .filter(|hit| hit.is_point)
            .collect()
    }

    /// Cuts `target` along the part of `splitter` between its outermost crossings.
    fn cut(
        &self,
        target: &Curve,
        splitter: &Curve,
        hits: &[CurveIntersection],
    ) -> LayoutResult<(Curve, Curve)> {
        let by_splitter = |a: &&CurveIntersection, b: &&CurveIntersection| {
            a.param_b.total_cmp(&b.param_b)
        };
        let (Some(entry), Some(exit)) = (
            hits.iter().min_by(by_splitter),
            hits.iter().max_by(by_splitter),
        ) else {
            return Err(GeometryError::EmptyInput("splitter has no crossings".to_string()).into());
        };

        let bridge = splitter.trim(entry.param_b, exit.param_b);
        let [first, second]: [Curve; 2] = split(target, &[entry.param_a, exit.param_a])
            .try_into()
            .map_err(|pieces: Vec<Curve>| GeometryError::JoinFailed {
                fragments: pieces.len(),
            })?;

        let first = join_closed(&[first, bridge.clone()], self.tolerance)?;
        let second = join_closed(&[second, bridge], self.tolerance)?;
        Ok((first, second))
    }

    fn encloses(&self, contour: &Curve, point: &Point2<f64>) -> bool {
        match self.containment {
            ContainmentMode::Region => {
                contains_point(contour, point, self.tolerance) == Containment::Inside
            }
            ContainmentMode::BoundingBox => contour.bounding_box().contains(point, self.tolerance),
        }
    }

    /// Hands each curve to the first part accepting it.
    ///
    /// Owners are resolved for the whole pool before anything moves, then the
    /// pool is drained once into per-part bags.
    fn distribute<F>(&self, contours: &[Curve], pool: Vec<Curve>, accepts: F) -> Vec<Vec<Curve>>
    where
        F: Fn(&Curve, &Curve) -> bool,
    {
        let owners: Vec<usize> = pool
            .iter()
            .map(|curve| {
                contours
                    .iter()
                    .position(|contour| accepts(contour, curve))
                    .unwrap_or_else(|| fallback_owner(contours, curve))
            })
            .collect();

        let mut bags = vec![Vec::new(); contours.len()];
        for (curve, owner) in pool.into_iter().zip(owners) {
            bags[owner].push(curve);
        }
        bags
    }
}

/// Owner for a curve no part accepted: the part whose bounding box holds the
/// curve's centre, otherwise the part with the nearest centre.
fn fallback_owner(contours: &[Curve], curve: &Curve) -> usize {
    let center = curve.bounding_box().center();
    if let Some(owner) = contours
        .iter()
        .position(|c| c.bounding_box().contains(&center, INTERSECTION_TOLERANCE))
    {
        return owner;
    }

    let nearest = contours
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let da = (a.bounding_box().center() - center).norm();
            let db = (b.bounding_box().center() - center).norm();
            da.total_cmp(&db)
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    tracing::warn!(
        "Curve at ({:.3}, {:.3}) lies outside every part, assigning to part {}",
        center.x,
        center.y,
        nearest
    );
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> Curve {
        Curve::rectangle(30.0, 300.0, Point2::new(15.0, 150.0))
    }

    fn splitter_at(y: f64) -> Curve {
        Curve::line(Point2::new(-5.0, y), Point2::new(35.0, y))
    }

    fn hole_at(y: f64) -> Curve {
        Curve::rectangle(4.0, 2.0, Point2::new(15.0, y))
    }

    #[test]
    fn test_no_splitters_yields_whole_contour() {
        let outcome = PartSplitter::default()
            .split(&panel(), &[], vec![hole_at(50.0)], Vec::new(), 4)
            .unwrap();
        assert_eq!(outcome.part_count(), 1);
        assert_eq!(outcome.parts[0].index, 4);
        assert_eq!(outcome.parts[0].holes.len(), 1);
        assert_eq!(outcome.parts[0].contour, panel());
    }

    #[test]
    fn test_two_splitters_yield_three_parts() {
        let splitters = vec![splitter_at(100.0), splitter_at(200.0)];
        let holes = vec![hole_at(50.0), hole_at(150.0), hole_at(250.0), hole_at(260.0)];
        let outcome = PartSplitter::default()
            .split(&panel(), &splitters, holes, Vec::new(), 0)
            .unwrap();

        assert_eq!(outcome.part_count(), 3);
        assert_eq!(outcome.skipped_splitters, 0);

        let areas: f64 = outcome.parts.iter().map(|p| p.contour.area()).sum();
        assert!((areas - panel().area()).abs() < 1e-6);

        // Each cut adds its bridge to both sides.
        let lengths: f64 = outcome.parts.iter().map(|p| p.contour.length()).sum();
        assert!((lengths - panel().length() - 4.0 * 30.0).abs() < 1e-6);

        let hole_count: usize = outcome.parts.iter().map(|p| p.holes.len()).sum();
        assert_eq!(hole_count, 4);
        for part in &outcome.parts {
            for hole in &part.holes {
                let start = hole.start().unwrap();
                assert_eq!(
                    contains_point(&part.contour, &start, INTERSECTION_TOLERANCE),
                    Containment::Inside
                );
            }
        }

        let indices: Vec<usize> = outcome.parts.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_missing_splitter_is_skipped() {
        let splitters = vec![Curve::line(Point2::new(100.0, 0.0), Point2::new(200.0, 0.0))];
        let outcome = PartSplitter::default()
            .split(&panel(), &splitters, Vec::new(), Vec::new(), 0)
            .unwrap();
        assert_eq!(outcome.part_count(), 1);
        assert_eq!(outcome.skipped_splitters, 1);
    }

    #[test]
    fn test_mills_follow_intersection() {
        let splitters = vec![splitter_at(100.0)];
        let crossing = Curve::line(Point2::new(-1.0, 150.0), Point2::new(31.0, 150.0));
        let inside = Curve::line(Point2::new(5.0, 20.0), Point2::new(25.0, 20.0));
        let outcome = PartSplitter::default()
            .split(&panel(), &splitters, Vec::new(), vec![crossing, inside], 0)
            .unwrap();
        let mills: usize = outcome.parts.iter().map(|p| p.mills.len()).sum();
        assert_eq!(mills, 2);
        for part in &outcome.parts {
            assert_eq!(part.mills.len(), 1);
        }
    }

    #[test]
    fn test_stray_hole_falls_back_to_nearest_part() {
        let outcome = PartSplitter::new(ContainmentMode::BoundingBox)
            .split(&panel(), &[splitter_at(150.0)], vec![hole_at(400.0)], Vec::new(), 0)
            .unwrap();
        let total: usize = outcome.parts.iter().map(|p| p.holes.len()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_open_contour_is_rejected() {
        let open = Curve::from_coords(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert!(PartSplitter::default()
            .split(&open, &[], Vec::new(), Vec::new(), 0)
            .is_err());
    }
}
