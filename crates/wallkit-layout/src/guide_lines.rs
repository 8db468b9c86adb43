//! Guide line validation and offset geometry.
//!
//! A guide is an ordered, open polyline describing the wall in plan view.
//! [`GuideLineGeometry`] turns it into the mitred outline of the wall
//! (`2N + 2` contour points for `N` segments) and one symmetry axis per
//! segment along which connector modules are centred.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;
use wallkit_core::{
    Frame2, GeometryError, GeometryResult, Point2, Point3, Vector2, ABSOLUTE_TOLERANCE,
};

/// Half the wall thickness in plan view.
pub const WALL_HALF_WIDTH: f64 = 14.3;

/// Deviation sign used when two consecutive segments are collinear.
pub const STRAIGHT_JOINT_SIGN: i32 = 1;

const ANGLE_TOLERANCE: f64 = 1e-9;

/// An oriented segment in the working plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideSegment {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl GuideSegment {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction; zero for a degenerate segment.
    pub fn direction(&self) -> Vector2<f64> {
        let d = self.end - self.start;
        let len = d.norm();
        if len <= f64::EPSILON {
            Vector2::zeros()
        } else {
            d / len
        }
    }

    /// Unit normal on the right-hand side of the direction.
    pub fn right_normal(&self) -> Vector2<f64> {
        let d = self.direction();
        Vector2::new(d.y, -d.x)
    }

    pub fn point_at_distance(&self, distance: f64) -> Point2<f64> {
        self.start + self.direction() * distance
    }
}

/// A validated, open guide polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideLine {
    segments: Vec<GuideSegment>,
}

impl GuideLine {
    /// Builds a guide from plan-view points.
    pub fn from_points(points: &[Point2<f64>]) -> GeometryResult<Self> {
        if points.len() < 2 {
            return Err(GeometryError::EmptyInput(format!(
                "guide needs at least 2 points, got {}",
                points.len()
            )));
        }

        let segments: Vec<GuideSegment> = points
            .windows(2)
            .map(|w| GuideSegment::new(w[0], w[1]))
            .collect();

        for (index, segment) in segments.iter().enumerate() {
            if segment.length() <= ABSOLUTE_TOLERANCE {
                return Err(GeometryError::Degenerate { index });
            }
            if index > 0 {
                let previous = segments[index - 1].direction();
                if previous.dot(&segment.direction()) <= -1.0 + ANGLE_TOLERANCE {
                    return Err(GeometryError::Reversal { index });
                }
            }
        }

        Ok(Self { segments })
    }

    /// Builds a guide from spatial points that must share one z value.
    pub fn from_points_3d(points: &[Point3<f64>]) -> GeometryResult<Self> {
        let Some(first) = points.first() else {
            return Err(GeometryError::EmptyInput("guide has no points".to_string()));
        };
        let deviation = points
            .iter()
            .map(|p| (p.z - first.z).abs())
            .fold(0.0, f64::max);
        if deviation > ABSOLUTE_TOLERANCE {
            return Err(GeometryError::NonPlanar { deviation });
        }
        let flat: Vec<Point2<f64>> = points.iter().map(|p| Point2::new(p.x, p.y)).collect();
        Self::from_points(&flat)
    }

    /// A single segment from the origin along +y.
    pub fn straight(length: f64) -> GeometryResult<Self> {
        Self::from_points(&[Point2::origin(), Point2::new(0.0, length)])
    }

    pub fn segments(&self) -> &[GuideSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(GuideSegment::length).sum()
    }

    pub fn points(&self) -> Vec<Point2<f64>> {
        let mut points: Vec<Point2<f64>> = self.segments.iter().map(|s| s.start).collect();
        if let Some(last) = self.segments.last() {
            points.push(last.end);
        }
        points
    }

    /// Merges consecutive collinear segments heading the same way.
    pub fn simplified(&self) -> Self {
        let mut merged: Vec<GuideSegment> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            if let Some(last) = merged.last_mut() {
                let a = last.direction();
                let b = segment.direction();
                let cross = a.x * b.y - a.y * b.x;
                if cross.abs() <= ANGLE_TOLERANCE && a.dot(&b) > 0.0 {
                    last.end = segment.end;
                    continue;
                }
            }
            merged.push(*segment);
        }
        Self { segments: merged }
    }
}

/// Rotational sense of `reference` relative to `direction`.
///
/// `+1` for a left turn, `-1` for a right turn and [`STRAIGHT_JOINT_SIGN`]
/// when the two are collinear.
pub fn deviation_sign(direction: &Vector2<f64>, reference: &Vector2<f64>) -> i32 {
    let right = Vector2::new(direction.y, -direction.x);
    let dot = right.dot(reference);
    if dot.abs() <= 1e-12 {
        STRAIGHT_JOINT_SIGN
    } else if dot > 0.0 {
        -1
    } else {
        1
    }
}

/// Offset outline and per-segment symmetry data for a guide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideLineGeometry {
    pub segments: Vec<GuideSegment>,
    /// Mitred wall outline. Point `k` is the right-hand end of joint `k`,
    /// point `len - 1 - k` the left-hand end.
    pub contour_points: Vec<Point2<f64>>,
    pub symmetry_axes: Vec<GuideSegment>,
    /// Angle that turns local +y onto the segment direction.
    pub rotations: Vec<f64>,
    pub offsets_at_start: Vec<f64>,
    pub offsets_at_end: Vec<f64>,
    /// Turn sense at the end of each segment (the last one is a synthetic straight joint).
    pub deviation_signs: Vec<i32>,
}

impl GuideLineGeometry {
    pub fn compute(guide: &GuideLine) -> GeometryResult<Self> {
        let segments = guide.segments().to_vec();
        let n = segments.len();
        if n == 0 {
            return Err(GeometryError::EmptyInput("guide has no segments".to_string()));
        }

        let (contour_points, deviation_signs) = Self::contour(&segments);

        let mut symmetry_axes = Vec::with_capacity(n);
        let mut rotations = Vec::with_capacity(n);
        let mut offsets_at_start = Vec::with_capacity(n);
        let mut offsets_at_end = Vec::with_capacity(n);

        for (index, segment) in segments.iter().enumerate() {
            let dir = segment.direction();

            let offset_start = (contour_points[index] - segment.start).dot(&dir).abs();
            let offset_end = (contour_points[index + 1] - segment.end).dot(&dir).abs();

            let axis_length = segment.length() - offset_start - offset_end;
            if axis_length < -ABSOLUTE_TOLERANCE {
                return Err(GeometryError::SegmentTooShort { index, axis_length });
            }

            let axis = GuideSegment::new(
                segment.start + dir * offset_start,
                segment.end - dir * offset_end,
            );
            debug!(
                segment = index,
                offset_start, offset_end, axis_length, "guide segment axis"
            );

            symmetry_axes.push(axis);
            rotations.push(dir.y.atan2(dir.x) - PI / 2.0);
            offsets_at_start.push(offset_start);
            offsets_at_end.push(offset_end);
        }

        Ok(Self {
            segments,
            contour_points,
            symmetry_axes,
            rotations,
            offsets_at_start,
            offsets_at_end,
            deviation_signs,
        })
    }

    fn contour(segments: &[GuideSegment]) -> (Vec<Point2<f64>>, Vec<i32>) {
        let n = segments.len();
        let len = 2 * n + 2;
        let mut points = vec![Point2::origin(); len];
        let mut signs = vec![STRAIGHT_JOINT_SIGN; n];

        // Joint j sits at the end of segment j; joint -1 is the start of the guide.
        for j in -1..n as isize {
            let segment = segments[j.max(0) as usize];
            let next = segments[((j + 1) as usize).min(n - 1)];

            let dir = segment.direction();
            let next_dir = next.direction();

            let between = (-dir).dot(&next_dir).clamp(-1.0, 1.0).acos();
            let half_angle = (PI - between) * 0.5;
            let miter = WALL_HALF_WIDTH * half_angle.tan();
            let sign = deviation_sign(&dir, &next_dir);
            if j >= 0 {
                signs[j as usize] = sign;
            }

            let normal = segment.right_normal() * WALL_HALF_WIDTH;
            let shift = dir * miter * sign as f64;
            let endpoint = if j < 0 { segment.start } else { segment.end };

            points[(j + 1) as usize] = endpoint + normal + shift;
            points[(len as isize - 2 - j) as usize] = endpoint - normal - shift;
        }

        (points, signs)
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn right_corner(&self, joint: usize) -> Point2<f64> {
        self.contour_points[joint]
    }

    pub fn left_corner(&self, joint: usize) -> Point2<f64> {
        self.contour_points[self.contour_points.len() - 1 - joint]
    }

    /// Frame at the segment start with local +y along the segment.
    pub fn segment_frame(&self, index: usize) -> Frame2 {
        Frame2::new(self.segments[index].start, self.rotations[index])
    }

    /// Frame at the symmetry axis start with local +y along the segment.
    pub fn axis_frame(&self, index: usize) -> Frame2 {
        Frame2::new(self.symmetry_axes[index].start, self.rotations[index])
    }

    /// The wall outline as one closed curve.
    pub fn outline(&self) -> wallkit_core::Curve {
        wallkit_core::Curve::closed_polyline(self.contour_points.iter().copied())
    }
}
