//! Polyline curves.
//!
//! Every curve is an ordered list of points. Arcs are tessellated when they
//! are built, so all kernel operations work segment by segment. The parameter
//! domain of a curve with `n` segments is `[0, n]`: parameter `k + f` lies at
//! fraction `f` along segment `k`.

use nalgebra::{Isometry2, Point2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::frame::Frame2;
use super::ABSOLUTE_TOLERANCE;

/// Number of chords used for a half circle.
pub const ARC_SEGMENTS_PER_HALF_TURN: usize = 8;

/// Axis aligned bounds of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Inclusive containment, grown by `tolerance` on every side.
    pub fn contains(&self, point: &Point2<f64>, tolerance: f64) -> bool {
        point.x >= self.min.x - tolerance
            && point.x <= self.max.x + tolerance
            && point.y >= self.min.y - tolerance
            && point.y <= self.max.y + tolerance
    }
}

/// An open or closed polyline in the working plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    points: Vec<Point2<f64>>,
}

fn push_unique_point(points: &mut Vec<Point2<f64>>, point: Point2<f64>) {
    if let Some(last) = points.last() {
        if (last - point).norm() <= ABSOLUTE_TOLERANCE {
            return;
        }
    }
    points.push(point);
}

impl Curve {
    /// Builds a polyline, dropping consecutive duplicate points.
    pub fn polyline(points: impl IntoIterator<Item = Point2<f64>>) -> Self {
        let mut unique = Vec::new();
        for point in points {
            push_unique_point(&mut unique, point);
        }
        Self { points: unique }
    }

    /// Builds a polyline from raw `(x, y)` pairs.
    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self::polyline(coords.iter().map(|&(x, y)| Point2::new(x, y)))
    }

    /// Builds a closed polyline; the first point is repeated at the end when needed.
    pub fn closed_polyline(points: impl IntoIterator<Item = Point2<f64>>) -> Self {
        let mut curve = Self::polyline(points);
        if let Some(first) = curve.points.first().copied() {
            if curve.points.len() > 1 && !curve.is_closed() {
                curve.points.push(first);
            }
        }
        curve
    }

    pub fn line(a: Point2<f64>, b: Point2<f64>) -> Self {
        Self::polyline([a, b])
    }

    /// Circular arc through three points, tessellated into `segments` chords.
    ///
    /// Collinear input degrades to a straight line from `start` to `end`.
    pub fn arc_through(
        start: Point2<f64>,
        mid: Point2<f64>,
        end: Point2<f64>,
        segments: usize,
    ) -> Self {
        let Some(center) = circumcenter(&start, &mid, &end) else {
            return Self::line(start, end);
        };

        let radius = (start - center).norm();
        let a0 = angle_of(&start, &center);
        let am = angle_of(&mid, &center);
        let a1 = angle_of(&end, &center);

        let ccw_sweep = normalize_angle(a1 - a0);
        let ccw_to_mid = normalize_angle(am - a0);
        let sweep = if ccw_to_mid <= ccw_sweep {
            ccw_sweep
        } else {
            ccw_sweep - 2.0 * PI
        };

        let count = segments.max(1);
        let mut points = Vec::with_capacity(count + 1);
        points.push(start);
        for k in 1..count {
            let angle = a0 + sweep * k as f64 / count as f64;
            points.push(center + Vector2::new(angle.cos(), angle.sin()) * radius);
        }
        points.push(end);
        Self::polyline(points)
    }

    /// Closed slot of straight `length` with round ends of `radius`, laid along x.
    pub fn stadium(length: f64, radius: f64, center: Point2<f64>) -> Self {
        let half = length * 0.5;
        let mut points = Vec::with_capacity(2 * ARC_SEGMENTS_PER_HALF_TURN + 3);
        for k in 0..=ARC_SEGMENTS_PER_HALF_TURN {
            let angle = -PI / 2.0 + PI * k as f64 / ARC_SEGMENTS_PER_HALF_TURN as f64;
            points.push(Point2::new(
                center.x + half + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ));
        }
        for k in 0..=ARC_SEGMENTS_PER_HALF_TURN {
            let angle = PI / 2.0 + PI * k as f64 / ARC_SEGMENTS_PER_HALF_TURN as f64;
            points.push(Point2::new(
                center.x - half + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ));
        }
        Self::closed_polyline(points)
    }

    /// Axis aligned closed rectangle centred on `center`.
    pub fn rectangle(width: f64, height: f64, center: Point2<f64>) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        Self::closed_polyline([
            Point2::new(center.x - hw, center.y - hh),
            Point2::new(center.x + hw, center.y - hh),
            Point2::new(center.x + hw, center.y + hh),
            Point2::new(center.x - hw, center.y + hh),
        ])
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point2<f64>> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.len() < 2
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Closed curves repeat their first point and enclose at least a triangle.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() >= 4 => {
                (first - last).norm() <= ABSOLUTE_TOLERANCE
            }
            _ => false,
        }
    }

    pub fn start(&self) -> Option<Point2<f64>> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point2<f64>> {
        self.points.last().copied()
    }

    pub fn segment(&self, index: usize) -> (Point2<f64>, Point2<f64>) {
        (self.points[index], self.points[index + 1])
    }

    pub fn segments(&self) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| (b - a).norm()).sum()
    }

    /// Point at parameter `t`, clamped to the curve domain.
    pub fn point_at(&self, t: f64) -> Point2<f64> {
        let n = self.segment_count();
        if n == 0 {
            return self.points.first().copied().unwrap_or_else(Point2::origin);
        }
        let t = t.clamp(0.0, n as f64);
        let index = (t.floor() as usize).min(n - 1);
        let fraction = t - index as f64;
        let (a, b) = self.segment(index);
        a + (b - a) * fraction
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        BoundingBox { min, max }
    }

    /// Shoelace area; positive for counter-clockwise loops.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let p1 = self.points[i];
            let p2 = self.points[(i + 1) % n];
            sum += p1.x * p2.y - p2.x * p1.y;
        }
        sum * 0.5
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Open sub-curve between parameters `t0 < t1`.
    pub fn trim(&self, t0: f64, t1: f64) -> Self {
        let n = self.segment_count() as f64;
        let (t0, t1) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
        let (t0, t1) = (t0.clamp(0.0, n), t1.clamp(0.0, n));
        let mut points = vec![self.point_at(t0)];
        let first_vertex = t0.floor() as usize + 1;
        let last_vertex = t1.ceil() as usize;
        for k in first_vertex..last_vertex {
            if (k as f64) > t0 && (k as f64) < t1 {
                points.push(self.points[k]);
            }
        }
        points.push(self.point_at(t1));
        Self::polyline(points)
    }

    /// Rotates about `center` by `angle` radians (counter-clockwise).
    pub fn rotate(&mut self, angle: f64, center: Point2<f64>) {
        let rotation = Rotation2::new(angle);
        for p in &mut self.points {
            *p = center + rotation * (*p - center);
        }
    }

    pub fn rotated(mut self, angle: f64, center: Point2<f64>) -> Self {
        self.rotate(angle, center);
        self
    }

    pub fn translate(&mut self, offset: Vector2<f64>) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    pub fn transform(&mut self, isometry: &Isometry2<f64>) {
        for p in &mut self.points {
            *p = isometry * *p;
        }
    }

    /// Maps local frame coordinates (x across, y along) into the plane.
    pub fn map_frame(&self, frame: &Frame2) -> Self {
        Self {
            points: self.points.iter().map(|p| frame.map_point(p)).collect(),
        }
    }

    /// Mirror across the local y axis, keeping point order.
    pub fn mirrored_x(&self) -> Self {
        Self {
            points: self.points.iter().map(|p| Point2::new(-p.x, p.y)).collect(),
        }
    }
}

fn angle_of(point: &Point2<f64>, center: &Point2<f64>) -> f64 {
    (point.y - center.y).atan2(point.x - center.x)
}

fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(2.0 * PI)
}

fn circumcenter(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Option<Point2<f64>> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-12 {
        return None;
    }
    let a2 = a.coords.norm_squared();
    let b2 = b.coords.norm_squared();
    let c2 = c.coords.norm_squared();
    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
    Some(Point2::new(ux, uy))
}
