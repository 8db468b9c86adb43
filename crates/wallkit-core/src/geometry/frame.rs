//! Local coordinate frames.
//!
//! Templates are authored in a local frame where x runs across the wall
//! (towards the right-hand side of the guide) and y runs along it.

use nalgebra::{Point2, Point3, Rotation2, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// A planar frame: `origin + across * x + along * y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame2 {
    pub origin: Point2<f64>,
    pub across: Vector2<f64>,
    pub along: Vector2<f64>,
}

impl Frame2 {
    /// Frame whose local axes are the world axes rotated by `rotation`.
    pub fn new(origin: Point2<f64>, rotation: f64) -> Self {
        let rotation = Rotation2::new(rotation);
        Self {
            origin,
            across: rotation * Vector2::x(),
            along: rotation * Vector2::y(),
        }
    }

    pub fn world() -> Self {
        Self::new(Point2::origin(), 0.0)
    }

    /// Same frame turned half a turn about its origin.
    pub fn turned(&self) -> Self {
        Self {
            origin: self.origin,
            across: -self.across,
            along: -self.along,
        }
    }

    pub fn at(&self, origin: Point2<f64>) -> Self {
        Self { origin, ..*self }
    }

    pub fn map(&self, x: f64, y: f64) -> Point2<f64> {
        self.origin + self.across * x + self.along * y
    }

    pub fn map_point(&self, point: &Point2<f64>) -> Point2<f64> {
        self.map(point.x, point.y)
    }

    /// Inverse of [`Frame2::map`].
    pub fn local(&self, point: &Point2<f64>) -> Point2<f64> {
        let d = point - self.origin;
        Point2::new(d.dot(&self.across), d.dot(&self.along))
    }
}

/// A flat sheet placed in space: `origin + x_axis * x + y_axis * y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame3 {
    pub origin: Point3<f64>,
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
}

impl Frame3 {
    /// The world XY plane lifted to height `z`.
    pub fn world_xy(z: f64) -> Self {
        Self {
            origin: Point3::new(0.0, 0.0, z),
            x_axis: Vector3::x(),
            y_axis: Vector3::y(),
        }
    }

    /// Frame that sends flat point `anchor_flat` to `anchor_world`.
    pub fn anchored(
        anchor_flat: Point2<f64>,
        anchor_world: Point3<f64>,
        x_axis: Vector3<f64>,
        y_axis: Vector3<f64>,
    ) -> Self {
        let origin = anchor_world - x_axis * anchor_flat.x - y_axis * anchor_flat.y;
        Self {
            origin,
            x_axis,
            y_axis,
        }
    }

    pub fn normal(&self) -> Vector3<f64> {
        self.x_axis.cross(&self.y_axis)
    }

    pub fn map(&self, point: &Point2<f64>) -> Point3<f64> {
        self.origin + self.x_axis * point.x + self.y_axis * point.y
    }
}
