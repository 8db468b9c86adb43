//! # WallKit Core
//!
//! The polyline curve kernel used by the panel layout engine, plus the
//! geometric error taxonomy shared by every WallKit crate.

pub mod error;
pub mod geometry;

pub use error::{GeometryError, GeometryResult};
pub use geometry::{
    contains_point, intersect, join, join_closed, join_single, offset, split, BoundingBox,
    Containment, CornerStyle, Curve, CurveIntersection, Frame2, Frame3, ABSOLUTE_TOLERANCE,
    INTERSECTION_TOLERANCE,
};

pub use nalgebra::{Point2, Point3, Vector2, Vector3};
