//! Connector silhouettes.
//!
//! Every template is authored in a local frame: x across the panel, y along
//! it, with the module centre (or the cap edge) at the origin. Side profiles
//! describe the right-hand edge; the left-hand edge is their mirror image.
//! The blueprint maps templates into place with a [`wallkit_core::Frame2`].

use std::f64::consts::FRAC_PI_2;

use wallkit_core::{Curve, Point2};

/// Across offset of the narrow panel edge.
pub const NARROW_HALF_WIDTH: f64 = 14.3;
/// Across offset of the wide panel edge.
pub const WIDE_HALF_WIDTH: f64 = 30.0;
/// Distance of the end holes from the edge they sit behind.
pub const EDGE_HOLE_INSET: f64 = 5.213;
/// Clearance added beyond the material thickness at notch corners.
pub const RELIEF_DEPTH: f64 = 0.6;
/// Length of the relief pocket at notch corners.
pub const RELIEF_LENGTH: f64 = 1.2;

const SMALL_ARC_SEGMENTS: usize = 4;

/// Source of connector geometry for the blueprint.
pub trait ShapeTemplates: Send + Sync {
    /// Right edge of a narrow panel across one A module.
    fn narrow_side_a(&self, thickness: f64) -> Curve;
    /// Right edge of a narrow panel across one B module.
    fn narrow_side_b(&self) -> Curve;
    /// Cut-outs inside a narrow panel at a B module.
    fn narrow_holes_b(&self, thickness: f64) -> Vec<Curve>;
    /// Slot behind the right edge near a narrow panel end or corner.
    fn narrow_edge_hole(&self, thickness: f64) -> Curve;
    /// Narrow end piece; the edge lies on y = 0 and both sides rise to `reach`.
    fn narrow_end_cap(&self, thickness: f64, reach: f64) -> Curve;
    /// Open splitter crossing a narrow panel at an A module centre.
    fn narrow_splitter(&self) -> Curve;

    fn wide_side_a(&self, thickness: f64) -> Curve;
    fn wide_side_b(&self, thickness: f64) -> Curve;
    fn wide_holes_b(&self, thickness: f64) -> Vec<Curve>;
    fn wide_end_cap(&self, thickness: f64, reach: f64) -> Curve;
    fn wide_splitter(&self) -> Curve;
    /// Half-depth groove across a wide panel.
    fn wide_mill(&self) -> Curve;

    /// Closed contour of the transversal brace.
    fn transversal_contour(&self) -> Curve;
}

/// The stock connector system.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTemplates;

/// Rectangular notch of `depth` spanning `span`, with relief pockets.
///
/// Coordinates are `(u, v)`: u along the edge, v into the material.
pub fn square_notch(depth: f64, span: f64) -> Vec<Point2<f64>> {
    let h = span * 0.5;
    let deep = depth + RELIEF_DEPTH;
    vec![
        Point2::new(-h, 0.0),
        Point2::new(-h, deep),
        Point2::new(-h + RELIEF_LENGTH, deep),
        Point2::new(-h + RELIEF_LENGTH, depth),
        Point2::new(h - RELIEF_LENGTH, depth),
        Point2::new(h - RELIEF_LENGTH, deep),
        Point2::new(h, deep),
        Point2::new(h, 0.0),
    ]
}

/// Dovetail socket with a 5.57 mouth, in edge coordinates.
pub fn dovetail_socket() -> Vec<Point2<f64>> {
    let p = Point2::new;
    let mut points = Vec::new();
    points.extend(arc(p(-2.785, 0.0), p(-2.791, 0.087), p(-2.810, 0.172)));
    points.extend(arc(p(-4.5, 5.0), p(-4.324, 5.424), p(-3.9, 5.6)));
    points.extend(arc(p(3.9, 5.6), p(4.324, 5.424), p(4.5, 5.0)));
    points.extend(arc(p(2.810, 0.172), p(2.791, 0.087), p(2.785, 0.0)));
    points
}

/// Shallow rounded locating notch, in edge coordinates.
pub fn round_notch() -> Vec<Point2<f64>> {
    let p = Point2::new;
    let mut points = Vec::new();
    points.extend(arc(p(-1.697, 0.0), p(-1.351, 0.11), p(-1.131, 0.4)));
    points.extend(arc(p(-1.131, 0.4), p(0.0, 1.2), p(1.131, 0.4)));
    points.extend(arc(p(1.131, 0.4), p(1.351, 0.11), p(1.697, 0.0)));
    points
}

fn arc(start: Point2<f64>, mid: Point2<f64>, end: Point2<f64>) -> Vec<Point2<f64>> {
    Curve::arc_through(start, mid, end, SMALL_ARC_SEGMENTS).into_points()
}

/// Places an edge profile on a vertical right-hand edge at `x`, centred at `y`.
fn on_side(profile: &[Point2<f64>], x: f64, y: f64) -> impl Iterator<Item = Point2<f64>> + '_ {
    profile.iter().map(move |p| Point2::new(x - p.y, y + p.x))
}

/// Places an edge profile on the horizontal edge y = 0, centred at `x`.
fn on_end(profile: &[Point2<f64>], x: f64) -> impl Iterator<Item = Point2<f64>> + '_ {
    profile.iter().map(move |p| Point2::new(x + p.x, p.y))
}

/// Slot of `length` with round ends, running along y.
fn upright_slot(length: f64, radius: f64, x: f64, y: f64) -> Curve {
    let center = Point2::new(x, y);
    Curve::stadium(length, radius, center).rotated(FRAC_PI_2, center)
}

/// H shaped cut-off of `width` across and `height` along, centred at the origin.
fn h_cutoff(width: f64, height: f64, y: f64) -> Curve {
    let (ex, ey) = (width * 0.5, height * 0.5);
    let inner = ex - RELIEF_LENGTH;
    let tall = ey + RELIEF_DEPTH;
    Curve::from_coords(&[
        (-inner, y - ey),
        (-inner, y - tall),
        (-ex, y - tall),
        (-ex, y + tall),
        (-inner, y + tall),
        (-inner, y + ey),
        (inner, y + ey),
        (inner, y + tall),
        (ex, y + tall),
        (ex, y - tall),
        (inner, y - tall),
        (inner, y - ey),
        (-inner, y - ey),
    ])
}

/// One splitter tooth: base half-width, waist, shoulder and top half-width.
struct Tooth {
    base: (f64, f64),
    base_mid: (f64, f64),
    waist: (f64, f64),
    shoulder: (f64, f64),
    top_mid: (f64, f64),
    top: (f64, f64),
}

const NARROW_TOOTH: Tooth = Tooth {
    base: (4.208, 0.0),
    base_mid: (3.750, 0.212),
    waist: (3.616, 0.699),
    shoulder: (5.804, 5.301),
    top_mid: (5.670, 5.788),
    top: (5.212, 6.000),
};

const WIDE_TOOTH: Tooth = Tooth {
    base: (3.165, 0.0),
    base_mid: (2.658, 0.280),
    waist: (2.624, 0.858),
    shoulder: (3.711, 3.142),
    top_mid: (3.677, 3.720),
    top: (3.170, 4.000),
};

impl Tooth {
    /// Tooth outline from its left base to its right base, centred at `x`.
    fn points(&self, x: f64) -> Vec<Point2<f64>> {
        let at = |(u, v): (f64, f64), side: f64| Point2::new(x + side * u, v);
        let mut points = Vec::new();
        points.extend(arc(at(self.base, -1.0), at(self.base_mid, -1.0), at(self.waist, -1.0)));
        points.extend(arc(at(self.shoulder, -1.0), at(self.top_mid, -1.0), at(self.top, -1.0)));
        points.extend(arc(at(self.top, 1.0), at(self.top_mid, 1.0), at(self.shoulder, 1.0)));
        points.extend(arc(at(self.waist, 1.0), at(self.base_mid, 1.0), at(self.base, 1.0)));
        points
    }
}

fn splitter(half_length: f64, tooth: &Tooth, centers: &[f64]) -> Curve {
    let mut points = vec![Point2::new(-half_length, 0.0)];
    for &x in centers {
        points.extend(tooth.points(x));
    }
    points.push(Point2::new(half_length, 0.0));
    Curve::polyline(points)
}

/// Stepped corner profile of a wide end cap, left side, from the edge upwards.
fn wide_corner(thickness: f64) -> Vec<Point2<f64>> {
    let edge = -WIDE_HALF_WIDTH;
    let notch = edge + thickness;
    let relief = notch + RELIEF_DEPTH;
    vec![
        Point2::new(notch, 0.0),
        Point2::new(notch, 2.8),
        Point2::new(relief, 2.8),
        Point2::new(relief, 4.0),
        Point2::new(edge, 4.0),
        Point2::new(edge, 6.5),
        Point2::new(relief, 6.5),
        Point2::new(relief, 7.7),
        Point2::new(notch, 7.7),
        Point2::new(notch, 8.8),
        Point2::new(relief, 8.8),
        Point2::new(relief, 10.0),
        Point2::new(edge, 10.0),
    ]
}

impl ShapeTemplates for StandardTemplates {
    fn narrow_side_a(&self, thickness: f64) -> Curve {
        let notch = square_notch(thickness, 16.25);
        let x = NARROW_HALF_WIDTH;
        Curve::polyline(
            on_side(&notch, x, -11.875).chain(on_side(&notch, x, 11.875)),
        )
    }

    fn narrow_side_b(&self) -> Curve {
        Curve::line(
            Point2::new(NARROW_HALF_WIDTH, -10.0),
            Point2::new(NARROW_HALF_WIDTH, 10.0),
        )
    }

    fn narrow_holes_b(&self, thickness: f64) -> Vec<Curve> {
        let x = narrow_slot_x(thickness);
        vec![
            h_cutoff(5.0, thickness, 0.0),
            upright_slot(5.0, thickness / 4.0, x, 0.0),
            upright_slot(5.0, thickness / 4.0, -x, 0.0),
        ]
    }

    fn narrow_edge_hole(&self, thickness: f64) -> Curve {
        upright_slot(2.574, thickness / 4.0, narrow_slot_x(thickness), 0.0)
    }

    fn narrow_end_cap(&self, thickness: f64, reach: f64) -> Curve {
        let notch = square_notch(thickness, 6.0);
        let x = NARROW_HALF_WIDTH;
        let mut points = vec![Point2::new(-x, reach), Point2::new(-x, 0.0)];
        points.extend(on_end(&notch, -6.6));
        points.extend(on_end(&notch, 5.4));
        points.push(Point2::new(x, 0.0));
        points.push(Point2::new(x, reach));
        Curve::polyline(points)
    }

    fn narrow_splitter(&self) -> Curve {
        splitter(NARROW_HALF_WIDTH + 1.2, &NARROW_TOOTH, &[0.0])
    }

    fn wide_side_a(&self, thickness: f64) -> Curve {
        let x = WIDE_HALF_WIDTH;
        let socket = dovetail_socket();
        let notch = square_notch(thickness, 7.5);
        let mut points = vec![Point2::new(x, -20.0)];
        points.extend(on_side(&socket, x, -10.445));
        points.extend(on_side(&notch, x, 0.0));
        points.extend(on_side(&socket, x, 10.445));
        points.push(Point2::new(x, 20.0));
        Curve::polyline(points)
    }

    fn wide_side_b(&self, thickness: f64) -> Curve {
        let x = WIDE_HALF_WIDTH;
        let notch = square_notch(thickness, 7.5);
        Curve::polyline(on_side(&notch, x, -6.25).chain(on_side(&notch, x, 6.25)))
    }

    fn wide_holes_b(&self, thickness: f64) -> Vec<Curve> {
        vec![
            Curve::stadium(10.0, thickness / 2.0, Point2::new(0.0, -10.0)),
            h_cutoff(12.0, thickness, 0.0),
            Curve::stadium(10.0, thickness / 2.0, Point2::new(0.0, 10.0)),
        ]
    }

    fn wide_end_cap(&self, thickness: f64, reach: f64) -> Curve {
        let socket = dovetail_socket();
        let notch = round_notch();

        let mut left = wide_corner(thickness);
        left.push(Point2::new(-WIDE_HALF_WIDTH, reach));
        left.reverse();

        let mut points = left.clone();
        points.extend(on_end(&notch, -25.237));
        points.extend(on_end(&socket, -19.49));
        points.extend(on_end(&socket, 0.0));
        points.extend(on_end(&socket, 19.49));
        points.extend(on_end(&notch, 25.237));
        points.extend(left.iter().rev().map(|p| Point2::new(-p.x, p.y)));
        Curve::polyline(points)
    }

    fn wide_splitter(&self) -> Curve {
        splitter(WIDE_HALF_WIDTH + 1.5, &WIDE_TOOTH, &[-12.67, 0.0, 12.67])
    }

    fn wide_mill(&self) -> Curve {
        Curve::line(Point2::new(-26.4, 0.0), Point2::new(26.4, 0.0))
    }

    fn transversal_contour(&self) -> Curve {
        // One quadrant, mirrored into the other three.
        let quadrant = [
            (30.0, 2.5),
            (27.6, 2.5),
            (27.6, 3.7),
            (28.2, 3.7),
            (28.2, 12.5),
            (7.2, 12.5),
            (7.2, 11.9),
            (6.0, 11.9),
            (6.0, 14.3),
        ];
        let top_right = quadrant.iter().map(|&(x, y)| Point2::new(x, y));
        let top_left = quadrant.iter().rev().map(|&(x, y)| Point2::new(-x, y));
        let bottom_left = quadrant.iter().map(|&(x, y)| Point2::new(-x, -y));
        let bottom_right = quadrant.iter().rev().map(|&(x, y)| Point2::new(x, -y));
        Curve::closed_polyline(
            top_right
                .chain(top_left)
                .chain(bottom_left)
                .chain(bottom_right),
        )
    }
}

/// Across offset of the slots behind the narrow edge.
fn narrow_slot_x(thickness: f64) -> f64 {
    12.95 - (thickness - 1.8) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallkit_core::{intersect, INTERSECTION_TOLERANCE};

    const T: f64 = 1.8;

    fn assert_near(a: Point2<f64>, b: Point2<f64>) {
        assert!((a - b).norm() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_narrow_sides_span_their_footprint() {
        let t = StandardTemplates;
        let a = t.narrow_side_a(T);
        assert_near(a.start().unwrap(), Point2::new(NARROW_HALF_WIDTH, -20.0));
        assert_near(a.end().unwrap(), Point2::new(NARROW_HALF_WIDTH, 20.0));
        let b = t.narrow_side_b();
        assert!((b.length() - 20.0).abs() < 1e-12);
        // Notches cut into the panel.
        assert!(a.bounding_box().min.x < NARROW_HALF_WIDTH - T);
        assert!(a.bounding_box().max.x <= NARROW_HALF_WIDTH + 1e-12);
    }

    #[test]
    fn test_wide_sides_span_their_footprint() {
        let t = StandardTemplates;
        let a = t.wide_side_a(T);
        assert_near(a.start().unwrap(), Point2::new(WIDE_HALF_WIDTH, -20.0));
        assert_near(a.end().unwrap(), Point2::new(WIDE_HALF_WIDTH, 20.0));
        let b = t.wide_side_b(T);
        assert_near(b.start().unwrap(), Point2::new(WIDE_HALF_WIDTH, -10.0));
        assert_near(b.end().unwrap(), Point2::new(WIDE_HALF_WIDTH, 10.0));
    }

    #[test]
    fn test_end_caps_reach_both_sides() {
        let t = StandardTemplates;
        let cap = t.narrow_end_cap(T, 25.0);
        assert_near(cap.start().unwrap(), Point2::new(-NARROW_HALF_WIDTH, 25.0));
        assert_near(cap.end().unwrap(), Point2::new(NARROW_HALF_WIDTH, 25.0));

        let cap = t.wide_end_cap(T, 25.0);
        assert_near(cap.start().unwrap(), Point2::new(-WIDE_HALF_WIDTH, 25.0));
        assert_near(cap.end().unwrap(), Point2::new(WIDE_HALF_WIDTH, 25.0));
        let bb = cap.bounding_box();
        assert!(bb.min.y.abs() < 1e-12);
    }

    #[test]
    fn test_splitter_crosses_narrow_side_once_per_edge() {
        let t = StandardTemplates;
        let splitter = t.narrow_splitter();
        let right = t.narrow_side_a(T);
        let left = right.mirrored_x();
        assert_eq!(intersect(&right, &splitter, INTERSECTION_TOLERANCE).len(), 1);
        assert_eq!(intersect(&left, &splitter, INTERSECTION_TOLERANCE).len(), 1);
    }

    #[test]
    fn test_splitter_crosses_wide_side_once_per_edge() {
        let t = StandardTemplates;
        let splitter = t.wide_splitter();
        let right = t.wide_side_a(T);
        let hits = intersect(&right, &splitter, INTERSECTION_TOLERANCE);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point.x - (WIDE_HALF_WIDTH - T)).abs() < 1e-9);
    }

    #[test]
    fn test_transversal_contour_is_closed_and_symmetric() {
        let contour = StandardTemplates.transversal_contour();
        assert!(contour.is_closed());
        assert_eq!(contour.points().len(), 37);
        let bb = contour.bounding_box();
        assert!((bb.width() - 60.0).abs() < 1e-12);
        assert!((bb.height() - 28.6).abs() < 1e-12);
        assert!(bb.center().coords.norm() < 1e-12);
    }

    #[test]
    fn test_holes_are_closed() {
        let t = StandardTemplates;
        for hole in t.narrow_holes_b(T).iter().chain(t.wide_holes_b(T).iter()) {
            assert!(hole.is_closed());
        }
        assert!(t.narrow_edge_hole(T).is_closed());
    }
}
