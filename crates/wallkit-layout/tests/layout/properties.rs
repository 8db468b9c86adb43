use std::collections::BTreeSet;

use proptest::prelude::*;
use wallkit_core::{Curve, Point2};
use wallkit_layout::module_layout::{ModuleLayout, END_MARGINS, MODULE_PITCH};
use wallkit_layout::{GuideLine, GuideLineGeometry, PartSplitter};

proptest! {
    #[test]
    fn layout_fits_inside_its_axis(length in END_MARGINS..5000.0f64) {
        let layout = ModuleLayout::solve(length);
        prop_assert!(layout.slack >= -1e-9);
        prop_assert!(layout.occupied() + END_MARGINS <= length + 1e-9);
        prop_assert_eq!(layout.count_b, layout.count_a.saturating_sub(1));

        let (start, end) = layout.span();
        prop_assert!((start - (length - end)).abs() < 1e-9);
    }

    #[test]
    fn one_more_pitch_adds_one_pair(length in 0.0..5000.0f64) {
        let shorter = ModuleLayout::solve(length);
        let longer = ModuleLayout::solve(length + MODULE_PITCH);
        prop_assert!(longer.count_a >= shorter.count_a);
        prop_assert!(longer.count_a - shorter.count_a <= 1);
        prop_assert!(longer.count_b >= shorter.count_b);
        prop_assert!(longer.count_b - shorter.count_b <= 1);
    }

    #[test]
    fn splitting_conserves_holes_and_area(
        cuts in prop::collection::btree_set(5u32..295, 0..6),
        holes in prop::collection::vec(3u32..297, 0..12),
    ) {
        let panel = Curve::rectangle(30.0, 300.0, Point2::new(15.0, 150.0));
        let splitters: Vec<Curve> = cuts
            .iter()
            .map(|&y| Curve::line(Point2::new(-5.0, y as f64), Point2::new(35.0, y as f64)))
            .collect();
        let hole_curves: Vec<Curve> = holes
            .iter()
            .map(|&y| Curve::rectangle(4.0, 1.0, Point2::new(15.0, y as f64 + 0.25)))
            .collect();

        let outcome = PartSplitter::default()
            .split(&panel, &splitters, hole_curves, Vec::new(), 0)
            .unwrap();

        prop_assert_eq!(outcome.part_count(), cuts.len() + 1);
        let assigned: usize = outcome.parts.iter().map(|p| p.holes.len()).sum();
        prop_assert_eq!(assigned, holes.len());

        let area: f64 = outcome.parts.iter().map(|p| p.contour.area()).sum();
        prop_assert!((area - panel.area()).abs() < 1e-6);

        let indices: BTreeSet<usize> = outcome.parts.iter().map(|p| p.index).collect();
        prop_assert_eq!(indices.len(), outcome.part_count());
    }

    #[test]
    fn outline_corners_straddle_the_guide(
        first in 200.0..600.0f64,
        second in 200.0..600.0f64,
        turn in -2.5..2.5f64,
    ) {
        let heading = std::f64::consts::FRAC_PI_2 + turn;
        let knee = Point2::new(0.0, first);
        let points = [
            Point2::new(0.0, 0.0),
            knee,
            Point2::new(knee.x + second * heading.cos(), knee.y + second * heading.sin()),
        ];
        let guide = GuideLine::from_points(&points).unwrap();
        let geometry = GuideLineGeometry::compute(&guide).unwrap();

        prop_assert_eq!(geometry.contour_points.len(), 2 * guide.len() + 2);
        for (joint, point) in points.iter().enumerate() {
            let mid = nalgebra::center(&geometry.right_corner(joint), &geometry.left_corner(joint));
            prop_assert!((mid - point).norm() < 1e-9);
        }
        for i in 0..guide.len() {
            prop_assert!(geometry.offsets_at_start[i] >= 0.0);
            prop_assert!(geometry.offsets_at_end[i] >= 0.0);
        }
    }
}
