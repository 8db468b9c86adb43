use wallkit_core::{contains_point, Containment, Point2, INTERSECTION_TOLERANCE};
use wallkit_layout::blueprint::panels::narrow_panel;
use wallkit_layout::{
    Blueprint, BlueprintMaker, BlueprintParameters, GuideLine, GuideLineGeometry, PartKind,
    PartSource, Side, StandardTemplates, WallInput, WallVariant,
};

fn straight(length: f64) -> Blueprint {
    BlueprintMaker::new(WallInput::Straight { length }, BlueprintParameters::default())
        .generate()
        .unwrap()
}

fn irregular(points: &[(f64, f64)]) -> Blueprint {
    let points: Vec<Point2<f64>> = points.iter().map(|&(x, y)| Point2::new(x, y)).collect();
    let guide = GuideLine::from_points(&points).unwrap();
    BlueprintMaker::new(WallInput::Irregular { guide }, BlueprintParameters::default())
        .generate()
        .unwrap()
}

fn assert_indices_contiguous(blueprint: &Blueprint) {
    let mut all: Vec<usize> = [PartKind::Narrow, PartKind::Wide, PartKind::Transversal]
        .iter()
        .flat_map(|&kind| blueprint.indices_of(kind).to_vec())
        .collect();
    all.sort_unstable();
    assert_eq!(all, (0..blueprint.part_count()).collect::<Vec<_>>());
    for index in 0..blueprint.part_count() {
        assert!(blueprint.contour(index).unwrap().is_closed());
    }
}

#[test]
fn test_single_short_irregular_segment() {
    let blueprint = irregular(&[(0.0, 0.0), (0.0, 120.0)]);

    assert_eq!(blueprint.variant, WallVariant::Irregular);
    assert_eq!(blueprint.narrow_indices, vec![0]);
    assert_eq!(blueprint.wide_indices, vec![1, 2]);
    assert!(blueprint.transversal_indices.is_empty());
    assert_eq!(blueprint.skipped_splitters, 0);

    // Two A modules and one B module: the B cut-outs land in the narrow part.
    let b_holes = blueprint.holes(0).len() - 4;
    assert_eq!(b_holes, 3);

    assert_eq!(
        blueprint.part_sources[2],
        PartSource::Wide {
            segment: 0,
            side: Side::Left,
            sheet_offset: 70.0
        }
    );
    assert_indices_contiguous(&blueprint);
}

#[test]
fn test_straight_wall_splits_at_fourth_a_module() {
    let blueprint = straight(400.0);

    assert_eq!(blueprint.narrow_indices, vec![0, 1]);
    assert_eq!(blueprint.wide_indices, vec![2, 3, 4, 5]);
    assert_eq!(blueprint.transversal_indices, (6..12).collect::<Vec<_>>());
    assert_eq!(blueprint.skipped_splitters, 0);

    // The split sits at y = 230 along the guide; the lower part keeps the
    // 6 unit dovetail tooth.
    let first = blueprint.contour(0).unwrap().bounding_box();
    let second = blueprint.contour(1).unwrap().bounding_box();
    let (low, high) = if first.min.y < second.min.y {
        (first, second)
    } else {
        (second, first)
    };
    assert!((low.max.y - 236.0).abs() < 1e-6);
    assert!((high.min.y - 230.0).abs() < 1e-6);
    assert!(low.min.y.abs() < 1e-9);
    assert!((high.max.y - 400.0).abs() < 1e-9);

    assert_indices_contiguous(&blueprint);
}

#[test]
fn test_narrow_parts_preserve_panel_area() {
    let blueprint = straight(400.0);
    let geometry = GuideLineGeometry::compute(&GuideLine::straight(400.0).unwrap()).unwrap();
    let plan = narrow_panel(
        &StandardTemplates,
        &geometry,
        &blueprint.parameters,
        WallVariant::Straight,
    )
    .unwrap();

    let parts: f64 = blueprint
        .narrow_indices
        .iter()
        .map(|&i| blueprint.contour(i).unwrap().area())
        .sum();
    assert!((parts - plan.contour.area()).abs() < 1e-6);

    let holes: usize = blueprint
        .narrow_indices
        .iter()
        .map(|&i| blueprint.holes(i).len())
        .sum();
    assert_eq!(holes, plan.holes.len());
}

fn assert_holes_inside_parts(blueprint: &Blueprint) {
    for index in 0..blueprint.part_count() {
        let contour = blueprint.contour(index).unwrap();
        for hole in blueprint.holes(index) {
            let start = hole.start().unwrap();
            assert_eq!(
                contains_point(contour, &start, INTERSECTION_TOLERANCE),
                Containment::Inside,
                "hole of part {} escapes its contour",
                index
            );
        }
    }
}

#[test]
fn test_holes_lie_inside_their_part() {
    assert_holes_inside_parts(&straight(400.0));
}

#[test]
fn test_generation_is_repeatable() {
    let maker = BlueprintMaker::new(
        WallInput::Straight { length: 730.0 },
        BlueprintParameters::default(),
    );
    assert_eq!(maker.generate().unwrap(), maker.generate().unwrap());
}

#[test]
fn test_l_shaped_irregular_wall() {
    let blueprint = irregular(&[(0.0, 0.0), (0.0, 400.0), (300.0, 400.0)]);

    assert!(!blueprint.narrow_indices.is_empty());
    assert!(blueprint.wide_indices.len() >= 4);
    assert!(blueprint.transversal_indices.is_empty());
    assert_eq!(blueprint.guide.segment_count(), 2);

    let sides: Vec<Side> = blueprint
        .wide_indices
        .iter()
        .filter_map(|&i| match blueprint.part_sources[i] {
            PartSource::Wide { side, .. } => Some(side),
            _ => None,
        })
        .collect();
    // All right-hand panels come before the left-hand ones.
    let first_left = sides.iter().position(|&s| s == Side::Left).unwrap();
    assert!(sides[..first_left].iter().all(|&s| s == Side::Right));
    assert!(sides[first_left..].iter().all(|&s| s == Side::Left));

    assert_eq!(blueprint.skipped_splitters, 0);
    assert_holes_inside_parts(&blueprint);
    assert_indices_contiguous(&blueprint);
}

#[test]
fn test_turning_guides_keep_holes_in_their_parts() {
    let guides: [&[(f64, f64)]; 3] = [
        // Turning left.
        &[(0.0, 0.0), (0.0, 400.0), (-300.0, 400.0)],
        // Turning right.
        &[(0.0, 0.0), (0.0, 400.0), (300.0, 400.0)],
        &[(0.0, 0.0), (0.0, 400.0), (300.0, 400.0), (300.0, 150.0)],
    ];
    for points in guides {
        let blueprint = irregular(points);
        assert_eq!(blueprint.skipped_splitters, 0, "guide {:?}", points);
        assert_holes_inside_parts(&blueprint);
        assert_indices_contiguous(&blueprint);
    }
}

#[test]
fn test_short_leg_next_to_corner_stays_whole() {
    // The first leg's axis is 130 long with a corner at its end only; no
    // A module is far enough from both ends to carry a splitter.
    let blueprint = irregular(&[(0.0, 0.0), (144.3, 0.0), (144.3, 400.0)]);
    let geometry = &blueprint.guide;
    let first_leg_end = geometry.symmetry_axes[0].end;
    for &index in &blueprint.narrow_indices {
        let bb = blueprint.contour(index).unwrap().bounding_box();
        // A split on the first leg would leave a part ending short of the corner.
        assert!(
            bb.max.x >= first_leg_end.x - 1e-6,
            "part {} stops at x = {}",
            index,
            bb.max.x
        );
    }
    assert_holes_inside_parts(&blueprint);
    assert_indices_contiguous(&blueprint);
}

#[test]
fn test_irregular_guide_rejects_reversal() {
    let points = [
        Point2::new(0.0, 0.0),
        Point2::new(0.0, 200.0),
        Point2::new(0.0, 100.0),
    ];
    assert!(GuideLine::from_points(&points).is_err());
}
