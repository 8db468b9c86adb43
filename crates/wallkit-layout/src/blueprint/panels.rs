//! Panel synthesis: turns guide geometry and module layouts into one closed
//! contour per panel plus its splitters, holes and mill paths.

use wallkit_core::{
    join_closed, offset, CornerStyle, Curve, Frame2, Point2, INTERSECTION_TOLERANCE,
};

use super::types::{BlueprintParameters, PartSource, Side, WallVariant};
use crate::error::LayoutResult;
use crate::guide_lines::GuideLineGeometry;
use crate::module_layout::{ModuleKind, ModuleLayout, SplitPolicy};
use crate::templates::{ShapeTemplates, EDGE_HOLE_INSET, NARROW_HALF_WIDTH};

/// Across spacing of wide panels on the cutting sheet.
pub const WIDE_SHEET_PITCH: f64 = 70.0;
/// Distance of the end mills from the panel ends.
pub const END_MILL_INSET: f64 = 6.0;
/// Offset of the mills from an A module centre.
pub const A_MILL_OFFSET: f64 = 15.0;
/// Offset of the mills from a B module centre.
pub const B_MILL_OFFSET: f64 = 5.0;
/// Along spacing of transversal braces.
pub const TRANSVERSAL_PITCH: f64 = 60.0;
/// Across position of transversal braces on the cutting sheet.
pub const TRANSVERSAL_SHEET_X: f64 = -60.0;

/// Everything needed to split one panel into parts.
#[derive(Debug, Clone)]
pub struct PanelPlan {
    pub source: PartSource,
    pub contour: Curve,
    pub splitters: Vec<Curve>,
    pub holes: Vec<Curve>,
    pub mills: Vec<Curve>,
}

/// Frame translated `along` units down the local y axis.
fn slide(frame: &Frame2, along: f64) -> Frame2 {
    frame.at(frame.map(0.0, along))
}

fn place(curve: &Curve, frame: &Frame2, along: f64) -> Curve {
    curve.map_frame(&slide(frame, along))
}

/// The narrow panel running along the whole guide, in plan view.
pub fn narrow_panel<T: ShapeTemplates + ?Sized>(
    templates: &T,
    geometry: &GuideLineGeometry,
    params: &BlueprintParameters,
    variant: WallVariant,
) -> LayoutResult<PanelPlan> {
    let t = params.thickness;
    let n = geometry.segment_count();
    let last = n - 1;

    let side_a = templates.narrow_side_a(t);
    let side_b = templates.narrow_side_b();
    let edge_hole = templates.narrow_edge_hole(t);
    let splitter = templates.narrow_splitter();

    let mut pieces = Vec::new();
    let mut splitters = Vec::new();
    let mut holes = Vec::new();

    for i in 0..n {
        let segment = &geometry.segments[i];
        let axis_length = geometry.symmetry_axes[i].length();
        let layout = ModuleLayout::solve(axis_length);
        let lead = layout.leading_offset();
        let axis_frame = geometry.axis_frame(i);
        let segment_frame = geometry.segment_frame(i);

        for module in layout.placements() {
            match module.kind {
                ModuleKind::A => {
                    pieces.push(place(&side_a, &axis_frame, module.center));
                    pieces.push(place(&side_a.mirrored_x(), &axis_frame, module.center));
                }
                ModuleKind::B => {
                    pieces.push(place(&side_b, &axis_frame, module.center));
                    pieces.push(place(&side_b.mirrored_x(), &axis_frame, module.center));
                    holes.extend(
                        templates
                            .narrow_holes_b(t)
                            .iter()
                            .map(|hole| place(hole, &axis_frame, module.center)),
                    );
                }
            }
        }

        let policy = match variant {
            WallVariant::Straight => SplitPolicy::Periodic {
                max_part_length: params.max_part_length,
            },
            WallVariant::Irregular => SplitPolicy::CornerLimited {
                max_straight_length: params.max_part_length,
                max_corner_length: params.max_corner_length,
                offset_at_start: geometry.offsets_at_start[i],
                offset_at_end: geometry.offsets_at_end[i],
            },
        };
        splitters.extend(
            layout
                .split_indices(&policy)
                .into_iter()
                .map(|k| place(&splitter, &axis_frame, layout.center_a(k))),
        );

        // Start of the segment: cap or the two edges coming out of the corner.
        let right_start = geometry.right_corner(i);
        let left_start = geometry.left_corner(i);
        if i == 0 {
            let reach = geometry.offsets_at_start[i] + lead;
            pieces.push(templates.narrow_end_cap(t, reach).map_frame(&segment_frame));
        } else {
            pieces.push(Curve::line(right_start, axis_frame.map(NARROW_HALF_WIDTH, lead)));
            pieces.push(Curve::line(left_start, axis_frame.map(-NARROW_HALF_WIDTH, lead)));
        }

        let right_end = geometry.right_corner(i + 1);
        let left_end = geometry.left_corner(i + 1);
        if i == last {
            let reach = geometry.offsets_at_end[i] + lead;
            let end_frame = Frame2::new(segment.end, geometry.rotations[i]).turned();
            pieces.push(templates.narrow_end_cap(t, reach).map_frame(&end_frame));
        } else {
            let far = axis_length - lead;
            pieces.push(Curve::line(right_end, axis_frame.map(NARROW_HALF_WIDTH, far)));
            pieces.push(Curve::line(left_end, axis_frame.map(-NARROW_HALF_WIDTH, far)));
        }

        // Slots just behind every corner of the segment, on both edges.
        let along = |corner: &Point2<f64>| segment_frame.local(corner).y;
        holes.push(place(&edge_hole, &segment_frame, along(&right_start) + EDGE_HOLE_INSET));
        holes.push(place(
            &edge_hole.mirrored_x(),
            &segment_frame,
            along(&left_start) + EDGE_HOLE_INSET,
        ));
        holes.push(place(&edge_hole, &segment_frame, along(&right_end) - EDGE_HOLE_INSET));
        holes.push(place(
            &edge_hole.mirrored_x(),
            &segment_frame,
            along(&left_end) - EDGE_HOLE_INSET,
        ));
    }

    let contour = join_closed(&pieces, INTERSECTION_TOLERANCE)?;
    Ok(PanelPlan {
        source: PartSource::Narrow,
        contour,
        splitters,
        holes,
        mills: Vec::new(),
    })
}

/// One flattened side panel for guide segment `segment` on `side`.
///
/// Wide panels are laid out on the cutting sheet, not in plan view: each
/// one runs up the sheet from y = 0, offset across by its sheet slot.
pub fn wide_panel<T: ShapeTemplates + ?Sized>(
    templates: &T,
    geometry: &GuideLineGeometry,
    params: &BlueprintParameters,
    segment: usize,
    side: Side,
) -> LayoutResult<PanelPlan> {
    let t = params.thickness;
    let n = geometry.segment_count();
    let slot = match side {
        Side::Right => segment,
        Side::Left => n + segment,
    };
    let sheet_offset = WIDE_SHEET_PITCH * slot as f64;

    let (line_start, line_end) = match side {
        Side::Right => (geometry.right_corner(segment), geometry.right_corner(segment + 1)),
        Side::Left => (geometry.left_corner(segment), geometry.left_corner(segment + 1)),
    };
    let length = (line_end - line_start).norm();
    let direction = geometry.segments[segment].direction();
    let axis = &geometry.symmetry_axes[segment];
    let axis_length = axis.length();

    let start_offset = (line_start - axis.start).dot(&direction).abs();
    let end_offset = (length - start_offset - axis_length).max(0.0);

    let layout = ModuleLayout::solve(axis_length);
    let lead = layout.leading_offset();

    let sheet = Frame2::world().at(Point2::new(sheet_offset, 0.0));
    let top = Frame2::world().at(Point2::new(sheet_offset, length)).turned();

    let side_a = templates.wide_side_a(t);
    let side_b = templates.wide_side_b(t);
    let mill = templates.wide_mill();

    let mut pieces = vec![
        templates.wide_end_cap(t, start_offset + lead).map_frame(&sheet),
        templates.wide_end_cap(t, end_offset + lead).map_frame(&top),
    ];
    let mut holes = Vec::new();
    let mut mills = vec![
        place(&mill, &sheet, END_MILL_INSET),
        place(&mill, &sheet, length - END_MILL_INSET),
    ];

    for module in layout.placements() {
        let y = start_offset + module.center;
        match module.kind {
            ModuleKind::A => {
                pieces.push(place(&side_a, &sheet, y));
                pieces.push(place(&side_a.mirrored_x(), &sheet, y));
                mills.push(place(&mill, &sheet, y - A_MILL_OFFSET));
                mills.push(place(&mill, &sheet, y + A_MILL_OFFSET));
            }
            ModuleKind::B => {
                pieces.push(place(&side_b, &sheet, y));
                pieces.push(place(&side_b.mirrored_x(), &sheet, y));
                holes.extend(
                    templates
                        .wide_holes_b(t)
                        .iter()
                        .map(|hole| place(hole, &sheet, y)),
                );
                mills.push(place(&mill, &sheet, y - B_MILL_OFFSET));
                mills.push(place(&mill, &sheet, y + B_MILL_OFFSET));
            }
        }
    }

    let policy = SplitPolicy::Periodic {
        max_part_length: params.max_part_length,
    };
    let splitter = templates.wide_splitter();
    let splitters = layout
        .split_indices(&policy)
        .into_iter()
        .map(|k| place(&splitter, &sheet, start_offset + layout.center_a(k)))
        .collect();

    let contour = join_closed(&pieces, INTERSECTION_TOLERANCE)?;
    Ok(PanelPlan {
        source: PartSource::Wide {
            segment,
            side,
            sheet_offset,
        },
        contour,
        splitters,
        holes,
        mills: widen_mills(mills, params)?,
    })
}

/// Replaces each mill with a pair of passes when the tool is narrower than the groove.
fn widen_mills(mills: Vec<Curve>, params: &BlueprintParameters) -> LayoutResult<Vec<Curve>> {
    let tool = params.milling_diameter;
    if tool <= 0.0 || tool >= params.thickness {
        return Ok(mills);
    }
    let shift = (params.thickness - tool) * 0.5;
    let mut passes = Vec::with_capacity(mills.len() * 2);
    for mill in &mills {
        passes.extend(offset(mill, shift, CornerStyle::Round)?);
        passes.extend(offset(mill, -shift, CornerStyle::Round)?);
    }
    Ok(passes)
}

/// Number of transversal braces along a straight wall of `length`.
pub fn transversal_count(length: f64) -> usize {
    ((length - 40.0) / TRANSVERSAL_PITCH).floor().max(0.0) as usize
}

/// Brace `slot` of a straight wall, on the cutting sheet.
pub fn transversal_panel<T: ShapeTemplates + ?Sized>(templates: &T, slot: usize) -> PanelPlan {
    let mut contour = templates.transversal_contour();
    contour.translate(transversal_position(slot).coords);
    PanelPlan {
        source: PartSource::Transversal { slot },
        contour,
        splitters: Vec::new(),
        holes: Vec::new(),
        mills: Vec::new(),
    }
}

/// Sheet position of the centre of brace `slot`.
pub fn transversal_position(slot: usize) -> Point2<f64> {
    Point2::new(
        TRANSVERSAL_SHEET_X,
        TRANSVERSAL_PITCH + TRANSVERSAL_PITCH * slot as f64,
    )
}
