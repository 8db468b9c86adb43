//! Blueprint assembly.
//!
//! Runs the whole pipeline for one wall: guide geometry, module layout per
//! segment, panel synthesis and splitting. Part indices are assigned
//! narrow panel first, then the wide panels (right side segments, then left
//! side segments), then the transversal braces.

pub mod panels;
mod types;

pub use types::{
    Blueprint, BlueprintParameters, ParameterLimits, PartKind, PartSource, Side, WallInput,
    WallVariant, MIN_STRAIGHT_LENGTH,
};

use std::collections::BTreeMap;

use tracing::{debug, info};

use self::panels::{narrow_panel, transversal_count, transversal_panel, wide_panel, PanelPlan};
use crate::error::LayoutResult;
use crate::guide_lines::{GuideLine, GuideLineGeometry};
use crate::part_splitter::{Part, PartSplitter};
use crate::templates::{ShapeTemplates, StandardTemplates};

/// Builds a [`Blueprint`] from a wall description.
#[derive(Debug, Clone)]
pub struct BlueprintMaker<T: ShapeTemplates = StandardTemplates> {
    input: WallInput,
    params: BlueprintParameters,
    templates: T,
}

impl BlueprintMaker<StandardTemplates> {
    pub fn new(input: WallInput, params: BlueprintParameters) -> Self {
        Self {
            input,
            params,
            templates: StandardTemplates,
        }
    }
}

impl<T: ShapeTemplates> BlueprintMaker<T> {
    /// Swaps the connector geometry.
    pub fn with_templates<U: ShapeTemplates>(self, templates: U) -> BlueprintMaker<U> {
        BlueprintMaker {
            input: self.input,
            params: self.params,
            templates,
        }
    }

    pub fn input(&self) -> &WallInput {
        &self.input
    }

    /// Parameters as they will be used, after clamping.
    pub fn parameters(&self) -> BlueprintParameters {
        self.params.clamped(self.input.variant())
    }

    fn guide(&self) -> LayoutResult<GuideLine> {
        match &self.input {
            WallInput::Straight { length } => {
                let clamped = if length.is_nan() {
                    MIN_STRAIGHT_LENGTH
                } else {
                    length.max(MIN_STRAIGHT_LENGTH)
                };
                if clamped != *length {
                    tracing::warn!("Clamped wall length from {} to {}", length, clamped);
                }
                Ok(GuideLine::straight(clamped)?)
            }
            WallInput::Irregular { guide } => Ok(guide.clone()),
        }
    }

    /// Runs the layout pipeline.
    ///
    /// Any geometric failure aborts the whole run; no partial blueprint is
    /// returned.
    pub fn generate(&self) -> LayoutResult<Blueprint> {
        let variant = self.input.variant();
        let params = self.parameters();
        let guide = self.guide()?;
        let geometry = GuideLineGeometry::compute(&guide)?;
        let segments = geometry.segment_count();

        debug!(?variant, segments, ?params, "generating blueprint");

        let mut plans: Vec<PanelPlan> = Vec::with_capacity(2 * segments + 1);
        plans.push(narrow_panel(&self.templates, &geometry, &params, variant)?);
        for side in [Side::Right, Side::Left] {
            for segment in 0..segments {
                plans.push(wide_panel(
                    &self.templates,
                    &geometry,
                    &params,
                    segment,
                    side,
                )?);
            }
        }
        if variant == WallVariant::Straight {
            let count = transversal_count(guide.total_length());
            plans.extend((0..count).map(|slot| transversal_panel(&self.templates, slot)));
        }

        let mut blueprint = Blueprint {
            variant,
            parameters: params,
            outside_cuts: BTreeMap::new(),
            inside_cuts: BTreeMap::new(),
            half_mills: BTreeMap::new(),
            narrow_indices: Vec::new(),
            wide_indices: Vec::new(),
            transversal_indices: Vec::new(),
            part_sources: Vec::new(),
            guide: geometry,
            skipped_splitters: 0,
        };

        let splitter = PartSplitter::new(params.containment);
        for plan in plans {
            let outcome = splitter.split(
                &plan.contour,
                &plan.splitters,
                plan.holes,
                plan.mills,
                blueprint.part_count(),
            )?;
            blueprint.skipped_splitters += outcome.skipped_splitters;
            for part in outcome.parts {
                record(&mut blueprint, part, plan.source);
            }
        }

        info!(
            "Generated {:?} wall blueprint: {} parts ({} narrow, {} wide, {} transversal)",
            variant,
            blueprint.part_count(),
            blueprint.narrow_indices.len(),
            blueprint.wide_indices.len(),
            blueprint.transversal_indices.len()
        );

        Ok(blueprint)
    }
}

fn record(blueprint: &mut Blueprint, part: Part, source: PartSource) {
    let index = part.index;
    debug_assert_eq!(index, blueprint.part_sources.len());

    blueprint.outside_cuts.insert(index, vec![part.contour]);
    blueprint.inside_cuts.insert(index, part.holes);
    blueprint.half_mills.insert(index, part.mills);
    match source.kind() {
        PartKind::Narrow => blueprint.narrow_indices.push(index),
        PartKind::Wide => blueprint.wide_indices.push(index),
        PartKind::Transversal => blueprint.transversal_indices.push(index),
    }
    blueprint.part_sources.push(source);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_straight_wall_is_clamped() {
        let maker = BlueprintMaker::new(
            WallInput::Straight { length: 10.0 },
            BlueprintParameters::default(),
        );
        let blueprint = maker.generate().unwrap();
        assert_eq!(blueprint.guide.segments[0].length(), MIN_STRAIGHT_LENGTH);
        assert_eq!(blueprint.narrow_indices.len(), 1);
    }

    #[test]
    fn test_indices_are_contiguous() {
        let maker = BlueprintMaker::new(
            WallInput::Straight { length: 400.0 },
            BlueprintParameters::default(),
        );
        let blueprint = maker.generate().unwrap();
        let mut all: Vec<usize> = blueprint
            .narrow_indices
            .iter()
            .chain(&blueprint.wide_indices)
            .chain(&blueprint.transversal_indices)
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..blueprint.part_count()).collect::<Vec<_>>());
        assert_eq!(blueprint.outside_cuts.len(), blueprint.part_count());
        assert_eq!(blueprint.inside_cuts.len(), blueprint.part_count());
        assert_eq!(blueprint.half_mills.len(), blueprint.part_count());
    }
}
