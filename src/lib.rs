//! # WallKit
//!
//! Flat cutting plans for modular walls assembled from interlocking
//! connector modules. A wall is described by a guide polyline (or just a
//! length for a straight wall); WallKit lays out the connector modules,
//! builds the narrow, wide and transversal panels and splits them into
//! parts that fit the cutting machine.
//!
//! ## Architecture
//!
//! WallKit is organized as a workspace with multiple crates:
//!
//! 1. **wallkit-core** - Polyline curve kernel, frames, geometric errors
//! 2. **wallkit-layout** - Guide geometry, module layout, part splitting, blueprints, export
//! 3. **wallkit-settings** - Wall configuration documents (JSON/TOML)
//! 4. **wallkit** - Logging bootstrap and the `wallkit` command-line tool

use std::fmt;

use anyhow::Context;
use tracing::info;

pub use wallkit_core as kernel;
pub use wallkit_layout as layout;
pub use wallkit_settings as settings;

pub use wallkit_layout::{
    place_parts, save_dxf, save_json, Blueprint, BlueprintMaker, BlueprintParameters, DxfLayers,
    PartKind, PartSolid, WallInput, WallVariant,
};
pub use wallkit_settings::{default_config_path, WallConfig, WallSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Log lines go to stderr so plan summaries on stdout stay clean. The level
/// defaults to `info`; `RUST_LOG` overrides it.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(())
}

/// Generates the blueprint described by `config`.
pub fn plan(config: &WallConfig) -> anyhow::Result<Blueprint> {
    let input = config
        .to_wall_input()
        .context("Configuration does not describe a valid wall")?;
    let blueprint = BlueprintMaker::new(input, config.parameters)
        .generate()
        .context("Failed to lay out the wall")?;
    Ok(blueprint)
}

/// Headline numbers of a generated plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSummary {
    pub variant: WallVariant,
    pub segments: usize,
    pub narrow_parts: usize,
    pub wide_parts: usize,
    pub transversal_parts: usize,
    pub holes: usize,
    pub mills: usize,
    pub skipped_splitters: usize,
    /// Sheet area consumed by all parts, holes removed.
    pub net_area: f64,
}

impl PlanSummary {
    pub fn new(blueprint: &Blueprint, solids: &[PartSolid]) -> Self {
        Self {
            variant: blueprint.variant,
            segments: blueprint.guide.segment_count(),
            narrow_parts: blueprint.narrow_indices.len(),
            wide_parts: blueprint.wide_indices.len(),
            transversal_parts: blueprint.transversal_indices.len(),
            holes: blueprint.inside_cuts.values().map(Vec::len).sum(),
            mills: blueprint.half_mills.values().map(Vec::len).sum(),
            skipped_splitters: blueprint.skipped_splitters,
            net_area: solids.iter().map(|s| s.net_area).sum(),
        }
    }

    pub fn part_count(&self) -> usize {
        self.narrow_parts + self.wide_parts + self.transversal_parts
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self.variant {
            WallVariant::Straight => "straight",
            WallVariant::Irregular => "irregular",
        };
        writeln!(f, "Wall:        {} ({} segments)", variant, self.segments)?;
        writeln!(
            f,
            "Parts:       {} ({} narrow, {} wide, {} transversal)",
            self.part_count(),
            self.narrow_parts,
            self.wide_parts,
            self.transversal_parts
        )?;
        writeln!(f, "Holes:       {}", self.holes)?;
        writeln!(f, "Mill paths:  {}", self.mills)?;
        if self.skipped_splitters > 0 {
            writeln!(f, "Skipped:     {} splitters", self.skipped_splitters)?;
        }
        write!(f, "Sheet area:  {:.1}", self.net_area)
    }
}

/// Runs the whole pipeline and logs the summary.
pub fn plan_with_summary(
    config: &WallConfig,
) -> anyhow::Result<(Blueprint, Vec<PartSolid>, PlanSummary)> {
    let blueprint = plan(config)?;
    let solids = place_parts(&blueprint).context("Failed to place parts")?;
    let summary = PlanSummary::new(&blueprint, &solids);
    info!(
        "Planned {} parts, sheet area {:.1}",
        summary.part_count(),
        summary.net_area
    );
    Ok((blueprint, solids, summary))
}
