//! WallKit command-line tool

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use wallkit::{
    init_logging, plan_with_summary, save_dxf, save_json, Blueprint, PartSolid, WallConfig,
};

#[derive(Parser)]
#[command(name = "wallkit")]
#[command(about = "Cutting plans for modular connector walls")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the cutting plan for a wall configuration
    Plan {
        /// Wall configuration file (.toml or .json)
        config: PathBuf,

        /// Write the blueprint as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write the cuts as DXF
        #[arg(long)]
        dxf: Option<PathBuf>,

        /// Print per-part area, volume and placement
        #[arg(long)]
        solids: bool,
    },

    /// Write a default wall configuration
    Init {
        /// Destination file (.toml or .json); defaults to the user config directory
        path: Option<PathBuf>,

        /// Start from a straight wall instead of an L-shaped guide
        #[arg(long)]
        straight: bool,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Plan {
            config,
            json,
            dxf,
            solids,
        } => run_plan(&config, json.as_deref(), dxf.as_deref(), solids),
        Commands::Init { path, straight } => run_init(path, straight),
    }
}

fn run_plan(
    config_path: &Path,
    json: Option<&Path>,
    dxf: Option<&Path>,
    show_solids: bool,
) -> anyhow::Result<()> {
    let config = WallConfig::load_from_file(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let (blueprint, solids, summary) = plan_with_summary(&config)?;
    println!("{}", summary);

    if let Some(path) = json {
        save_json(&blueprint, path, config.export.pretty_json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    if let Some(path) = dxf {
        save_dxf(&blueprint, &config.export.layers(), path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    if show_solids {
        print_solids(&blueprint, &solids);
    }

    Ok(())
}

fn print_solids(blueprint: &Blueprint, solids: &[PartSolid]) {
    println!();
    println!("{:>5}  {:<12} {:>10} {:>10}  placements", "part", "kind", "area", "volume");
    for solid in solids {
        let origins: Vec<String> = solid
            .placements
            .iter()
            .map(|f| format!("({:.1}, {:.1}, {:.1})", f.origin.x, f.origin.y, f.origin.z))
            .collect();
        println!(
            "{:>5}  {:<12} {:>10.1} {:>10.1}  {}",
            solid.index,
            format!("{:?}", solid.kind),
            solid.net_area,
            solid.volume,
            origins.join(" ")
        );
    }
    if blueprint.skipped_splitters > 0 {
        tracing::warn!(
            "{} splitters missed their panel; some parts may exceed the part length",
            blueprint.skipped_splitters
        );
    }
}

fn run_init(path: Option<PathBuf>, straight: bool) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path,
        None => wallkit::default_config_path()?,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let config = if straight {
        WallConfig::straight(400.0)
    } else {
        WallConfig::new()
    };
    config
        .save_to_file(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
