// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Brushforge CLI - bbox + cached GeoJSON -> .map (Valve 220)

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use brushforge::io::import_geojson_file;
use brushforge::map::{empty_map_string, map_to_string};
use brushforge::{generate, BoundingBox, MapConfig};

#[derive(Parser)]
#[command(name = "brushforge")]
#[command(about = "Brushforge - building footprints to Valve 220 brush maps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a .map from cached GeoJSON footprints
    Generate {
        /// Bounding box <minLon,minLat,maxLon,maxLat> in EPSG:4326
        #[arg(long)]
        bbox: String,

        /// Output .map file path
        #[arg(long)]
        out: PathBuf,

        /// Input GeoJSON file (cached FeatureCollection)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Semicolon-separated WAD list for the editor
        #[arg(long)]
        wad: Option<String>,

        /// Config file (TOML); defaults to brushforge.toml when present
        #[arg(long)]
        config: Option<PathBuf>,

        /// Meters to engine units scale
        #[arg(long)]
        scale: Option<f64>,

        /// Simplification tolerance (meters)
        #[arg(long)]
        simplify: Option<f64>,

        /// Minimum building area (m^2)
        #[arg(long)]
        min_area: Option<f64>,

        /// Default building height (m)
        #[arg(long)]
        default_height: Option<f64>,

        /// Snapping grid size (engine units)
        #[arg(long)]
        grid: Option<f64>,

        /// Wall texture path
        #[arg(long)]
        wall_texture: Option<String>,

        /// Roof texture path
        #[arg(long)]
        roof_texture: Option<String>,

        /// Write the validation report as JSON next to the map
        #[arg(long)]
        report: Option<PathBuf>,

        /// Promote validation warnings to a failure
        #[arg(long)]
        strict: bool,

        /// Generate an empty worldspawn-only map instead of solids
        #[arg(long)]
        stub: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            bbox,
            out,
            input,
            wad,
            config,
            scale,
            simplify,
            min_area,
            default_height,
            grid,
            wall_texture,
            roof_texture,
            report,
            strict,
            stub,
        } => generate_command(GenerateArgs {
            bbox,
            out,
            input,
            wad,
            config,
            scale,
            simplify,
            min_area,
            default_height,
            grid,
            wall_texture,
            roof_texture,
            report,
            strict,
            stub,
        }),
        Commands::Version => {
            println!("brushforge v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

struct GenerateArgs {
    bbox: String,
    out: PathBuf,
    input: Option<PathBuf>,
    wad: Option<String>,
    config: Option<PathBuf>,
    scale: Option<f64>,
    simplify: Option<f64>,
    min_area: Option<f64>,
    default_height: Option<f64>,
    grid: Option<f64>,
    wall_texture: Option<String>,
    roof_texture: Option<String>,
    report: Option<PathBuf>,
    strict: bool,
    stub: bool,
}

fn generate_command(args: GenerateArgs) -> Result<()> {
    let bounds = BoundingBox::parse(&args.bbox)?;
    let config = build_config(&args)?;

    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {parent:?}"))?;
        }
    }

    if args.stub {
        std::fs::write(&args.out, empty_map_string(&config.textures.wads))
            .with_context(|| format!("Failed to write {:?}", args.out))?;
        println!("{} -> {:?}", ".map created (stub)".green(), args.out);
        return Ok(());
    }

    let Some(input) = &args.input else {
        bail!("provide --input <geojson> or use --stub");
    };
    let footprints = import_geojson_file(&input.to_string_lossy())?;
    println!("Loaded {} footprint(s) from {:?}", footprints.len(), input);

    let output = generate(&footprints, &bounds, &config)?;

    std::fs::write(&args.out, map_to_string(&output.document))
        .with_context(|| format!("Failed to write {:?}", args.out))?;

    let counts = output.report.counts;
    println!(
        "{} -> {:?} ({} solids, {} faces)",
        ".map created".green(),
        args.out,
        counts.brushes_emitted,
        counts.faces_emitted
    );
    println!(
        "Buildings: {} processed, {} skipped",
        counts.buildings_processed, counts.buildings_skipped
    );
    if !output.report.warnings.is_empty() {
        println!(
            "{}",
            format!("{} warning(s):", output.report.warnings.len()).yellow()
        );
        for warning in &output.report.warnings {
            println!("  {warning}");
        }
    }

    if let Some(report_path) = &args.report {
        write_report(&output.report, report_path)?;
        println!("Report -> {report_path:?}");
    }

    Ok(())
}

fn build_config(args: &GenerateArgs) -> Result<MapConfig> {
    let mut config = match &args.config {
        Some(path) => MapConfig::from_file(path)?,
        None => MapConfig::load()?,
    };

    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    if let Some(simplify) = args.simplify {
        config.simplify_tolerance = simplify;
    }
    if let Some(min_area) = args.min_area {
        config.min_area = min_area;
    }
    if let Some(height) = args.default_height {
        config.default_height = height;
    }
    if let Some(grid) = args.grid {
        config.grid_size = grid;
    }
    if let Some(wall) = &args.wall_texture {
        config.textures.wall = wall.clone();
    }
    if let Some(roof) = &args.roof_texture {
        config.textures.roof = roof.clone();
    }
    if let Some(wad) = &args.wad {
        config.textures.wads = wad
            .split(';')
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
    }
    config.strict_validation |= args.strict;
    Ok(config)
}

fn write_report(report: &brushforge::ValidationReport, path: &Path) -> Result<()> {
    let json = report.to_json().context("Failed to serialize report")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write report {path:?}"))?;
    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let default = if verbose {
        "brushforge=debug"
    } else {
        "brushforge=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
