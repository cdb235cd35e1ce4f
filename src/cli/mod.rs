//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod init;
mod render;
mod stats;

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides};
use crate::field::FieldSettings;
use crate::models::{DimensionsError, Point, SurfaceDimensions};
use crate::simulate::{parse_events, SimEvent, Simulation};

/// Largest accepted surface side, in pixels
pub(crate) const MAX_SURFACE_SIDE: u32 = 16_384;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Particle field - preview the backdrop offline
#[derive(Parser)]
#[command(name = "pfx")]
#[command(about = "Particle field - simulate the drifting-points backdrop and render it to PNG/GIF")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate the field and render the last frame (PNG) or every frame (GIF)
    Render {
        #[command(flatten)]
        field: FieldArgs,

        /// Output file; a .gif extension renders an animation.
        /// If omitted: particles.png (or particles.gif with --gif)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render an animated GIF even when --output is not given
        #[arg(long)]
        gif: bool,

        /// Background color (hex or CSS)
        #[arg(long, default_value = "#0b0b12")]
        background: String,
    },

    /// Simulate the field and print per-frame statistics as JSON lines
    Stats {
        #[command(flatten)]
        field: FieldArgs,

        /// Only print the last frame
        #[arg(long)]
        summary: bool,
    },

    /// Write a particles.toml with the stock settings
    Init {
        /// Directory to write into (default: current directory)
        path: Option<PathBuf>,

        /// Overwrite an existing particles.toml
        #[arg(long)]
        force: bool,
    },
}

/// Simulation flags shared by `render` and `stats`.
#[derive(Args, Debug, Clone)]
pub struct FieldArgs {
    /// Surface width in pixels
    #[arg(long, default_value = "800", value_parser = clap::value_parser!(u32).range(1..=MAX_SURFACE_SIDE as i64))]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, default_value = "600", value_parser = clap::value_parser!(u32).range(1..=MAX_SURFACE_SIDE as i64))]
    pub height: u32,

    /// Surface size as WxH (e.g., "1280x800"), instead of --width/--height
    #[arg(long, value_parser = parse_size, conflicts_with_all = ["width", "height"])]
    pub size: Option<SurfaceDimensions>,

    /// Number of frames to simulate
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..=10_000))]
    pub frames: u64,

    /// RNG seed; the same seed reproduces the same run
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Pointer position as X,Y, delivered before the first frame
    #[arg(long)]
    pub pointer: Option<String>,

    /// JSON event script: [{"at_ms": 0, "type": "pointer_move", "x": 1, "y": 2}, ...]
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Path to particles.toml (default: search from the current directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the particle count
    #[arg(long)]
    pub count: Option<usize>,

    /// Override the particle-to-particle link distance
    #[arg(long)]
    pub edge_threshold: Option<f64>,

    /// Override the particle-to-pointer link distance
    #[arg(long)]
    pub pointer_threshold: Option<f64>,
}

impl FieldArgs {
    /// Requested surface size, from --size or --width/--height.
    pub fn dimensions(&self) -> SurfaceDimensions {
        self.size.unwrap_or(SurfaceDimensions::new(self.width, self.height))
    }

    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            count: self.count,
            edge_threshold: self.edge_threshold,
            pointer_threshold: self.pointer_threshold,
            debounce_ms: None,
        }
    }
}

/// Parse and bound-check a `WxH` surface size.
fn parse_size(s: &str) -> Result<SurfaceDimensions, String> {
    let dims: SurfaceDimensions = s.parse().map_err(|e: DimensionsError| e.to_string())?;
    let in_range = |side: u32| (1..=MAX_SURFACE_SIDE).contains(&side);
    if !in_range(dims.width) || !in_range(dims.height) {
        return Err(format!("each side must be between 1 and {}", MAX_SURFACE_SIDE));
    }
    Ok(dims)
}

/// Parse a `X,Y` pointer position.
pub(crate) fn parse_pointer(s: &str) -> Option<Point> {
    let (x, y) = s.split_once(',')?;
    let x: f64 = x.trim().parse().ok()?;
    let y: f64 = y.trim().parse().ok()?;
    (x.is_finite() && y.is_finite()).then_some(Point::new(x, y))
}

/// Load config, apply overrides and build a ready-to-run simulation.
///
/// Errors are reported to stderr; the returned code is the one to exit with.
pub(crate) fn prepare(args: &FieldArgs) -> Result<Simulation, ExitCode> {
    let dims = args.dimensions();

    let pointer = match args.pointer.as_deref() {
        Some(s) => match parse_pointer(s) {
            Some(p) => Some(p),
            None => {
                eprintln!("Error: Invalid pointer '{}'. Use X,Y format (e.g., '400,300')", s);
                return Err(ExitCode::from(EXIT_INVALID_ARGS));
            }
        },
        None => None,
    };

    let events = match args.events.as_deref() {
        Some(path) => match fs::read_to_string(path) {
            Ok(json) => match parse_events(&json) {
                Ok(events) => events,
                Err(e) => {
                    eprintln!("Error: Invalid event script {}: {}", path.display(), e);
                    return Err(ExitCode::from(EXIT_ERROR));
                }
            },
            Err(e) => {
                eprintln!("Error: Failed to read {}: {}", path.display(), e);
                return Err(ExitCode::from(EXIT_ERROR));
            }
        },
        None => Vec::new(),
    };

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    let config = match merge_cli_overrides(config, &args.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }
    };
    let settings: FieldSettings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };

    let mut sim = Simulation::new(settings, dims, args.seed, config.resize.debounce_ms);
    if let Some(p) = pointer {
        if p.x < 0.0 || p.y < 0.0 || p.x > dims.width as f64 || p.y > dims.height as f64 {
            log::warn!("Pointer {},{} lies outside the {} surface", p.x, p.y, dims);
        }
        sim.schedule(0.0, SimEvent::PointerMove { x: p.x, y: p.y });
    }
    for timed in events {
        sim.schedule(timed.at_ms, timed.event);
    }

    Ok(sim)
}

/// Entry point for the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render { field, output, gif, background } => {
            render::run_render(&field, output.as_deref(), gif, &background)
        }
        Commands::Stats { field, summary } => stats::run_stats(&field, summary),
        Commands::Init { path, force } => {
            init::run_init(path.as_deref().unwrap_or(Path::new(".")), force)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
