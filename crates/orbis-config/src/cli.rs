//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orbis command-line arguments.
///
/// CLI values override settings loaded from `planet.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orbis", about = "Procedural planet generator")]
pub struct CliArgs {
    /// Planet seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Chunks per cube-face edge.
    #[arg(long)]
    pub chunk_resolution: Option<u32>,

    /// Planet radius in world units.
    #[arg(long)]
    pub radius: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.planet.seed = seed;
        }
        if let Some(cr) = args.chunk_resolution {
            self.planet.chunk_resolution = cr;
        }
        if let Some(radius) = args.radius {
            self.planet.radius = radius;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
