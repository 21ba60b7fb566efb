//! Demo binary: builds a planet from `planet.ron`, flies a viewer around it
//! and logs what each generation pass did.
//!
//! Run with `cargo run -p orbis-demo` or override settings, e.g.
//! `cargo run -p orbis-demo -- --seed 7 --chunk-resolution 3`.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use glam::{Quat, Vec3};
use orbis_config::{CliArgs, Config, default_config_dir};
use orbis_planet::{Evaluators, Planet, PlanetError, SimplePlanet};
use orbis_sphere::CubeFace;
use orbis_terrain::NoiseEvaluator;
use tracing::{error, info};

/// Viewer positions per orbit.
const FLIGHT_STEPS: u32 = 48;

/// Orbit altitude as a multiple of the radius.
const ORBIT_ALTITUDE: f32 = 1.15;

/// Resolution of the non-chunked preview planet.
const PREVIEW_RESOLUTION: u32 = 24;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    if let Err(e) = orbis_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config)) {
        eprintln!("Failed to initialise logging: {e}");
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Planet generation failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), PlanetError> {
    let evaluator = Arc::new(NoiseEvaluator::new());
    preview_simple_planet(config, &evaluator)?;

    let mut planet = Planet::new(config.planet_config(), Evaluators::shared(evaluator))?;
    let validation = planet.classifier().validation();
    if !validation.is_valid() {
        info!(
            duplicates = validation.duplicates.len(),
            "Continuing with an invalid biome configuration"
        );
    }

    let radius = config.planet.radius;
    let center = config.planet.center;
    let start = center + Vec3::Z * radius * ORBIT_ALTITUDE;
    planet.generate(start)?;

    let shading = planet.shading();
    info!(
        texture_bytes = shading.texture.as_bytes().len(),
        rows = shading.texture.height(),
        min_height = shading.height_range.min,
        max_height = shading.height_range.max,
        "Shading data ready"
    );
    for face in CubeFace::ALL {
        let points: usize = planet
            .grid()
            .iter()
            .filter(|c| c.coord().face == face)
            .map(|c| planet.placements_for(&c.coord()).len())
            .sum();
        info!(?face, points, "Vegetation placed");
    }

    fly_orbit(&mut planet, start, center)
}

fn preview_simple_planet(config: &Config, evaluator: &NoiseEvaluator) -> Result<(), PlanetError> {
    let preview = SimplePlanet::generate(
        PREVIEW_RESOLUTION,
        config.planet.seed,
        &config.terrain,
        evaluator,
    )?;
    info!(
        vertices = preview.mesh.vertex_count(),
        min_height = preview.height_range.min,
        max_height = preview.height_range.max,
        "Preview planet ready"
    );
    Ok(())
}

/// Move the viewer once around the planet, letting each LOD update run
/// across simulated frames.
fn fly_orbit(planet: &mut Planet, start: Vec3, center: Vec3) -> Result<(), PlanetError> {
    let mut updates = 0;
    let mut frames_waited = 0;
    for step in 1..=FLIGHT_STEPS {
        let angle = step as f32 / FLIGHT_STEPS as f32 * std::f32::consts::TAU;
        let viewer = center + Quat::from_rotation_y(angle) * (start - center);

        let Some(pending) = planet.update_viewer(viewer)? else {
            continue;
        };
        while !pending.is_ready() {
            frames_waited += 1;
            std::thread::yield_now();
        }
        let stats = planet.finish_lod_update(pending)?;
        updates += 1;
        info!(
            step,
            regenerated = stats.regenerated,
            reused = stats.reused,
            deferred = stats.deferred,
            elapsed_ms = stats.elapsed_ms,
            "LOD update"
        );
    }

    let cached: usize = planet
        .grid()
        .iter()
        .map(|c| c.cached_resolutions().count())
        .sum();
    info!(updates, frames_waited, cached_variants = cached, "Orbit finished");
    Ok(())
}
