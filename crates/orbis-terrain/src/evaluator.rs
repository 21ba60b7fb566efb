//! Contracts of the batched field evaluators.
//!
//! Evaluators are pure, deterministic functions of their inputs that map a
//! batch of unit-sphere positions to one value per position, in order. They
//! are typically backed by massively parallel hardware; callers assemble one
//! contiguous batch per pass and treat each call as synchronous.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::{RidgeNoiseSettings, SimpleNoise01Settings, SimpleNoiseSettings, seed_offset};

/// Configured shape of the height field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Continental base shape.
    pub flatland_noise: SimpleNoiseSettings,
    /// Mask restricting where ridges appear.
    pub ridge_mask_noise: SimpleNoiseSettings,
    /// Mountain ridges.
    pub ridge_noise: RidgeNoiseSettings,
    /// Mask values at or below this suppress ridges entirely.
    pub ridge_mask_min: f32,
    /// Extra depth applied to terrain below sea level.
    pub ocean_depth_multiplier: f32,
    /// The base shape never drops below `-ocean_floor_threshold`.
    pub ocean_floor_threshold: f32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            flatland_noise: SimpleNoiseSettings::default(),
            ridge_mask_noise: SimpleNoiseSettings {
                octaves: 3,
                noise_scale: 1.0,
                vertical_offset: 0.0,
                ..SimpleNoiseSettings::default()
            },
            ridge_noise: RidgeNoiseSettings::default(),
            ridge_mask_min: 0.2,
            ocean_depth_multiplier: 4.0,
            ocean_floor_threshold: 1.0,
        }
    }
}

/// Everything a height evaluation needs besides the positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightParams {
    /// Continental base shape.
    pub flatland_noise: SimpleNoiseSettings,
    /// Ridge mask.
    pub ridge_mask_noise: SimpleNoiseSettings,
    /// Mountain ridges.
    pub ridge_noise: RidgeNoiseSettings,
    /// Offset into noise space derived from the planet seed.
    pub seed_offset: Vec3,
    /// See [`TerrainSettings::ridge_mask_min`].
    pub ridge_mask_min: f32,
    /// See [`TerrainSettings::ocean_depth_multiplier`].
    pub ocean_depth_multiplier: f32,
    /// See [`TerrainSettings::ocean_floor_threshold`].
    pub ocean_floor_threshold: f32,
}

impl HeightParams {
    /// Resolve settings against a planet seed.
    pub fn new(settings: &TerrainSettings, seed: u64) -> Self {
        Self {
            flatland_noise: settings.flatland_noise,
            ridge_mask_noise: settings.ridge_mask_noise,
            ridge_noise: settings.ridge_noise,
            seed_offset: seed_offset(seed),
            ridge_mask_min: settings.ridge_mask_min,
            ocean_depth_multiplier: settings.ocean_depth_multiplier,
            ocean_floor_threshold: settings.ocean_floor_threshold,
        }
    }
}

/// Configured moisture and temperature fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateSettings {
    /// Moisture noise.
    pub moisture_noise: SimpleNoise01Settings,
    /// Temperature noise.
    pub temperature_noise: SimpleNoise01Settings,
    /// Seed of the moisture field.
    pub moisture_seed: u64,
    /// Seed of the temperature field.
    pub temperature_seed: u64,
    /// Weight of the height term blended into moisture.
    pub moisture_height_influence: f32,
    /// Weight of the height term blended into temperature.
    pub temperature_height_influence: f32,
}

impl Default for ClimateSettings {
    fn default() -> Self {
        Self {
            moisture_noise: SimpleNoise01Settings::default(),
            temperature_noise: SimpleNoise01Settings {
                noise_scale: 0.8,
                ..SimpleNoise01Settings::default()
            },
            moisture_seed: 1,
            temperature_seed: 2,
            moisture_height_influence: 0.3,
            temperature_height_influence: 0.5,
        }
    }
}

/// Everything a climate evaluation needs besides positions and heights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateParams {
    /// Lowest height of the planet, for normalisation.
    pub min_height: f32,
    /// Highest height of the planet, for normalisation.
    pub max_height: f32,
    /// Moisture noise.
    pub moisture_noise: SimpleNoise01Settings,
    /// Temperature noise.
    pub temperature_noise: SimpleNoise01Settings,
    /// Noise-space offset of the moisture field.
    pub moisture_seed_offset: Vec3,
    /// Noise-space offset of the temperature field.
    pub temperature_seed_offset: Vec3,
    /// Weight of the height term blended into moisture.
    pub moisture_height_influence: f32,
    /// Weight of the height term blended into temperature.
    pub temperature_height_influence: f32,
    /// The planet's up axis; latitude is measured against it.
    pub planet_up: Vec3,
}

impl ClimateParams {
    /// Resolve settings against a height range and the planet orientation.
    pub fn new(settings: &ClimateSettings, min_height: f32, max_height: f32, planet_up: Vec3) -> Self {
        Self {
            min_height,
            max_height,
            moisture_noise: settings.moisture_noise,
            temperature_noise: settings.temperature_noise,
            moisture_seed_offset: seed_offset(settings.moisture_seed),
            temperature_seed_offset: seed_offset(settings.temperature_seed),
            moisture_height_influence: settings.moisture_height_influence,
            temperature_height_influence: settings.temperature_height_influence,
            planet_up,
        }
    }

    /// Height mapped into `[0, 1]` over `[min_height, max_height]`; zero for an
    /// empty range.
    pub fn normalized_height(&self, height: f32) -> f32 {
        let span = self.max_height - self.min_height;
        if span <= f32::EPSILON {
            return 0.0;
        }
        ((height - self.min_height) / span).clamp(0.0, 1.0)
    }
}

/// Maps unit-sphere positions to radial height scalars.
pub trait HeightFieldEvaluator: Send + Sync {
    /// One height per position, in order.
    fn evaluate_heights(&self, positions: &[Vec3], params: &HeightParams) -> Vec<f32>;
}

/// Maps positions and heights to `(moisture, temperature)` pairs in `[0, 1]`.
pub trait MoistureTemperatureEvaluator: Send + Sync {
    /// One `(moisture, temperature)` pair per position, in order.
    fn evaluate_moisture_temperature(
        &self,
        positions: &[Vec3],
        heights: &[f32],
        params: &ClimateParams,
    ) -> Vec<Vec2>;
}
