//! Terrain fields and surface classification: noise parameter records, the
//! batched height and climate evaluator contracts with a CPU reference
//! implementation, biome classification, and vegetation placement sampling.

mod evaluator;
mod noise_evaluator;
mod noise_settings;
mod seed;
mod vegetation;

pub mod biome;

pub use biome::{
    Biome, BiomeClassifier, BiomeError, BiomeGridConfig, BiomeTexture, BiomeValidation, Gradient,
    GradientKey, MAX_REGION_CELLS, SEA_LEVEL, TEXTURE_WIDTH, classify,
};
pub use evaluator::{
    ClimateParams, ClimateSettings, HeightFieldEvaluator, HeightParams, MoistureTemperatureEvaluator,
    TerrainSettings,
};
pub use noise_evaluator::NoiseEvaluator;
pub use noise_settings::{RidgeNoiseSettings, SimpleNoise01Settings, SimpleNoiseSettings};
pub use seed::{chunk_rng, derive_chunk_seed, seed_offset};
pub use vegetation::{PlacementPoint, SampleSurface, VegetationConfig, VegetationSampler, walk_center};
