//! Biome system: definitions with colour ramps, the moisture/temperature
//! region grid and its lookup table, and the shading texture layout.
//!
//! Continuous moisture and temperature values are discretised into a
//! `num_moisture_regions × num_temperature_regions` grid; each cell resolves
//! to a biome index through a flat lookup table. Terrain below sea level is
//! assigned the water biome, which sits one past the last grid biome.

mod classifier;
mod def;
mod texture;

pub use classifier::{
    BiomeClassifier, BiomeError, BiomeGridConfig, BiomeValidation, MAX_REGION_CELLS, SEA_LEVEL,
    classify,
};
pub use def::{Biome, Gradient, GradientKey};
pub use texture::{BiomeTexture, TEXTURE_WIDTH};
