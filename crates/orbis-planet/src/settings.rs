//! Planet parameters.

use glam::{Mat4, Quat, Vec3};
use orbis_lod::LodConfig;
use orbis_terrain::{BiomeGridConfig, ClimateSettings, TerrainSettings, VegetationConfig};
use serde::{Deserialize, Serialize};

/// Placement and topology of a chunked planet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetSettings {
    /// Seed of the height field and of vegetation sampling.
    pub seed: u64,
    /// Chunks per face edge.
    pub chunk_resolution: u32,
    /// World-space radius at height 1.0.
    pub radius: f32,
    /// World-space centre.
    pub center: Vec3,
    /// Planet-local axis that latitude is measured against.
    pub up: Vec3,
}

impl PlanetSettings {
    /// Planet-local to world: uniform scale by the radius, then translation
    /// to the centre.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.radius), Quat::IDENTITY, self.center)
    }

    /// Normalised [`up`](Self::up), falling back to +Y.
    pub fn planet_up(&self) -> Vec3 {
        self.up.try_normalize().unwrap_or(Vec3::Y)
    }
}

impl Default for PlanetSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            chunk_resolution: 4,
            radius: 100.0,
            center: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

/// Everything a [`Planet`](crate::Planet) is built from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub planet: PlanetSettings,
    pub terrain: TerrainSettings,
    pub climate: ClimateSettings,
    pub biomes: BiomeGridConfig,
    pub lod: LodConfig,
    pub vegetation: VegetationConfig,
}
