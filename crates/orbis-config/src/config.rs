//! Planet configuration with RON persistence.

use std::path::{Path, PathBuf};

use orbis_lod::LodConfig;
use orbis_planet::{PlanetConfig, PlanetSettings};
use orbis_terrain::{BiomeGridConfig, ClimateSettings, TerrainSettings, VegetationConfig};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "planet.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seed, chunk grid, radius and placement.
    pub planet: PlanetSettings,
    /// Height field noise.
    pub terrain: TerrainSettings,
    /// Moisture and temperature fields.
    pub climate: ClimateSettings,
    /// Biome grid and water biome.
    pub biomes: BiomeGridConfig,
    /// Detail table and update thresholds.
    pub lod: LodConfig,
    /// Vegetation sampling.
    pub vegetation: VegetationConfig,
    /// Debug settings.
    pub debug: DebugConfig,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter, e.g. `"info"` or `"info,orbis_planet=debug"`.
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// `<platform config dir>/orbis`, or `./orbis` when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("orbis")
}

impl Config {
    /// The planet-facing subset.
    pub fn planet_config(&self) -> PlanetConfig {
        PlanetConfig {
            planet: self.planet.clone(),
            terrain: self.terrain.clone(),
            climate: self.climate.clone(),
            biomes: self.biomes.clone(),
            lod: self.lod.clone(),
            vegetation: self.vegetation.clone(),
        }
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `planet.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;
        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        log::debug!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Re-read the file: `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE_NAME))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let ron_str =
            ron::ser::to_string_pretty(&Config::default(), ron::ser::PrettyConfig::new()).unwrap();
        assert!(ron_str.contains("chunk_resolution: 4"));
        assert!(ron_str.contains("far_regeneration_distance: 120.0"));
        assert!(ron_str.contains("advance_probability: 0.3"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let config: Config = ron::from_str("(planet: (seed: 9), vegetation: ())").unwrap();
        assert_eq!(config.planet.seed, 9);
        assert_eq!(config.planet.chunk_resolution, 4);
        assert_eq!(config.vegetation, VegetationConfig::default());
        assert_eq!(config.lod, LodConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.planet.seed = 1234;
        config.planet.radius = 250.0;
        config.biomes.biomes.truncate(3);
        config.save(dir.path()).unwrap();

        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.lod.viewer_move_threshold = 5.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().lod.viewer_move_threshold, 5.0);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_planet_config_subset() {
        let mut config = Config::default();
        config.planet.seed = 77;
        config.vegetation.iterations = 12;
        let planet = config.planet_config();
        assert_eq!(planet.planet.seed, 77);
        assert_eq!(planet.vegetation.iterations, 12);
        assert_eq!(planet.biomes, config.biomes);
    }
}
