//! Region-grid classification of moisture and temperature into biome indices.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Biome, Gradient};

/// Raw heights below this are under water.
pub const SEA_LEVEL: f32 = 1.0;

/// Largest number of cells a region grid may have.
pub const MAX_REGION_CELLS: usize = 1 << 16;

/// Errors raised when building a [`BiomeClassifier`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BiomeError {
    /// A grid dimension is zero, so no value can be classified.
    #[error("biome grid must have at least one region per axis, got {moisture}x{temperature}")]
    EmptyGrid { moisture: u32, temperature: u32 },
    /// The grid has more than [`MAX_REGION_CELLS`] cells.
    #[error("biome grid {moisture}x{temperature} exceeds {max} cells", max = MAX_REGION_CELLS)]
    GridTooLarge { moisture: u32, temperature: u32 },
}

/// Grid dimensions, the biomes placed on the grid, and the water biome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeGridConfig {
    /// Number of moisture bands.
    pub num_moisture_regions: u32,
    /// Number of temperature bands.
    pub num_temperature_regions: u32,
    /// Biomes on the grid; a biome's index in this list is its biome index.
    pub biomes: Vec<Biome>,
    /// Biome of everything below sea level.
    pub water_biome: Biome,
}

impl BiomeGridConfig {
    /// Biome index assigned to water: one past the last grid biome.
    pub fn water_index(&self) -> u32 {
        self.biomes.len() as u32
    }
}

impl Default for BiomeGridConfig {
    fn default() -> Self {
        let (moisture, temperature) = (4, 4);
        let mut biomes = Vec::with_capacity((moisture * temperature) as usize);
        for m in 0..moisture {
            for t in 0..temperature {
                let wet = m as f32 / (moisture - 1) as f32;
                let warm = t as f32 / (temperature - 1) as f32;
                let low = [0.55 + 0.3 * warm - 0.35 * wet, 0.5 + 0.2 * wet, 0.25, 1.0];
                let high = [0.85, 0.85, 0.85 + 0.1 * (1.0 - warm), 1.0];
                biomes.push(
                    Biome::new(format!("m{m}t{t}"), m, t).with_color_ramp(Gradient::linear(low, high)),
                );
            }
        }
        Self {
            num_moisture_regions: moisture,
            num_temperature_regions: temperature,
            biomes,
            water_biome: Biome::new("water", 0, 0)
                .with_color_ramp(Gradient::linear([0.02, 0.08, 0.3, 1.0], [0.1, 0.35, 0.6, 1.0])),
        }
    }
}

/// Flat grid index of a `(moisture, temperature)` pair.
///
/// Each value is discretised with `floor(value × regions)` clamped to
/// `[0, regions - 1]`; the index is `moisture_region × num_temperature_regions
/// + temperature_region`. Both region counts must be non-zero.
pub fn classify(
    moisture: f32,
    temperature: f32,
    num_moisture_regions: u32,
    num_temperature_regions: u32,
) -> u32 {
    let moisture_region = region(moisture, num_moisture_regions);
    let temperature_region = region(temperature, num_temperature_regions);
    moisture_region
        .saturating_mul(num_temperature_regions)
        .saturating_add(temperature_region)
}

fn region(value: f32, regions: u32) -> u32 {
    let max = regions.saturating_sub(1) as i64;
    ((value * regions as f32).floor() as i64).clamp(0, max) as u32
}

/// Outcome of the duplicate-region check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BiomeValidation {
    /// Index pairs `(i, j)`, `i < j`, of biomes sharing a grid cell.
    pub duplicates: Vec<(usize, usize)>,
}

impl BiomeValidation {
    pub fn is_valid(&self) -> bool {
        self.duplicates.is_empty()
    }
}

/// Resolves climate values to biome indices through the region lookup table.
#[derive(Clone, Debug)]
pub struct BiomeClassifier {
    num_moisture_regions: u32,
    num_temperature_regions: u32,
    lookup: Vec<u32>,
    water_index: u32,
    validation: BiomeValidation,
}

impl BiomeClassifier {
    /// Validate `config` and build its lookup table.
    ///
    /// Duplicate region pairs are reported through [`Self::validation`] and a
    /// warning; they do not fail construction.
    pub fn new(config: &BiomeGridConfig) -> Result<Self, BiomeError> {
        if config.num_moisture_regions == 0 || config.num_temperature_regions == 0 {
            return Err(BiomeError::EmptyGrid {
                moisture: config.num_moisture_regions,
                temperature: config.num_temperature_regions,
            });
        }
        let cells = u64::from(config.num_moisture_regions) * u64::from(config.num_temperature_regions);
        if cells > MAX_REGION_CELLS as u64 {
            return Err(BiomeError::GridTooLarge {
                moisture: config.num_moisture_regions,
                temperature: config.num_temperature_regions,
            });
        }

        let validation = Self::validate(&config.biomes);
        for &(a, b) in &validation.duplicates {
            let (m, t) = config.biomes[a].region();
            warn!(
                first = a,
                second = b,
                moisture_region = m,
                temperature_region = t,
                "Invalid biome configuration: two biomes share a region"
            );
        }

        Ok(Self {
            num_moisture_regions: config.num_moisture_regions,
            num_temperature_regions: config.num_temperature_regions,
            lookup: Self::build_lookup_table(
                &config.biomes,
                config.num_moisture_regions,
                config.num_temperature_regions,
            ),
            water_index: config.water_index(),
            validation,
        })
    }

    /// Pairwise duplicate-region check over `biomes`.
    pub fn validate(biomes: &[Biome]) -> BiomeValidation {
        let mut duplicates = Vec::new();
        for (i, a) in biomes.iter().enumerate() {
            for (j, b) in biomes.iter().enumerate().skip(i + 1) {
                if a.same_region(b) {
                    duplicates.push((i, j));
                }
            }
        }
        BiomeValidation { duplicates }
    }

    /// Flat table of `num_moisture_regions × num_temperature_regions` biome
    /// indices. Cells no biome occupies stay 0; later biomes overwrite earlier
    /// ones in the same cell. Biomes outside the grid are skipped.
    pub fn build_lookup_table(
        biomes: &[Biome],
        num_moisture_regions: u32,
        num_temperature_regions: u32,
    ) -> Vec<u32> {
        let mut table = vec![0; num_moisture_regions as usize * num_temperature_regions as usize];
        for (i, biome) in biomes.iter().enumerate() {
            if biome.moisture_region_index >= num_moisture_regions
                || biome.temperature_region_index >= num_temperature_regions
            {
                warn!(
                    biome = i,
                    moisture_region = biome.moisture_region_index,
                    temperature_region = biome.temperature_region_index,
                    "Biome lies outside the region grid, skipped"
                );
                continue;
            }
            let cell = biome.moisture_region_index as usize * num_temperature_regions as usize
                + biome.temperature_region_index as usize;
            table[cell] = i as u32;
        }
        table
    }

    pub fn lookup_table(&self) -> &[u32] {
        &self.lookup
    }

    pub fn validation(&self) -> &BiomeValidation {
        &self.validation
    }

    pub fn water_index(&self) -> u32 {
        self.water_index
    }

    /// Biome index of a land point.
    pub fn biome_index(&self, moisture: f32, temperature: f32) -> u32 {
        let cell = classify(
            moisture,
            temperature,
            self.num_moisture_regions,
            self.num_temperature_regions,
        );
        self.lookup[cell as usize]
    }

    /// Biome index of a vertex: water below [`SEA_LEVEL`], otherwise the grid
    /// biome of its `(moisture, temperature)` pair.
    pub fn assign(&self, height: f32, climate: Vec2) -> u32 {
        if height < SEA_LEVEL {
            self.water_index
        } else {
            self.biome_index(climate.x, climate.y)
        }
    }

    /// [`Self::assign`] over parallel height and climate channels.
    pub fn assign_all(&self, heights: &[f32], climate: &[Vec2]) -> Vec<u32> {
        heights
            .iter()
            .zip(climate)
            .map(|(&h, &c)| self.assign(h, c))
            .collect()
    }
}
