//! Biome shading texture: one RGBA8 row per biome ramp, water last.

use super::BiomeGridConfig;

/// Horizontal resolution of every ramp row.
pub const TEXTURE_WIDTH: u32 = 50;

/// Row-major RGBA8 texture with `biomes.len() + 1` rows.
///
/// Row `i < biomes.len()` holds biome `i`'s colour ramp; the final row holds
/// the water biome. Texel `x` samples the ramp at `x / (TEXTURE_WIDTH - 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeTexture {
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl BiomeTexture {
    pub fn build(config: &BiomeGridConfig) -> Self {
        let ramps = config
            .biomes
            .iter()
            .map(|b| &b.color_ramp)
            .chain(std::iter::once(&config.water_biome.color_ramp));

        let mut pixels = Vec::with_capacity((config.biomes.len() + 1) * TEXTURE_WIDTH as usize);
        for ramp in ramps {
            for x in 0..TEXTURE_WIDTH {
                let t = x as f32 / (TEXTURE_WIDTH - 1) as f32;
                pixels.push(ramp.evaluate(t).map(to_unorm8));
            }
        }

        Self {
            height: config.biomes.len() as u32 + 1,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        TEXTURE_WIDTH
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texels of row `index`, or `None` past the water row.
    pub fn row(&self, index: u32) -> Option<&[[u8; 4]]> {
        let start = index as usize * TEXTURE_WIDTH as usize;
        self.pixels.get(start..start + TEXTURE_WIDTH as usize)
    }

    /// Raw bytes for upload, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

fn to_unorm8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Biome, Gradient};

    fn config() -> BiomeGridConfig {
        BiomeGridConfig {
            num_moisture_regions: 1,
            num_temperature_regions: 2,
            biomes: vec![
                Biome::new("red", 0, 0)
                    .with_color_ramp(Gradient::linear([1.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0])),
                Biome::new("fade", 0, 1)
                    .with_color_ramp(Gradient::linear([0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0, 1.0])),
            ],
            water_biome: Biome::new("water", 0, 0)
                .with_color_ramp(Gradient::linear([0.0, 0.0, 1.0, 1.0], [0.0, 0.0, 1.0, 1.0])),
        }
    }

    #[test]
    fn test_layout_rows_then_water() {
        let texture = BiomeTexture::build(&config());
        assert_eq!(texture.width(), 50);
        assert_eq!(texture.height(), 3);
        assert_eq!(texture.as_bytes().len(), 50 * 3 * 4);
        assert!(texture.row(0).unwrap().iter().all(|p| *p == [255, 0, 0, 255]));
        assert!(texture.row(2).unwrap().iter().all(|p| *p == [0, 0, 255, 255]));
        assert!(texture.row(3).is_none());
    }

    #[test]
    fn test_ramp_sampled_end_to_end() {
        let texture = BiomeTexture::build(&config());
        let row = texture.row(1).unwrap();
        assert_eq!(row[0], [0, 0, 0, 255]);
        assert_eq!(row[49], [255, 255, 255, 255]);
        let bytes = texture.as_bytes();
        let start = 50 * 4;
        assert_eq!(&bytes[start..start + 4], &[0, 0, 0, 255]);
    }
}
