//! Biome definition and the colour ramp used to shade it.

use serde::{Deserialize, Serialize};

/// One colour stop of a [`Gradient`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientKey {
    /// Position along the ramp in `[0, 1]`.
    pub time: f32,
    /// Linear RGBA colour.
    pub color: [f32; 4],
}

impl GradientKey {
    pub const fn new(time: f32, color: [f32; 4]) -> Self {
        Self { time, color }
    }
}

/// Piecewise-linear colour ramp.
///
/// Keys are kept sorted by time. Evaluating before the first key or after the
/// last returns that key's colour; an empty ramp is white.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<GradientKey>", into = "Vec<GradientKey>")]
pub struct Gradient {
    keys: Vec<GradientKey>,
}

impl Gradient {
    /// Build a ramp from keys in any order.
    pub fn new(mut keys: Vec<GradientKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Two-key ramp from `start` at 0 to `end` at 1.
    pub fn linear(start: [f32; 4], end: [f32; 4]) -> Self {
        Self::new(vec![GradientKey::new(0.0, start), GradientKey::new(1.0, end)])
    }

    pub fn keys(&self) -> &[GradientKey] {
        &self.keys
    }

    /// Colour at `t`.
    pub fn evaluate(&self, t: f32) -> [f32; 4] {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return [1.0; 4];
        };
        if t <= first.time {
            return first.color;
        }
        if t >= last.time {
            return last.color;
        }
        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.time {
                let span = b.time - a.time;
                let f = if span > 0.0 { (t - a.time) / span } else { 1.0 };
                return std::array::from_fn(|i| a.color[i] + (b.color[i] - a.color[i]) * f);
            }
        }
        last.color
    }
}

impl From<Vec<GradientKey>> for Gradient {
    fn from(keys: Vec<GradientKey>) -> Self {
        Self::new(keys)
    }
}

impl From<Gradient> for Vec<GradientKey> {
    fn from(gradient: Gradient) -> Self {
        gradient.keys
    }
}

/// A biome: a cell of the moisture/temperature grid with its colour ramp and
/// the vegetation that may grow there.
///
/// Two biomes are the same grid entry when their region pairs match, see
/// [`Biome::same_region`]; the ramp and vegetation do not take part.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Biome {
    /// Optional display name.
    pub name: String,
    /// Temperature band this biome occupies.
    pub temperature_region_index: u32,
    /// Moisture band this biome occupies.
    pub moisture_region_index: u32,
    /// Shading ramp, sampled into one row of the biome texture.
    pub color_ramp: Gradient,
    /// Asset identifiers of the vegetation placed in this biome.
    pub vegetation_variants: Vec<String>,
}

impl Biome {
    pub fn new(name: impl Into<String>, moisture_region_index: u32, temperature_region_index: u32) -> Self {
        Self {
            name: name.into(),
            temperature_region_index,
            moisture_region_index,
            ..Self::default()
        }
    }

    /// Replace the colour ramp.
    pub fn with_color_ramp(mut self, ramp: Gradient) -> Self {
        self.color_ramp = ramp;
        self
    }

    /// Add a vegetation variant.
    pub fn with_vegetation(mut self, variant: impl Into<String>) -> Self {
        self.vegetation_variants.push(variant.into());
        self
    }

    /// `(moisture_region_index, temperature_region_index)`.
    pub fn region(&self) -> (u32, u32) {
        (self.moisture_region_index, self.temperature_region_index)
    }

    /// Biome identity: both occupy the same grid cell.
    pub fn same_region(&self, other: &Biome) -> bool {
        self.region() == other.region()
    }
}
