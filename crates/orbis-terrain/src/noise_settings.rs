//! Noise parameter records passed opaquely to the field evaluators.
//!
//! The records are `#[repr(C)]` and `Pod` so a GPU evaluator can upload them
//! as structured buffers unchanged: one `i32` followed by the float fields.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Fractal noise scaled by a strength and shifted vertically.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleNoiseSettings {
    /// Number of octaves.
    pub octaves: i32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f32,
    /// Amplitude multiplier between octaves.
    pub persistence: f32,
    /// Base frequency applied to the sample position.
    pub noise_scale: f32,
    /// Output multiplier.
    pub noise_strength: f32,
    /// Constant added to the output.
    pub vertical_offset: f32,
}

impl Default for SimpleNoiseSettings {
    fn default() -> Self {
        Self {
            octaves: 5,
            lacunarity: 2.0,
            persistence: 0.5,
            noise_scale: 1.2,
            noise_strength: 1.0,
            vertical_offset: 0.3,
        }
    }
}

/// Fractal noise remapped into `[0, 1]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleNoise01Settings {
    /// Number of octaves.
    pub octaves: i32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f32,
    /// Amplitude multiplier between octaves.
    pub persistence: f32,
    /// Base frequency applied to the sample position.
    pub noise_scale: f32,
    /// Constant added after remapping.
    pub offset: f32,
    /// Contrast applied before remapping.
    pub gain: f32,
}

impl Default for SimpleNoise01Settings {
    fn default() -> Self {
        Self {
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            noise_scale: 1.0,
            offset: 0.0,
            gain: 1.0,
        }
    }
}

/// Ridged multifractal noise for mountain ranges.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(default)]
pub struct RidgeNoiseSettings {
    /// Number of octaves.
    pub octaves: i32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f32,
    /// Amplitude multiplier between octaves.
    pub persistence: f32,
    /// Base frequency applied to the sample position.
    pub noise_scale: f32,
    /// Output multiplier.
    pub noise_strength: f32,
    /// Constant added to the output.
    pub vertical_offset: f32,
    /// Exponent sharpening each ridge.
    pub power: f32,
    /// Feedback from one octave's value into the next octave's weight.
    pub gain: f32,
    /// Spacing of the extra samples averaged to soften ridge crests.
    pub sampling_distance: f32,
}

impl Default for RidgeNoiseSettings {
    fn default() -> Self {
        Self {
            octaves: 5,
            lacunarity: 2.0,
            persistence: 0.5,
            noise_scale: 1.5,
            noise_strength: 2.0,
            vertical_offset: 0.0,
            power: 2.0,
            gain: 1.0,
            sampling_distance: 0.01,
        }
    }
}
