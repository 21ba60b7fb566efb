//! CPU reference implementation of both field evaluators over simplex noise.
//!
//! Batches are split into contiguous slices evaluated on scoped worker
//! threads. Every output depends only on its own input, so results are
//! identical for any thread count.

use glam::{Vec2, Vec3};
use noise::{NoiseFn, Simplex};

use crate::{
    ClimateParams, HeightFieldEvaluator, HeightParams, MoistureTemperatureEvaluator,
    RidgeNoiseSettings, SimpleNoise01Settings, SimpleNoiseSettings,
};

/// Seed offsets in `[0, 1)³` are stretched by this much in noise space.
const SEED_OFFSET_SPREAD: f32 = 1000.0;

/// Height contribution of one unit of shape or ridge noise.
const HEIGHT_SCALE: f32 = 0.01;

/// Smallest slice handed to a worker thread.
const MIN_SLICE: usize = 1024;

/// Simplex-noise evaluator for heights and climate.
#[derive(Clone, Debug)]
pub struct NoiseEvaluator {
    noise: Simplex,
    threads: usize,
}

impl NoiseEvaluator {
    /// Evaluator using every available core.
    pub fn new() -> Self {
        Self::with_threads(num_cpus::get())
    }

    /// Evaluator using at most `threads` worker threads.
    pub fn with_threads(threads: usize) -> Self {
        Self {
            noise: Simplex::new(0),
            threads: threads.max(1),
        }
    }

    fn sample(&self, p: Vec3) -> f32 {
        self.noise.get([p.x as f64, p.y as f64, p.z as f64]) as f32
    }

    /// Sum of `octaves` layers of noise and the sum of their amplitudes.
    fn fbm(
        &self,
        p: Vec3,
        octaves: i32,
        lacunarity: f32,
        persistence: f32,
        scale: f32,
        offset: Vec3,
    ) -> (f32, f32) {
        let mut sum = 0.0;
        let mut amplitude = 1.0;
        let mut amplitude_sum = 0.0;
        let mut frequency = scale;
        for _ in 0..octaves.max(0) {
            sum += self.sample(p * frequency + offset * SEED_OFFSET_SPREAD) * amplitude;
            amplitude_sum += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }
        (sum, amplitude_sum)
    }

    /// Fractal noise scaled and shifted by `settings`.
    pub fn simple_noise(&self, p: Vec3, settings: &SimpleNoiseSettings, offset: Vec3) -> f32 {
        let (sum, _) = self.fbm(
            p,
            settings.octaves,
            settings.lacunarity,
            settings.persistence,
            settings.noise_scale,
            offset,
        );
        sum * settings.noise_strength + settings.vertical_offset
    }

    /// Fractal noise remapped into `[0, 1]`.
    pub fn simple_noise01(&self, p: Vec3, settings: &SimpleNoise01Settings, offset: Vec3) -> f32 {
        let (sum, amplitude_sum) = self.fbm(
            p,
            settings.octaves,
            settings.lacunarity,
            settings.persistence,
            settings.noise_scale,
            offset,
        );
        if amplitude_sum <= 0.0 {
            return settings.offset.clamp(0.0, 1.0);
        }
        let n = sum / amplitude_sum;
        ((n * settings.gain + 1.0) * 0.5 + settings.offset).clamp(0.0, 1.0)
    }

    /// Ridged multifractal noise: each octave folds the noise around zero,
    /// sharpens it by `power`, and weights the next octave by its own value.
    pub fn ridge_noise(&self, p: Vec3, settings: &RidgeNoiseSettings, offset: Vec3) -> f32 {
        let mut sum = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = settings.noise_scale;
        let mut weight = 1.0;
        for _ in 0..settings.octaves.max(0) {
            let folded = 1.0 - self.sample(p * frequency + offset * SEED_OFFSET_SPREAD).abs();
            let value = folded.abs().powf(settings.power) * weight;
            weight = (value * settings.gain).clamp(0.0, 1.0);
            sum += value * amplitude;
            amplitude *= settings.persistence;
            frequency *= settings.lacunarity;
        }
        sum * settings.noise_strength + settings.vertical_offset
    }

    /// Ridge noise averaged with four tangent-plane neighbours
    /// `sampling_distance` away.
    pub fn smoothed_ridge_noise(&self, p: Vec3, settings: &RidgeNoiseSettings, offset: Vec3) -> f32 {
        let normal = p.normalize_or_zero();
        let axis_a = normal.cross(Vec3::Y).normalize_or_zero();
        let axis_b = normal.cross(axis_a);
        let d = settings.sampling_distance;
        let samples = [
            p,
            p - axis_a * d,
            p + axis_a * d,
            p - axis_b * d,
            p + axis_b * d,
        ];
        samples
            .iter()
            .map(|&s| self.ridge_noise(s, settings, offset))
            .sum::<f32>()
            / samples.len() as f32
    }

    /// Radial height scalar at one unit-sphere position; 1.0 is sea level.
    pub fn height_at(&self, p: Vec3, params: &HeightParams) -> f32 {
        let mut shape = self.simple_noise(p, &params.flatland_noise, params.seed_offset);
        shape = shape.max(-params.ocean_floor_threshold);
        if shape < 0.0 {
            shape *= 1.0 + params.ocean_depth_multiplier;
        }

        let mask_raw = self.simple_noise(p, &params.ridge_mask_noise, params.seed_offset);
        let mask_span = (1.0 - params.ridge_mask_min).max(f32::EPSILON);
        let mask = ((mask_raw - params.ridge_mask_min) / mask_span).clamp(0.0, 1.0);
        let ridge = self.smoothed_ridge_noise(p, &params.ridge_noise, params.seed_offset);

        1.0 + shape * HEIGHT_SCALE + ridge * HEIGHT_SCALE * mask
    }

    /// `(moisture, temperature)` at one position.
    pub fn climate_at(&self, p: Vec3, height: f32, params: &ClimateParams) -> Vec2 {
        let latitude = p
            .normalize_or_zero()
            .dot(params.planet_up.normalize_or_zero())
            .abs();
        let moisture_noise =
            self.simple_noise01(p, &params.moisture_noise, params.moisture_seed_offset);
        let temperature_noise =
            self.simple_noise01(p, &params.temperature_noise, params.temperature_seed_offset);
        let temperature_base = lerp(temperature_noise, 1.0 - latitude, 0.5);

        let height_term = 1.0 - params.normalized_height(height);
        let moisture = lerp(moisture_noise, height_term, params.moisture_height_influence);
        let temperature = lerp(
            temperature_base,
            height_term,
            params.temperature_height_influence,
        );
        Vec2::new(moisture.clamp(0.0, 1.0), temperature.clamp(0.0, 1.0))
    }

    fn parallel_map<R, F>(&self, len: usize, f: F) -> Vec<R>
    where
        R: Send + Clone + Default,
        F: Fn(usize) -> R + Sync,
    {
        let mut out = vec![R::default(); len];
        let slice_len = len.div_ceil(self.threads).max(MIN_SLICE);
        std::thread::scope(|scope| {
            for (slice_index, slice) in out.chunks_mut(slice_len).enumerate() {
                let f = &f;
                scope.spawn(move || {
                    let base = slice_index * slice_len;
                    for (i, slot) in slice.iter_mut().enumerate() {
                        *slot = f(base + i);
                    }
                });
            }
        });
        out
    }
}

impl Default for NoiseEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl HeightFieldEvaluator for NoiseEvaluator {
    fn evaluate_heights(&self, positions: &[Vec3], params: &HeightParams) -> Vec<f32> {
        self.parallel_map(positions.len(), |i| self.height_at(positions[i], params))
    }
}

impl MoistureTemperatureEvaluator for NoiseEvaluator {
    fn evaluate_moisture_temperature(
        &self,
        positions: &[Vec3],
        heights: &[f32],
        params: &ClimateParams,
    ) -> Vec<Vec2> {
        self.parallel_map(positions.len(), |i| {
            let height = heights.get(i).copied().unwrap_or(params.min_height);
            self.climate_at(positions[i], height, params)
        })
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
