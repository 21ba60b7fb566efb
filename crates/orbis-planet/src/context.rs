//! Per-pass generation state: the contiguous position batch handed to the
//! evaluators, the spans mapping it back to chunks, and the evaluated fields.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use orbis_sphere::{ChunkCoord, TriangleMesh, recalculate_normals};
use orbis_terrain::{
    BiomeClassifier, ClimateParams, ClimateSettings, HeightFieldEvaluator, HeightParams,
    MoistureTemperatureEvaluator, SEA_LEVEL,
};
use serde::{Deserialize, Serialize};

use crate::{MeshVariant, PlanetError};

/// Lowest and highest raw height of a planet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightRange {
    pub min: f32,
    pub max: f32,
}

impl HeightRange {
    /// Range of `heights`, or `None` when empty.
    pub fn from_heights(heights: &[f32]) -> Option<Self> {
        let (&first, rest) = heights.split_first()?;
        Some(rest.iter().fold(
            Self {
                min: first,
                max: first,
            },
            |range, &h| Self {
                min: range.min.min(h),
                max: range.max.max(h),
            },
        ))
    }
}

impl Default for HeightRange {
    fn default() -> Self {
        Self {
            min: SEA_LEVEL,
            max: SEA_LEVEL,
        }
    }
}

/// The two field evaluators a planet runs its batches through.
#[derive(Clone)]
pub struct Evaluators {
    pub height: Arc<dyn HeightFieldEvaluator>,
    pub climate: Arc<dyn MoistureTemperatureEvaluator>,
}

impl Evaluators {
    /// One value implementing both contracts.
    pub fn shared<E>(evaluator: Arc<E>) -> Self
    where
        E: HeightFieldEvaluator + MoistureTemperatureEvaluator + 'static,
    {
        Self {
            height: evaluator.clone(),
            climate: evaluator,
        }
    }
}

impl std::fmt::Debug for Evaluators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluators").finish_non_exhaustive()
    }
}

/// Parameters of one evaluation job.
#[derive(Clone, Debug)]
pub(crate) struct FieldJob {
    pub height_params: HeightParams,
    pub climate: ClimateSettings,
    pub planet_up: Vec3,
    /// Normalisation range for climate; `None` derives it from the batch.
    pub fixed_range: Option<HeightRange>,
}

/// Evaluator output for one batch.
#[derive(Clone, Debug)]
pub(crate) struct EvaluatedBatch {
    pub heights: Vec<f32>,
    pub climate: Vec<Vec2>,
    /// Range of the batch's own heights.
    pub range: Option<HeightRange>,
}

/// Run both evaluators over `positions`, checking result lengths.
pub(crate) fn evaluate_batch(
    evaluators: &Evaluators,
    positions: &[Vec3],
    job: &FieldJob,
) -> Result<EvaluatedBatch, PlanetError> {
    let heights = evaluators.height.evaluate_heights(positions, &job.height_params);
    check_len("height", positions.len(), heights.len())?;

    let range = HeightRange::from_heights(&heights);
    let normalisation = job.fixed_range.or(range).unwrap_or_default();
    let params = ClimateParams::new(&job.climate, normalisation.min, normalisation.max, job.planet_up);
    let climate = evaluators
        .climate
        .evaluate_moisture_temperature(positions, &heights, &params);
    check_len("moisture/temperature", positions.len(), climate.len())?;

    Ok(EvaluatedBatch {
        heights,
        climate,
        range,
    })
}

fn check_len(evaluator: &'static str, expected: usize, actual: usize) -> Result<(), PlanetError> {
    if expected == actual {
        Ok(())
    } else {
        Err(PlanetError::EvaluatorLength {
            evaluator,
            expected,
            actual,
        })
    }
}

#[derive(Clone, Debug)]
struct BatchSpan {
    coord: ChunkCoord,
    resolution: u32,
    start: usize,
    len: usize,
    indices: Vec<u32>,
}

/// Unit-sphere patches of every chunk being (re)built in one pass, laid out
/// back to back in a single position batch.
#[derive(Clone, Debug, Default)]
pub struct GenerationContext {
    positions: Vec<Vec3>,
    spans: Vec<BatchSpan>,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk's unit-sphere patch to the batch.
    pub fn push_patch(&mut self, coord: ChunkCoord, resolution: u32, patch: TriangleMesh) {
        let start = self.positions.len();
        let len = patch.positions.len();
        self.positions.extend(patch.positions);
        self.spans.push(BatchSpan {
            coord,
            resolution,
            start,
            len,
            indices: patch.indices,
        });
    }

    /// The contiguous position batch.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn chunk_count(&self) -> usize {
        self.spans.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Chunks in the batch, in push order.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.spans.iter().map(|s| s.coord)
    }

    /// Displace every patch by its heights, recompute normals and assign
    /// biomes, yielding one finished variant per chunk.
    pub(crate) fn into_variants(
        self,
        batch: EvaluatedBatch,
        classifier: &BiomeClassifier,
    ) -> Result<Vec<(ChunkCoord, MeshVariant)>, PlanetError> {
        check_len("height", self.positions.len(), batch.heights.len())?;
        check_len("moisture/temperature", self.positions.len(), batch.climate.len())?;

        let mut variants = Vec::with_capacity(self.spans.len());
        for span in self.spans {
            let range = span.start..span.start + span.len;
            let heights = batch.heights[range.clone()].to_vec();
            let climate = batch.climate[range.clone()].to_vec();
            let positions: Vec<Vec3> = self.positions[range]
                .iter()
                .zip(&heights)
                .map(|(&p, &h)| p * h)
                .collect();
            let normals = recalculate_normals(&positions, &span.indices);
            let biomes = classifier.assign_all(&heights, &climate);
            variants.push((
                span.coord,
                MeshVariant {
                    resolution: span.resolution,
                    positions,
                    normals,
                    indices: span.indices,
                    heights,
                    climate,
                    biomes,
                },
            ));
        }
        Ok(variants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbis_sphere::{CubeFace, generate_patch};
    use orbis_terrain::{BiomeGridConfig, TerrainSettings};

    struct Radial;

    impl HeightFieldEvaluator for Radial {
        fn evaluate_heights(&self, positions: &[Vec3], _: &HeightParams) -> Vec<f32> {
            positions.iter().map(|p| 1.0 + 0.1 * p.y).collect()
        }
    }

    impl MoistureTemperatureEvaluator for Radial {
        fn evaluate_moisture_temperature(
            &self,
            positions: &[Vec3],
            heights: &[f32],
            params: &ClimateParams,
        ) -> Vec<Vec2> {
            positions
                .iter()
                .zip(heights)
                .map(|(_, &h)| Vec2::splat(params.normalized_height(h)))
                .collect()
        }
    }

    struct Short;

    impl HeightFieldEvaluator for Short {
        fn evaluate_heights(&self, positions: &[Vec3], _: &HeightParams) -> Vec<f32> {
            vec![1.0; positions.len().saturating_sub(1)]
        }
    }

    impl MoistureTemperatureEvaluator for Short {
        fn evaluate_moisture_temperature(&self, _: &[Vec3], _: &[f32], _: &ClimateParams) -> Vec<Vec2> {
            Vec::new()
        }
    }

    fn job(fixed_range: Option<HeightRange>) -> FieldJob {
        FieldJob {
            height_params: HeightParams::new(&TerrainSettings::default(), 0),
            climate: ClimateSettings::default(),
            planet_up: Vec3::Y,
            fixed_range,
        }
    }

    fn context() -> GenerationContext {
        let mut context = GenerationContext::new();
        let a = ChunkCoord::new(CubeFace::Up, 0, 0);
        let b = ChunkCoord::new(CubeFace::Down, 0, 0);
        context.push_patch(a, 4, generate_patch(a, 1, 4));
        context.push_patch(b, 3, generate_patch(b, 1, 3));
        context
    }

    #[test]
    fn test_height_range() {
        assert_eq!(HeightRange::from_heights(&[]), None);
        let range = HeightRange::from_heights(&[1.2, 0.9, 1.05]).unwrap();
        assert_eq!(range, HeightRange { min: 0.9, max: 1.2 });
    }

    #[test]
    fn test_batch_is_contiguous() {
        let context = context();
        assert_eq!(context.chunk_count(), 2);
        assert_eq!(context.vertex_count(), 16 + 9);
        assert_eq!(context.positions()[16], generate_patch(ChunkCoord::new(CubeFace::Down, 0, 0), 1, 3).positions[0]);
    }

    #[test]
    fn test_variants_displaced_by_height() {
        let context = context();
        let evaluators = Evaluators::shared(Arc::new(Radial));
        let batch = evaluate_batch(&evaluators, context.positions(), &job(None)).unwrap();
        let range = batch.range.unwrap();
        assert!(range.max > 1.09 && range.min < 0.91);

        let classifier = BiomeClassifier::new(&BiomeGridConfig::default()).unwrap();
        let variants = context.clone().into_variants(batch, &classifier).unwrap();
        assert_eq!(variants.len(), 2);
        let (coord, up) = &variants[0];
        assert_eq!(coord.face, CubeFace::Up);
        assert_eq!(up.resolution, 4);
        assert_eq!(up.vertex_count(), 16);
        for ((p, unit), h) in up.positions.iter().zip(&context.positions()[..16]).zip(&up.heights) {
            assert!((p.length() - h).abs() < 1e-5);
            assert!(p.normalize().dot(*unit) > 0.9999);
        }
        for n in &up.normals {
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
        // The down face sits below sea level everywhere.
        assert!(variants[1].1.biomes.iter().all(|&b| b == classifier.water_index()));
    }

    #[test]
    fn test_fixed_range_normalises_climate() {
        let context = context();
        let evaluators = Evaluators::shared(Arc::new(Radial));
        let fixed = HeightRange { min: 0.0, max: 10.0 };
        let batch = evaluate_batch(&evaluators, context.positions(), &job(Some(fixed))).unwrap();
        for (c, h) in batch.climate.iter().zip(&batch.heights) {
            assert!((c.x - h / 10.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_short_batch_is_error() {
        let context = context();
        let evaluators = Evaluators::shared(Arc::new(Short));
        let err = evaluate_batch(&evaluators, context.positions(), &job(None)).unwrap_err();
        assert!(matches!(
            err,
            PlanetError::EvaluatorLength { evaluator: "height", expected: 25, actual: 24 }
        ));
    }
}
