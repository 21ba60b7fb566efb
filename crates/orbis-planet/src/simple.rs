//! Non-chunked planet body: one geodesic sphere displaced in a single batch.

use orbis_sphere::{GeodesicSphereBuilder, TriangleMesh, recalculate_normals};
use orbis_terrain::{HeightFieldEvaluator, HeightParams, TerrainSettings};
use tracing::info;

use crate::{HeightRange, PlanetError};

/// A displaced geodesic sphere with its normals and height channel.
#[derive(Clone, Debug, PartialEq)]
pub struct SimplePlanet {
    /// Displaced, planet-local mesh.
    pub mesh: TriangleMesh,
    pub normals: Vec<glam::Vec3>,
    pub heights: Vec<f32>,
    pub height_range: HeightRange,
}

impl SimplePlanet {
    /// Build a geodesic sphere with `resolution` interior points per base
    /// edge and displace every vertex by its evaluated height.
    pub fn generate(
        resolution: u32,
        seed: u64,
        settings: &TerrainSettings,
        evaluator: &dyn HeightFieldEvaluator,
    ) -> Result<Self, PlanetError> {
        let sphere = GeodesicSphereBuilder::new().build(resolution);
        let params = HeightParams::new(settings, seed);
        let heights = evaluator.evaluate_heights(&sphere.positions, &params);
        if heights.len() != sphere.positions.len() {
            return Err(PlanetError::EvaluatorLength {
                evaluator: "height",
                expected: sphere.positions.len(),
                actual: heights.len(),
            });
        }

        let positions = sphere
            .positions
            .iter()
            .zip(&heights)
            .map(|(&p, &h)| p * h)
            .collect();
        let mesh = TriangleMesh::new(positions, sphere.indices);
        let normals = mesh.normals();
        let height_range = HeightRange::from_heights(&heights).unwrap_or_default();
        info!(
            resolution,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "Generated simple planet"
        );
        Ok(Self {
            mesh,
            normals,
            heights,
            height_range,
        })
    }

    /// Recompute normals after editing [`mesh`](Self::mesh) positions.
    pub fn recalculate_normals(&mut self) {
        self.normals = recalculate_normals(&self.mesh.positions, &self.mesh.indices);
    }
}
