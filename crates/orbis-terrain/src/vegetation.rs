//! Vegetation placement by a constrained random walk over a chunk's vertex
//! grid.
//!
//! The walk starts at the centre vertex and jumps along rows or columns.
//! Every candidate that survives the border check is tested against the
//! spacing, shoreline and steepness filters; the walk itself only moves to a
//! candidate with a fixed probability, so it lingers around promising areas.

use glam::{Mat4, Vec3};
use orbis_sphere::ChunkCoord;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Sampling parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationConfig {
    /// Minimum world-space spacing between accepted points of one chunk.
    pub min_distance: f32,
    /// Walk steps per chunk.
    pub iterations: u32,
    /// Lowest accepted raw height.
    pub min_height: f32,
    /// Highest accepted raw height.
    pub max_height: f32,
    /// Highest accepted `1 - cos⁴` between the radial direction and the normal.
    pub max_steepness: f32,
    /// Chance that the walk moves to an evaluated candidate.
    pub advance_probability: f32,
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            min_distance: 5.0,
            iterations: 40,
            min_height: 1.0,
            max_height: 1.05,
            max_steepness: 0.2,
            advance_probability: 0.3,
        }
    }
}

/// An accepted vegetation location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPoint {
    /// World-space position.
    pub position: Vec3,
    /// World-space unit normal.
    pub normal: Vec3,
    /// Biome of the vertex.
    pub biome_index: u32,
    /// Chunk whose transform the consumer parents the instance to.
    pub chunk: ChunkCoord,
    /// Resolution of the mesh variant the point was sampled from.
    pub resolution: u32,
    /// Vertex index within that variant.
    pub vertex_index: u32,
}

/// Attribute channels of a `resolution × resolution` chunk mesh.
#[derive(Clone, Copy, Debug)]
pub struct SampleSurface<'a> {
    pub resolution: u32,
    /// Displaced, planet-local positions.
    pub positions: &'a [Vec3],
    pub normals: &'a [Vec3],
    /// Raw height scalars.
    pub heights: &'a [f32],
    pub biomes: &'a [u32],
}

impl SampleSurface<'_> {
    fn is_complete(&self) -> bool {
        let n = (self.resolution as usize).pow(2);
        self.positions.len() >= n
            && self.normals.len() >= n
            && self.heights.len() >= n
            && self.biomes.len() >= n
    }
}

/// Start vertex of the walk: `r²/2 + r/2 - 1` for even `r`, `r²/2` for odd.
pub fn walk_center(resolution: u32) -> u32 {
    let r = resolution;
    if r % 2 == 0 {
        (r * r / 2 + r / 2).saturating_sub(1)
    } else {
        r * r / 2
    }
}

/// Draws placement points from chunk surfaces.
#[derive(Clone, Debug, Default)]
pub struct VegetationSampler {
    config: VegetationConfig,
}

impl VegetationSampler {
    pub fn new(config: VegetationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VegetationConfig {
        &self.config
    }

    /// Walk one chunk surface and return its accepted points, in acceptance
    /// order. `transform` maps planet-local positions to world space.
    ///
    /// Surfaces below resolution 2, or with channels shorter than
    /// `resolution²`, yield nothing.
    pub fn sample<R: Rng>(
        &self,
        surface: &SampleSurface<'_>,
        transform: &Mat4,
        chunk: ChunkCoord,
        rng: &mut R,
    ) -> Vec<PlacementPoint> {
        let r = surface.resolution as i64;
        if r < 2 || !surface.is_complete() {
            return Vec::new();
        }

        let cell_count = r * r;
        let directions = [r, -r, 1, -1];
        let mut current = walk_center(surface.resolution) as i64;
        let mut accepted: Vec<PlacementPoint> = Vec::new();

        for _ in 0..self.config.iterations {
            let direction = directions[rng.random_range(0..directions.len())];
            let step = rng.random_range(0..r / 2);
            let candidate = current + direction * step;

            if candidate < 0 || candidate >= cell_count || on_border(candidate, r) {
                continue;
            }

            if rng.random::<f32>() < self.config.advance_probability {
                current = candidate;
            }

            let index = candidate as usize;
            if let Some(point) = self.evaluate(surface, transform, chunk, index, &accepted) {
                accepted.push(point);
            }
        }

        accepted
    }

    fn evaluate(
        &self,
        surface: &SampleSurface<'_>,
        transform: &Mat4,
        chunk: ChunkCoord,
        index: usize,
        accepted: &[PlacementPoint],
    ) -> Option<PlacementPoint> {
        let local = surface.positions[index];
        let world = transform.transform_point3(local);
        let min_distance_sq = self.config.min_distance * self.config.min_distance;
        if accepted
            .iter()
            .any(|p| p.position.distance_squared(world) < min_distance_sq)
        {
            return None;
        }

        let height = surface.heights[index];
        if height < self.config.min_height || height > self.config.max_height {
            return None;
        }

        let normal = surface.normals[index];
        if steepness(local, normal) > self.config.max_steepness {
            return None;
        }

        Some(PlacementPoint {
            position: world,
            normal: transform.transform_vector3(normal).normalize_or_zero(),
            biome_index: surface.biomes[index],
            chunk,
            resolution: surface.resolution,
            vertex_index: index as u32,
        })
    }
}

/// `1 - cos⁴` of the angle between the radial direction and the normal; zero
/// on flat ground.
pub(crate) fn steepness(position: Vec3, normal: Vec3) -> f32 {
    let cos = position.normalize_or_zero().dot(normal.normalize_or_zero());
    1.0 - cos.powi(4)
}

/// Last two rows, first column and last column are excluded.
fn on_border(index: i64, resolution: i64) -> bool {
    let column = index % resolution;
    index >= resolution * (resolution - 2) || column == 0 || column == resolution - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbis_sphere::{CubeFace, generate_patch, recalculate_normals};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const RES: u32 = 16;

    struct Surface {
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        heights: Vec<f32>,
        biomes: Vec<u32>,
    }

    impl Surface {
        fn flat(height: f32) -> Self {
            let coord = ChunkCoord::new(CubeFace::Forward, 0, 0);
            let patch = generate_patch(coord, 1, RES);
            let positions: Vec<Vec3> = patch.positions.iter().map(|p| *p * height).collect();
            let normals = recalculate_normals(&positions, &patch.indices);
            let n = positions.len();
            Self {
                positions,
                normals,
                heights: vec![height; n],
                biomes: (0..n as u32).map(|i| i % 3).collect(),
            }
        }

        fn view(&self) -> SampleSurface<'_> {
            SampleSurface {
                resolution: RES,
                positions: &self.positions,
                normals: &self.normals,
                heights: &self.heights,
                biomes: &self.biomes,
            }
        }
    }

    fn chunk() -> ChunkCoord {
        ChunkCoord::new(CubeFace::Forward, 0, 0)
    }

    fn sampler(min_distance: f32, iterations: u32) -> VegetationSampler {
        VegetationSampler::new(VegetationConfig {
            min_distance,
            iterations,
            ..VegetationConfig::default()
        })
    }

    #[test]
    fn test_walk_center() {
        assert_eq!(walk_center(4), 9);
        assert_eq!(walk_center(16), 135);
        assert_eq!(walk_center(5), 12);
        assert_eq!(walk_center(2), 2);
    }

    #[test]
    fn test_border_exclusion() {
        let r = 8;
        assert!(on_border(0, r));
        assert!(on_border(7, r));
        assert!(on_border(8 * 6 + 3, r));
        assert!(on_border(8 * 7 + 3, r));
        assert!(!on_border(8 + 1, r));
        assert!(!on_border(8 * 5 + 6, r));
    }

    #[test]
    fn test_accepted_points_satisfy_all_filters() {
        let surface = Surface::flat(1.02);
        let sampler = sampler(0.05, 200);
        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let points = sampler.sample(&surface.view(), &Mat4::IDENTITY, chunk(), &mut rng);
            assert!(!points.is_empty(), "seed {seed} accepted nothing");
            for (i, a) in points.iter().enumerate() {
                let index = a.vertex_index as i64;
                assert!(!on_border(index, RES as i64), "border vertex {index}");
                let h = surface.heights[index as usize];
                assert!((1.0..=1.05).contains(&h));
                let local = surface.positions[index as usize];
                assert!(steepness(local, surface.normals[index as usize]) <= 0.2);
                assert_eq!(a.biome_index, surface.biomes[index as usize]);
                assert_eq!(a.chunk, chunk());
                assert_eq!(a.resolution, RES);
                for b in &points[i + 1..] {
                    assert!(a.position.distance(b.position) >= 0.05);
                }
            }
        }
    }

    #[test]
    fn test_height_band_rejects_off_shore() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sampler = sampler(0.0, 200);
        let high = Surface::flat(1.2);
        assert!(sampler.sample(&high.view(), &Mat4::IDENTITY, chunk(), &mut rng).is_empty());
        let under = Surface::flat(0.98);
        assert!(sampler.sample(&under.view(), &Mat4::IDENTITY, chunk(), &mut rng).is_empty());
    }

    #[test]
    fn test_steep_slopes_rejected() {
        let mut surface = Surface::flat(1.02);
        for (n, p) in surface.normals.iter_mut().zip(&surface.positions) {
            *n = p.normalize().any_orthonormal_vector();
        }
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let points = sampler(0.0, 200).sample(&surface.view(), &Mat4::IDENTITY, chunk(), &mut rng);
        assert!(points.is_empty());
    }

    #[test]
    fn test_min_distance_limits_to_one_point() {
        let surface = Surface::flat(1.02);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let points = sampler(10.0, 200).sample(&surface.view(), &Mat4::IDENTITY, chunk(), &mut rng);
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_never_advancing_walk_stays_on_center_cross() {
        let surface = Surface::flat(1.02);
        let sampler = VegetationSampler::new(VegetationConfig {
            min_distance: 0.0,
            iterations: 200,
            advance_probability: 0.0,
            ..VegetationConfig::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let points = sampler.sample(&surface.view(), &Mat4::IDENTITY, chunk(), &mut rng);
        assert!(!points.is_empty());
        let center = walk_center(RES);
        for p in points {
            let same_row = p.vertex_index / RES == center / RES;
            let same_column = p.vertex_index % RES == center % RES;
            assert!(same_row || same_column, "vertex {} left the centre cross", p.vertex_index);
            assert!(p.vertex_index.abs_diff(center) < RES / 2 * RES);
        }
    }

    #[test]
    fn test_always_advancing_walk_leaves_center_cross() {
        let surface = Surface::flat(1.02);
        let sampler = VegetationSampler::new(VegetationConfig {
            min_distance: 0.0,
            iterations: 200,
            advance_probability: 1.0,
            ..VegetationConfig::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let points = sampler.sample(&surface.view(), &Mat4::IDENTITY, chunk(), &mut rng);
        let center = walk_center(RES);
        let off_cross = points.iter().filter(|p| {
            p.vertex_index / RES != center / RES && p.vertex_index % RES != center % RES
        });
        assert!(off_cross.count() > 0, "walk never left the centre cross");
    }

    #[test]
    fn test_transform_applied_to_outputs() {
        let surface = Surface::flat(1.02);
        let transform = Mat4::from_scale_rotation_translation(
            Vec3::splat(100.0),
            glam::Quat::IDENTITY,
            Vec3::new(0.0, 500.0, 0.0),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let points = sampler(5.0, 100).sample(&surface.view(), &transform, chunk(), &mut rng);
        assert!(!points.is_empty());
        for p in &points {
            let local = surface.positions[p.vertex_index as usize];
            assert!(p.position.distance(local * 100.0 + Vec3::new(0.0, 500.0, 0.0)) < 1e-3);
            assert!((p.normal.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let surface = Surface::flat(1.02);
        let sampler = sampler(0.05, 100);
        let a = sampler.sample(&surface.view(), &Mat4::IDENTITY, chunk(), &mut ChaCha8Rng::seed_from_u64(9));
        let b = sampler.sample(&surface.view(), &Mat4::IDENTITY, chunk(), &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_incomplete_surface_yields_nothing() {
        let surface = Surface::flat(1.02);
        let mut view = surface.view();
        view.heights = &surface.heights[..10];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(sampler(0.0, 50).sample(&view, &Mat4::IDENTITY, chunk(), &mut rng).is_empty());
    }
}
