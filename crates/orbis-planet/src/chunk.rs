//! Chunk records and their per-resolution mesh cache.

use glam::{Mat4, Vec2, Vec3};
use hashbrown::HashMap;
use orbis_sphere::{Aabb, ChunkCoord, PROXY_RESOLUTION, TriangleMesh, generate_patch};
use orbis_terrain::{BiomeClassifier, SampleSurface};

/// A chunk mesh built at one resolution, with its attribute channels.
///
/// Positions are planet-local: unit-sphere positions scaled by their height.
/// Every channel holds one entry per vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshVariant {
    /// Patch resolution the variant was built at.
    pub resolution: u32,
    /// Displaced positions.
    pub positions: Vec<Vec3>,
    /// Normals recomputed after displacement.
    pub normals: Vec<Vec3>,
    /// Triangle list.
    pub indices: Vec<u32>,
    /// Raw height scalar per vertex.
    pub heights: Vec<f32>,
    /// `(moisture, temperature)` per vertex.
    pub climate: Vec<Vec2>,
    /// Biome index per vertex.
    pub biomes: Vec<u32>,
}

impl MeshVariant {
    /// True once the variant has vertices.
    pub fn is_populated(&self) -> bool {
        !self.positions.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// View of the channels the vegetation sampler reads.
    pub fn surface(&self) -> SampleSurface<'_> {
        SampleSurface {
            resolution: self.resolution,
            positions: &self.positions,
            normals: &self.normals,
            heights: &self.heights,
            biomes: &self.biomes,
        }
    }
}

/// One cell of the six-face chunk grid.
///
/// Variants are added the first time a resolution is requested and kept for
/// the chunk's lifetime.
#[derive(Clone, Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    variants: HashMap<u32, MeshVariant>,
    active_resolution: Option<u32>,
    proxy: TriangleMesh,
    bounds: Option<Aabb>,
}

impl Chunk {
    /// Create an empty chunk with its bounds proxy.
    pub fn new(coord: ChunkCoord, chunk_resolution: u32) -> Self {
        Self {
            coord,
            variants: HashMap::new(),
            active_resolution: None,
            proxy: generate_patch(coord, chunk_resolution, PROXY_RESOLUTION),
            bounds: None,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn active_resolution(&self) -> Option<u32> {
        self.active_resolution
    }

    /// Mesh variant currently displayed.
    pub fn active_variant(&self) -> Option<&MeshVariant> {
        self.active_resolution.and_then(|r| self.variants.get(&r))
    }

    pub fn variant(&self, resolution: u32) -> Option<&MeshVariant> {
        self.variants.get(&resolution)
    }

    /// True when a variant with vertices is cached for `resolution`.
    pub fn has_variant(&self, resolution: u32) -> bool {
        self.variants
            .get(&resolution)
            .is_some_and(MeshVariant::is_populated)
    }

    /// Cached resolutions, unordered.
    pub fn cached_resolutions(&self) -> impl Iterator<Item = u32> + '_ {
        self.variants.keys().copied()
    }

    /// Store a freshly built variant and make it active.
    pub fn insert_variant(&mut self, variant: MeshVariant) {
        let resolution = variant.resolution;
        self.variants.insert(resolution, variant);
        self.active_resolution = Some(resolution);
    }

    /// Switch to a cached variant. Returns false, leaving the chunk untouched,
    /// when no populated variant exists for `resolution`.
    pub fn activate(&mut self, resolution: u32) -> bool {
        if !self.has_variant(resolution) {
            return false;
        }
        self.active_resolution = Some(resolution);
        true
    }

    /// Reassign the biome channel of every cached variant from its stored
    /// height and climate channels.
    pub fn reclassify(&mut self, classifier: &BiomeClassifier) {
        for variant in self.variants.values_mut() {
            variant.biomes = classifier.assign_all(&variant.heights, &variant.climate);
        }
    }

    /// Recompute world bounds from the proxy patch under `transform`.
    ///
    /// The proxy always has resolution 8, whatever variant is active.
    pub fn refresh_bounds(&mut self, transform: &Mat4) -> Option<Aabb> {
        self.bounds = Aabb::from_transformed_points(&self.proxy.positions, transform);
        self.bounds
    }

    /// Bounds from the last [`refresh_bounds`](Self::refresh_bounds).
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }
}
