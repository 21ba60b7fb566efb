//! Deterministic seed utilities.
//!
//! Seeds become noise-space offsets for the field evaluators and per-chunk
//! RNG streams for vegetation sampling.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::Vec3;
use orbis_sphere::ChunkCoord;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Noise-space offset for a seed: three consecutive uniform draws in `[0, 1)`
/// from a generator seeded with `seed`.
pub fn seed_offset(seed: u64) -> Vec3 {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let x = rng.random::<f32>();
    let y = rng.random::<f32>();
    let z = rng.random::<f32>();
    Vec3::new(x, y, z)
}

/// Derive a u64 seed for a chunk from the planet seed and the chunk coordinate.
pub fn derive_chunk_seed(planet_seed: u64, coord: &ChunkCoord) -> u64 {
    let mut hasher = DefaultHasher::new();
    planet_seed.hash(&mut hasher);
    coord.hash(&mut hasher);
    hasher.finish()
}

/// Deterministic RNG for one chunk.
pub fn chunk_rng(planet_seed: u64, coord: &ChunkCoord) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_chunk_seed(planet_seed, coord))
}
