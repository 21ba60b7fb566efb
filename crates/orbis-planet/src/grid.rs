//! The six-face chunk grid.

use orbis_sphere::ChunkCoord;
use tracing::info;

use crate::Chunk;

/// All `6 × chunk_resolution²` chunks of a planet in flat-index order.
#[derive(Clone, Debug, Default)]
pub struct ChunkGrid {
    chunk_resolution: u32,
    chunks: Vec<Chunk>,
}

impl ChunkGrid {
    /// Create every chunk of a `chunk_resolution` grid with empty caches.
    pub fn build(chunk_resolution: u32) -> Self {
        let chunks: Vec<Chunk> = ChunkCoord::iter_grid(chunk_resolution)
            .map(|coord| Chunk::new(coord, chunk_resolution))
            .collect();
        info!(chunk_resolution, chunks = chunks.len(), "Built chunk grid");
        Self {
            chunk_resolution,
            chunks,
        }
    }

    pub fn chunk_resolution(&self) -> u32 {
        self.chunk_resolution
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// True when the grid holds exactly the chunks of `chunk_resolution`.
    pub fn matches(&self, chunk_resolution: u32) -> bool {
        self.chunk_resolution == chunk_resolution
            && self.chunks.len() == ChunkCoord::grid_len(chunk_resolution)
    }

    pub fn get(&self, coord: &ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(self.index_of(coord)?)
    }

    pub fn get_mut(&mut self, coord: &ChunkCoord) -> Option<&mut Chunk> {
        let index = self.index_of(coord)?;
        self.chunks.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Chunk> {
        self.chunks.iter_mut()
    }

    fn index_of(&self, coord: &ChunkCoord) -> Option<usize> {
        if coord.x >= self.chunk_resolution || coord.y >= self.chunk_resolution {
            return None;
        }
        Some(coord.flat_index(self.chunk_resolution))
    }
}
