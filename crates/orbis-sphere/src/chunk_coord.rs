//! Addressing of chunks on the six-face chunk grid.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::CubeFace;

/// Location of one chunk: a cube face plus the chunk's column (`x`) and row
/// (`y`) within that face's `chunk_resolution × chunk_resolution` grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// Cube face the chunk lies on.
    pub face: CubeFace,
    /// Column index along the face's first axis.
    pub x: u32,
    /// Row index along the face's second axis.
    pub y: u32,
}

impl ChunkCoord {
    /// Create a chunk coordinate.
    pub fn new(face: CubeFace, x: u32, y: u32) -> Self {
        Self { face, x, y }
    }

    /// Number of chunks on the whole planet for a grid of `chunk_resolution`.
    pub fn grid_len(chunk_resolution: u32) -> usize {
        6 * (chunk_resolution as usize).pow(2)
    }

    /// Flat index of this chunk: `face·cr² + x·cr + y`.
    pub fn flat_index(&self, chunk_resolution: u32) -> usize {
        let cr = chunk_resolution as usize;
        self.face.index() * cr * cr + self.x as usize * cr + self.y as usize
    }

    /// Inverse of [`flat_index`](Self::flat_index).
    pub fn from_flat_index(index: usize, chunk_resolution: u32) -> Option<Self> {
        let cr = chunk_resolution as usize;
        if cr == 0 {
            return None;
        }
        let face = CubeFace::from_index(index / (cr * cr))?;
        let within = index % (cr * cr);
        Some(Self::new(face, (within / cr) as u32, (within % cr) as u32))
    }

    /// Iterate every chunk of the grid in flat-index order.
    pub fn iter_grid(chunk_resolution: u32) -> impl Iterator<Item = ChunkCoord> {
        CubeFace::ALL.into_iter().flat_map(move |face| {
            (0..chunk_resolution)
                .flat_map(move |x| (0..chunk_resolution).map(move |y| ChunkCoord::new(face, x, y)))
        })
    }

    /// Lower corner of this chunk in face UV space, where the whole face spans
    /// `[-0.5, 0.5]²`.
    pub fn uv_offset(&self, chunk_resolution: u32) -> Vec2 {
        let uv_step = 1.0 / chunk_resolution as f32;
        Vec2::new(
            -0.5 + self.x as f32 * uv_step,
            -0.5 + self.y as f32 * uv_step,
        )
    }
}
