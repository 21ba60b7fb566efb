//! The six faces of the chunked planet cube and their local frames.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The six faces of the cube that is inflated into the planet sphere.
///
/// Variants are listed in chunk-grid order: the face index of a chunk is the
/// discriminant of its face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum CubeFace {
    /// +Y face
    Up = 0,
    /// −Y face
    Down = 1,
    /// −X face
    Left = 2,
    /// +X face
    Right = 3,
    /// +Z face
    Forward = 4,
    /// −Z face
    Back = 5,
}

impl CubeFace {
    /// All six faces in chunk-grid order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Up,
        CubeFace::Down,
        CubeFace::Left,
        CubeFace::Right,
        CubeFace::Forward,
        CubeFace::Back,
    ];

    /// Face for a grid index in `0..6`.
    pub fn from_index(index: usize) -> Option<CubeFace> {
        Self::ALL.get(index).copied()
    }

    /// Position of this face in [`CubeFace::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The opposite face (e.g., `Up` → `Down`).
    #[must_use]
    pub fn opposite(self) -> CubeFace {
        match self {
            CubeFace::Up => CubeFace::Down,
            CubeFace::Down => CubeFace::Up,
            CubeFace::Left => CubeFace::Right,
            CubeFace::Right => CubeFace::Left,
            CubeFace::Forward => CubeFace::Back,
            CubeFace::Back => CubeFace::Forward,
        }
    }

    /// Outward-pointing unit normal ("local up") of this face.
    #[must_use]
    pub fn local_up(self) -> Vec3 {
        match self {
            CubeFace::Up => Vec3::Y,
            CubeFace::Down => Vec3::NEG_Y,
            CubeFace::Left => Vec3::NEG_X,
            CubeFace::Right => Vec3::X,
            CubeFace::Forward => Vec3::Z,
            CubeFace::Back => Vec3::NEG_Z,
        }
    }

    /// First patch axis: the components of [`local_up`](Self::local_up)
    /// rotated as `(up.y, up.z, up.x)`.
    ///
    /// Chunk UV offsets are calibrated against this exact derivation, so it
    /// must not be replaced with an orthonormalised frame.
    #[must_use]
    pub fn axis_a(self) -> Vec3 {
        let up = self.local_up();
        Vec3::new(up.y, up.z, up.x)
    }

    /// Second patch axis: `local_up × axis_a`.
    #[must_use]
    pub fn axis_b(self) -> Vec3 {
        self.local_up().cross(self.axis_a())
    }
}
