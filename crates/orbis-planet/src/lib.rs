//! Chunked planet assembly: the six-face chunk grid with per-resolution mesh
//! caches, full and incremental generation passes, and the non-chunked
//! geodesic planet body.

mod assembler;
mod chunk;
mod context;
mod error;
mod grid;
mod settings;
mod simple;

pub use assembler::{GenerationStats, LodUpdateStats, PendingLodUpdate, Planet, ShadingData};
pub use chunk::{Chunk, MeshVariant};
pub use context::{Evaluators, GenerationContext, HeightRange};
pub use error::PlanetError;
pub use grid::ChunkGrid;
pub use settings::{PlanetConfig, PlanetSettings};
pub use simple::SimplePlanet;
