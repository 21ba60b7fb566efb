//! Sphere geometry: octahedron-based geodesic spheres, cube-face chunk patches,
//! triangle normals and bounding boxes.

mod bounds;
mod chunk_coord;
mod cube_face;
mod face_patch;
mod geodesic;
mod mesh;

pub use bounds::Aabb;
pub use chunk_coord::ChunkCoord;
pub use cube_face::CubeFace;
pub use face_patch::{PROXY_RESOLUTION, generate_patch, patch_index_count};
pub use geodesic::{GeodesicSphereBuilder, geodesic_triangle_count, geodesic_vertex_count, slerp};
pub use mesh::{TriangleMesh, recalculate_normals};
