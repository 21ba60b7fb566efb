//! Per-chunk patch meshes on the cube faces.
//!
//! A chunk covers a `1/chunk_resolution` square of its face in UV space. Its
//! patch is a regular `resolution × resolution` grid over that square, pushed
//! onto the cube face through the face frame and normalised onto the unit
//! sphere. Neighbouring chunks at different resolutions do not share edge
//! vertices, so seams between them are not watertight.

use glam::Vec2;

use crate::{ChunkCoord, TriangleMesh};

/// Resolution of the coarse proxy patch used for chunk bounds.
pub const PROXY_RESOLUTION: u32 = 8;

/// Number of indices in a patch of the given resolution.
pub fn patch_index_count(resolution: u32) -> usize {
    let cells = (resolution as usize).saturating_sub(1);
    cells * cells * 6
}

/// Generate the unit-sphere patch mesh of one chunk.
///
/// Vertex `x + y·resolution` sits at UV `offset + (x, y)·step`, with
/// `step = (1/chunk_resolution)/(resolution-1)`. Each grid cell emits the
/// triangles `(i, i+res+1, i+res)` and `(i, i+1, i+res+1)`.
///
/// `resolution` below 2 yields an empty mesh.
pub fn generate_patch(coord: ChunkCoord, chunk_resolution: u32, resolution: u32) -> TriangleMesh {
    if resolution < 2 || chunk_resolution == 0 {
        return TriangleMesh::default();
    }

    let uv_step = 1.0 / chunk_resolution as f32;
    let step = uv_step / (resolution - 1) as f32;
    let offset = coord.uv_offset(chunk_resolution);
    let local_up = coord.face.local_up();
    let axis_a = coord.face.axis_a();
    let axis_b = coord.face.axis_b();

    let res = resolution as usize;
    let mut positions = Vec::with_capacity(res * res);
    let mut indices = Vec::with_capacity(patch_index_count(resolution));

    for y in 0..res {
        for x in 0..res {
            let i = (x + y * res) as u32;
            let uv = offset + Vec2::new(x as f32 * step, y as f32 * step);
            let point_on_cube = local_up + uv.x * 2.0 * axis_a + uv.y * 2.0 * axis_b;
            positions.push(point_on_cube.normalize());

            if x != res - 1 && y != res - 1 {
                let r = resolution;
                indices.extend_from_slice(&[i, i + r + 1, i + r, i, i + 1, i + r + 1]);
            }
        }
    }

    TriangleMesh::new(positions, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CubeFace;

    #[test]
    fn test_patch_counts() {
        let coord = ChunkCoord::new(CubeFace::Up, 0, 0);
        let mesh = generate_patch(coord, 2, 5);
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.triangle_count(), 2 * 4 * 4);
        assert_eq!(mesh.indices.len(), patch_index_count(5));
    }

    #[test]
    fn test_degenerate_resolution_is_empty() {
        let coord = ChunkCoord::new(CubeFace::Up, 0, 0);
        assert_eq!(generate_patch(coord, 2, 1), TriangleMesh::default());
        assert_eq!(generate_patch(coord, 0, 8), TriangleMesh::default());
    }

    #[test]
    fn test_patch_vertices_on_unit_sphere_and_face() {
        for face in CubeFace::ALL {
            let mesh = generate_patch(ChunkCoord::new(face, 1, 2), 3, 6);
            for p in &mesh.positions {
                assert!((p.length() - 1.0).abs() < 1e-5);
                assert!(p.dot(face.local_up()) > 0.0, "{face:?} patch vertex {p:?} off face");
            }
        }
    }

    #[test]
    fn test_patch_triangles_wind_outward() {
        for face in CubeFace::ALL {
            let mesh = generate_patch(ChunkCoord::new(face, 0, 1), 2, 4);
            for [a, b, c] in mesh.triangles() {
                let (pa, pb, pc) = (
                    mesh.positions[a as usize],
                    mesh.positions[b as usize],
                    mesh.positions[c as usize],
                );
                let normal = (pb - pa).cross(pc - pa);
                assert!(normal.dot(pa + pb + pc) > 0.0, "{face:?} triangle winds inward");
            }
        }
    }

    #[test]
    fn test_adjacent_chunks_share_boundary_at_equal_resolution() {
        let cr = 2;
        let res = 5;
        let left = generate_patch(ChunkCoord::new(CubeFace::Right, 0, 0), cr, res);
        let right = generate_patch(ChunkCoord::new(CubeFace::Right, 1, 0), cr, res);
        for y in 0..res as usize {
            let a = left.positions[(res as usize - 1) + y * res as usize];
            let b = right.positions[y * res as usize];
            assert!((a - b).length() < 1e-5, "seam mismatch on row {y}");
        }
    }

    #[test]
    fn test_full_grid_covers_whole_sphere() {
        // The chunks of all faces together reach every axis direction.
        let cr = 1;
        for face in CubeFace::ALL {
            let mesh = generate_patch(ChunkCoord::new(face, 0, 0), cr, 3);
            let center = mesh.positions[4];
            assert!((center - face.local_up()).length() < 1e-6);
        }
    }
}
