//! Indexed triangle mesh buffers and normal recomputation.

use glam::Vec3;

/// An indexed triangle mesh: one position per vertex, three indices per triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Triangle indices (3 per triangle).
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Create a mesh from raw buffers.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Per-vertex normals for the current positions.
    pub fn normals(&self) -> Vec<Vec3> {
        recalculate_normals(&self.positions, &self.indices)
    }

    /// Position buffer as raw bytes for upload.
    pub fn positions_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Index buffer as raw bytes for upload.
    pub fn indices_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Compute smooth per-vertex normals from triangle topology.
///
/// Each triangle contributes its area-weighted face normal to its three
/// vertices; the sums are normalised. Vertices referenced by no triangle (or
/// only by degenerate ones) get a zero normal.
pub fn recalculate_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face_normal = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face_normal;
        normals[b] += face_normal;
        normals[c] += face_normal;
    }
    for n in &mut normals {
        *n = n.normalize_or_zero();
    }
    normals
}
