//! Geodesic sphere construction by spherical subdivision of an octahedron.
//!
//! The six octahedron vertices are the unit axes. Each of the 12 edges is
//! split into `resolution + 1` arcs by spherical interpolation, and each of the
//! 8 faces is filled row by row between its two rising edges. Edge vertices are
//! shared between neighbouring faces, so nothing is duplicated along seams.

use glam::Vec3;

use crate::TriangleMesh;

/// The six octahedron vertices: up, left, back, right, forward, down.
const BASE_VERTICES: [Vec3; 6] = [
    Vec3::Y,
    Vec3::NEG_X,
    Vec3::NEG_Z,
    Vec3::X,
    Vec3::Z,
    Vec3::NEG_Y,
];

/// Start/end base vertex of each of the 12 octahedron edges.
const EDGE_VERTEX_PAIRS: [(usize, usize); 12] = [
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (1, 2),
    (2, 3),
    (3, 4),
    (4, 1),
    (5, 1),
    (5, 2),
    (5, 3),
    (5, 4),
];

/// Each face as (left edge, right edge, closing edge). The left and right
/// edges start at the face's apex; the closing edge runs from the left edge's
/// end to the right edge's end.
const FACE_EDGES: [(usize, usize, usize); 8] = [
    (0, 1, 4),
    (1, 2, 5),
    (2, 3, 6),
    (3, 0, 7),
    (8, 9, 4),
    (9, 10, 5),
    (10, 11, 6),
    (11, 8, 7),
];

/// Faces from this index on hang below the equator and are wound in reverse.
const FIRST_LOWER_FACE: usize = 4;

/// Number of vertices of a geodesic sphere of the given resolution.
pub fn geodesic_vertex_count(resolution: u32) -> usize {
    let r = resolution as usize;
    6 + 12 * r + 4 * r * r.saturating_sub(1)
}

/// Number of triangles of a geodesic sphere of the given resolution.
pub fn geodesic_triangle_count(resolution: u32) -> usize {
    let r = resolution as usize;
    8 * (r + 1) * (r + 1)
}

/// Spherical linear interpolation between two directions.
///
/// Interpolates both the angle and the length, so unit inputs yield unit
/// outputs. Nearly parallel inputs fall back to linear interpolation.
pub fn slerp(start: Vec3, end: Vec3, t: f32) -> Vec3 {
    let start_len = start.length();
    let end_len = end.length();
    let len = start_len + (end_len - start_len) * t;
    let (a, b) = (start / start_len, end / end_len);
    let cos_theta = a.dot(b).clamp(-1.0, 1.0);
    let theta = cos_theta.acos();
    let sin_theta = theta.sin();
    if sin_theta.abs() < 1e-6 {
        return a.lerp(b, t).normalize_or_zero() * len;
    }
    let wa = ((1.0 - t) * theta).sin() / sin_theta;
    let wb = (t * theta).sin() / sin_theta;
    (a * wa + b * wb) * len
}

/// An ordered run of vertex indices from one base vertex to another,
/// endpoints included.
#[derive(Clone, Debug)]
struct Edge {
    vertex_indices: Vec<u32>,
}

/// Builds geodesic spheres from a subdivided octahedron.
///
/// Builds are deterministic: the same resolution always produces bit-identical
/// buffers.
#[derive(Clone, Debug, Default)]
pub struct GeodesicSphereBuilder {
    resolution: u32,
    vertices: Vec<Vec3>,
    triangles: Vec<u32>,
}

impl GeodesicSphereBuilder {
    /// Create a builder with empty scratch buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a unit geodesic sphere. `resolution` is the number of interior
    /// points inserted along every octahedron edge.
    pub fn build(&mut self, resolution: u32) -> TriangleMesh {
        self.resolution = resolution;
        self.vertices = Vec::with_capacity(geodesic_vertex_count(resolution));
        self.triangles = Vec::with_capacity(geodesic_triangle_count(resolution) * 3);
        self.vertices.extend_from_slice(&BASE_VERTICES);

        let edges = self.subdivide_edges();
        for (face_index, &(left, right, bottom)) in FACE_EDGES.iter().enumerate() {
            let reverse = face_index >= FIRST_LOWER_FACE;
            let face_vertices = self.subdivide_face(&edges[left], &edges[right], &edges[bottom]);
            self.triangulate_face(&face_vertices, reverse);
        }

        TriangleMesh::new(
            std::mem::take(&mut self.vertices),
            std::mem::take(&mut self.triangles),
        )
    }

    fn push_vertex(&mut self, vertex: Vec3) -> u32 {
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }

    fn subdivide_edges(&mut self) -> Vec<Edge> {
        let resolution = self.resolution as usize;
        let mut edges = Vec::with_capacity(EDGE_VERTEX_PAIRS.len());
        for &(start, end) in &EDGE_VERTEX_PAIRS {
            let (start_vertex, end_vertex) = (self.vertices[start], self.vertices[end]);
            let mut vertex_indices = Vec::with_capacity(resolution + 2);
            vertex_indices.push(start as u32);
            for division in 0..resolution {
                let t = (division as f32 + 1.0) / (resolution as f32 + 1.0);
                let index = self.push_vertex(slerp(start_vertex, end_vertex, t));
                vertex_indices.push(index);
            }
            vertex_indices.push(end as u32);
            edges.push(Edge { vertex_indices });
        }
        edges
    }

    /// Collect a face's vertex indices row by row: the apex, then each interior
    /// row (left edge point, slerped inner points, right edge point), then the
    /// closing edge.
    fn subdivide_face(&mut self, left: &Edge, right: &Edge, bottom: &Edge) -> Vec<u32> {
        let points_in_edge = self.resolution as usize + 2;
        let mut face_vertices = Vec::with_capacity(points_in_edge * (points_in_edge + 1) / 2);
        face_vertices.push(left.vertex_indices[0]);

        for row in 1..points_in_edge - 1 {
            face_vertices.push(left.vertex_indices[row]);
            let left_vertex = self.vertices[left.vertex_indices[row] as usize];
            let right_vertex = self.vertices[right.vertex_indices[row] as usize];
            let inner_points = row - 1;
            for j in 0..inner_points {
                let t = (j as f32 + 1.0) / (inner_points as f32 + 1.0);
                let index = self.push_vertex(slerp(left_vertex, right_vertex, t));
                face_vertices.push(index);
            }
            face_vertices.push(right.vertex_indices[row]);
        }

        face_vertices.extend_from_slice(&bottom.vertex_indices);
        face_vertices
    }

    fn triangulate_face(&mut self, face_vertices: &[u32], reverse: bool) {
        let rows = self.resolution as usize + 1;
        for row in 0..rows {
            let mut top_vertex = ((row + 1) * (row + 1) - row - 1) / 2;
            let mut bottom_vertex = ((row + 2) * (row + 2) - row - 2) / 2;

            for column in 0..(2 * row + 1) {
                let (v0, v1, v2) = if column % 2 == 0 {
                    let tri = (top_vertex, bottom_vertex + 1, bottom_vertex);
                    top_vertex += 1;
                    bottom_vertex += 1;
                    tri
                } else {
                    (top_vertex, bottom_vertex, top_vertex - 1)
                };

                let (v1, v2) = if reverse { (v2, v1) } else { (v1, v2) };
                self.triangles.extend_from_slice(&[
                    face_vertices[v0],
                    face_vertices[v1],
                    face_vertices[v2],
                ]);
            }
        }
    }
}
