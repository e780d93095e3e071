//! Triangle mesh representation used for intersection queries.

use crate::geom::triangles::{triangle_area, triangle_centroid, TriangleIndex};
use crate::{Point, Polygon, Vector};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Faces below this area are considered degenerate.
const MIN_FACE_AREA: f64 = 1e-12;

/// A triangle mesh defined by vertices and face indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriMesh {
    pub vertices: Vec<Point>,
    pub faces: Vec<TriangleIndex>,
}

impl TriMesh {
    pub fn new(vertices: Vec<Point>, faces: Vec<TriangleIndex>) -> Self {
        Self { vertices, faces }
    }

    /// Triangulates a polygon into a standalone mesh.
    pub fn from_polygon(polygon: &Polygon) -> Result<Self> {
        let faces = polygon.triangulate()?;
        Ok(Self {
            vertices: polygon.vertices().to_vec(),
            faces,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Appends another mesh, offsetting its face indices.
    pub fn append(&mut self, other: &TriMesh) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|t| TriangleIndex(t.0 + offset, t.1 + offset, t.2 + offset)),
        );
    }

    /// Joins several meshes into one.
    pub fn join(meshes: &[TriMesh]) -> TriMesh {
        let mut joined = TriMesh::default();
        for m in meshes {
            joined.append(m);
        }
        joined
    }

    /// Corner points of face `i`.
    pub fn face_points(&self, i: usize) -> (Point, Point, Point) {
        let t = &self.faces[i];
        (self.vertices[t.0], self.vertices[t.1], self.vertices[t.2])
    }

    pub fn face_area(&self, i: usize) -> f64 {
        let (p0, p1, p2) = self.face_points(i);
        triangle_area(p0, p1, p2)
    }

    pub fn face_centroid(&self, i: usize) -> Point {
        let (p0, p1, p2) = self.face_points(i);
        triangle_centroid(p0, p1, p2)
    }

    /// Unit normal of face `i`. Fails for degenerate faces.
    pub fn face_normal(&self, i: usize) -> Result<Vector> {
        let (p0, p1, p2) = self.face_points(i);
        Vector::normal(p0, p1, p2)
    }

    /// Removes malformed faces (out-of-range indices, degenerate area).
    ///
    /// Returns the number of removed faces. Surviving face order is
    /// preserved.
    pub fn sanitize(&mut self) -> usize {
        let num_vertices = self.vertices.len();
        let vertices = &self.vertices;
        let before = self.faces.len();
        self.faces.retain(|t| {
            if t.0 >= num_vertices || t.1 >= num_vertices || t.2 >= num_vertices {
                return false;
            }
            triangle_area(vertices[t.0], vertices[t.1], vertices[t.2]) > MIN_FACE_AREA
        });
        before - self.faces.len()
    }

    /// Total surface area.
    pub fn area(&self) -> f64 {
        (0..self.faces.len()).map(|i| self.face_area(i)).sum()
    }
}
