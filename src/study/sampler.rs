//! Surface sampling.
//!
//! Turns analysis surfaces into test points: each surface is triangulated,
//! faces are subdivided until they fit the requested cell size, and every
//! face yields a centroid, a unit normal, its planar area and a test point
//! offset along the normal (so rays never start on the surface itself).

use crate::geom::mesh::TriMesh;
use crate::geom::triangles::{triangle_area, triangle_centroid, TriangleIndex};
use crate::study::{RunWarnings, TestPoint};
use crate::{Point, Polygon, Vector};
use anyhow::{bail, Result};

/// Subdivision safety cap; at depth 12 a face edge has shrunk 4096-fold.
const MAX_SUBDIV_DEPTH: u32 = 12;

/// Result of sampling a set of analysis surfaces.
#[derive(Debug, Clone)]
pub struct SampledSurface {
    /// One test point per mesh face, in face order.
    pub points: Vec<TestPoint>,
    /// The sampled analysis mesh (used for self-shading).
    pub mesh: TriMesh,
    /// Surfaces/faces dropped during sampling.
    pub warnings: RunWarnings,
}

/// Samples planar polygons into test points.
///
/// Every polygon is triangulated and subdivided until no face edge exceeds
/// `cell_size`; each face becomes one [`TestPoint`] whose position is
/// `centroid + normal * offset`. Unmeshable polygons and degenerate faces
/// are skipped and counted; zero usable faces is an error.
pub fn sample_polygons(
    polygons: &[Polygon],
    cell_size: f64,
    offset: f64,
) -> Result<SampledSurface> {
    if polygons.is_empty() {
        bail!("No analysis surfaces provided");
    }
    if cell_size <= 0.0 {
        bail!("Cell size must be positive, got {cell_size}");
    }

    let mut mesh = TriMesh::default();
    let mut warnings = RunWarnings::default();

    for polygon in polygons {
        let faces = match polygon.triangulate() {
            Ok(f) => f,
            Err(_) => {
                warnings.skipped_faces += 1;
                continue;
            }
        };
        let vertices = polygon.vertices();
        for t in &faces {
            subdivide_into(
                &mut mesh,
                vertices[t.0],
                vertices[t.1],
                vertices[t.2],
                cell_size,
                0,
            );
        }
    }

    finish_sampling(mesh, offset, warnings)
}

/// Samples a pre-triangulated mesh: one test point per existing face,
/// without re-meshing.
pub fn sample_mesh(mesh: &TriMesh, offset: f64) -> Result<SampledSurface> {
    finish_sampling(mesh.clone(), offset, RunWarnings::default())
}

fn finish_sampling(
    mut mesh: TriMesh,
    offset: f64,
    mut warnings: RunWarnings,
) -> Result<SampledSurface> {
    warnings.skipped_faces += mesh.sanitize();

    let mut points = Vec::with_capacity(mesh.face_count());
    let mut kept_faces: Vec<TriangleIndex> = Vec::with_capacity(mesh.face_count());

    for i in 0..mesh.face_count() {
        let (p0, p1, p2) = mesh.face_points(i);
        let normal = match Vector::normal(p0, p1, p2) {
            Ok(n) => n,
            Err(_) => {
                warnings.skipped_faces += 1;
                continue;
            }
        };
        let area = triangle_area(p0, p1, p2);
        let centroid = triangle_centroid(p0, p1, p2);
        points.push(TestPoint {
            position: centroid + normal * offset,
            normal,
            area,
            source_face: kept_faces.len(),
        });
        kept_faces.push(mesh.faces[i].clone());
    }
    mesh.faces = kept_faces;

    if points.is_empty() {
        bail!("No usable faces in the analysis surfaces");
    }

    Ok(SampledSurface {
        points,
        mesh,
        warnings,
    })
}

/// Recursively splits a triangle at edge midpoints until its longest edge
/// fits within `cell_size`, then emits it into the mesh.
fn subdivide_into(
    mesh: &mut TriMesh,
    p0: Point,
    p1: Point,
    p2: Point,
    cell_size: f64,
    depth: u32,
) {
    let longest = (p1 - p0)
        .length()
        .max((p2 - p1).length())
        .max((p0 - p2).length());

    if longest <= cell_size || depth >= MAX_SUBDIV_DEPTH {
        let base = mesh.vertices.len();
        mesh.vertices.extend_from_slice(&[p0, p1, p2]);
        mesh.faces.push(TriangleIndex(base, base + 1, base + 2));
        return;
    }

    let m01 = midpoint(p0, p1);
    let m12 = midpoint(p1, p2);
    let m20 = midpoint(p2, p0);

    subdivide_into(mesh, p0, m01, m20, cell_size, depth + 1);
    subdivide_into(mesh, m01, p1, m12, cell_size, depth + 1);
    subdivide_into(mesh, m20, m12, p2, cell_size, depth + 1);
    subdivide_into(mesh, m01, m12, m20, cell_size, depth + 1);
}

fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2., (a.y + b.y) / 2., (a.z + b.z) / 2.)
}
