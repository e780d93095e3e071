//! Context obstruction geometry.
//!
//! Joins all blocker geometry into a single intersection-ready mesh. No
//! watertightness is required; the mesh only has to answer ray/segment
//! queries. Analysis surfaces themselves are handled separately (as the
//! self-shading mesh), mirroring the two-mesh test order in the engine.

use crate::geom::mesh::TriMesh;
use crate::Polygon;

/// Opaque blocker geometry flattened into one triangulated mesh.
#[derive(Debug, Clone, Default)]
pub struct ContextMesh {
    pub mesh: TriMesh,
    /// Blocker polygons/faces dropped while building the mesh.
    pub skipped: usize,
}

impl ContextMesh {
    /// Builds the context from planar blocker polygons.
    ///
    /// Polygons that cannot be triangulated are skipped and counted; an
    /// empty blocker list produces an empty (never-blocking) context.
    pub fn from_polygons(blockers: &[Polygon]) -> Self {
        let mut mesh = TriMesh::default();
        let mut skipped = 0;
        for polygon in blockers {
            match TriMesh::from_polygon(polygon) {
                Ok(m) => mesh.append(&m),
                Err(_) => skipped += 1,
            }
        }
        skipped += mesh.sanitize();
        Self { mesh, skipped }
    }

    /// Builds the context from already-triangulated meshes.
    pub fn from_meshes(blockers: &[TriMesh]) -> Self {
        let mut mesh = TriMesh::join(blockers);
        let skipped = mesh.sanitize();
        Self { mesh, skipped }
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}
