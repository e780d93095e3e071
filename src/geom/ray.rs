//! Ray casting infrastructure.
//!
//! Rays and bounded segments are tested against triangle meshes for
//! occlusion queries. Only the presence of a hit matters to the callers,
//! so all mesh queries are any-hit and early-exit.

use crate::geom::mesh::TriMesh;
use crate::{Point, Vector};
use anyhow::{Context, Result};

/// Intersection tolerance. Hits with a smaller ray parameter are ignored
/// to avoid self-intersection at the origin.
const RAY_EPS: f64 = 1e-9;

/// A ray defined by an origin point and a unit direction vector.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point,
    pub direction: Vector,
}

impl Ray {
    /// Creates a new ray. The direction is normalized; fails for a
    /// zero-length direction.
    pub fn new(origin: Point, direction: Vector) -> Result<Self> {
        let direction = direction
            .normalize()
            .context("Ray direction cannot have zero length")?;
        Ok(Self { origin, direction })
    }

    /// Creates a ray from two points (origin towards target).
    pub fn from_points(origin: Point, target: Point) -> Result<Self> {
        Self::new(origin, target - origin)
    }

    /// Returns the point along the ray at parameter t.
    pub fn point_at(&self, t: f64) -> Point {
        self.origin + self.direction * t
    }

    /// Checks whether the ray hits any face of the mesh.
    pub fn hits_mesh(&self, mesh: &TriMesh) -> bool {
        mesh.faces.iter().any(|t| {
            intersect_triangle(
                self.origin,
                self.direction,
                mesh.vertices[t.0],
                mesh.vertices[t.1],
                mesh.vertices[t.2],
                RAY_EPS,
                f64::INFINITY,
            )
            .is_some()
        })
    }
}

/// Checks whether the open segment between `beg` and `end` is blocked by
/// any face of the mesh.
///
/// Hits at the segment end points themselves are ignored so a target
/// sitting exactly on a surface does not occlude itself.
pub fn segment_hits_mesh(beg: Point, end: Point, mesh: &TriMesh) -> bool {
    let dir = end - beg;
    let dist = dir.length();
    let dir = match dir.normalize() {
        Ok(d) => d,
        Err(_) => return false, // Zero-length segment blocks nothing
    };
    mesh.faces.iter().any(|t| {
        intersect_triangle(
            beg,
            dir,
            mesh.vertices[t.0],
            mesh.vertices[t.1],
            mesh.vertices[t.2],
            RAY_EPS,
            dist - RAY_EPS,
        )
        .is_some()
    })
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the ray parameter `t` when the ray `origin + t * direction`
/// crosses the triangle `(v0, v1, v2)` with `t` in `(t_min, t_max)`.
/// The direction must be a unit vector so `t` is a distance.
pub fn intersect_triangle(
    origin: Point,
    direction: Vector,
    v0: Point,
    v1: Point,
    v2: Point,
    t_min: f64,
    t_max: f64,
) -> Option<f64> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let pvec = direction.cross(&e2);
    let det = e1.dot(&pvec);
    if det.abs() < 1e-12 {
        return None; // Ray parallel to the triangle plane
    }
    let inv_det = 1.0 / det;
    let tvec = origin - v0;
    let u = tvec.dot(&pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(&e1);
    let v = direction.dot(&qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(&qvec) * inv_det;
    if t < t_min || t > t_max {
        return None;
    }
    Some(t)
}
