use crate::geom::triangles::{triangulate, TriangleIndex};
use crate::{Point, Vector};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// A named planar polygon.
///
/// Vertices must be ordered counterclockwise with respect to the front side,
/// i.e. the unit normal points away from the front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub name: String,
    pts: Vec<Point>,
    /// Unit normal vector.
    pub vn: Vector,
}

impl Polygon {
    /// Creates a new polygon from vertices.
    ///
    /// If `vn` is `None`, the normal is computed with Newell's method from
    /// the vertex loop. Fails for fewer than 3 vertices or a degenerate
    /// (zero-area) loop.
    pub fn new(name: &str, pts: Vec<Point>, vn: Option<Vector>) -> Result<Self> {
        if pts.len() < 3 {
            return Err(anyhow!(
                "Polygon '{}' needs at least 3 vertices, got {}",
                name,
                pts.len()
            ));
        }
        let vn = match vn {
            Some(v) => v
                .normalize()
                .with_context(|| format!("Polygon '{name}': invalid normal"))?,
            None => newell_normal(&pts)
                .with_context(|| format!("Polygon '{name}': degenerate vertex loop"))?,
        };
        Ok(Self {
            name: name.to_string(),
            pts,
            vn,
        })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.pts
    }

    /// Planar area from the generalized shoelace formula.
    pub fn area(&self) -> f64 {
        cross_sum(&self.pts).length() / 2.0
    }

    /// Triangulates the polygon with ear clipping.
    pub fn triangulate(&self) -> Result<Vec<TriangleIndex>> {
        triangulate(&self.pts, self.vn)
            .with_context(|| format!("Polygon '{}' could not be triangulated", self.name))
    }

    /// Vertex centroid of the polygon.
    pub fn centroid(&self) -> Point {
        let n = self.pts.len() as f64;
        let mut c = Point::new(0., 0., 0.);
        for p in &self.pts {
            c.x += p.x / n;
            c.y += p.y / n;
            c.z += p.z / n;
        }
        c
    }
}

/// Sum of consecutive cross products around the vertex loop.
fn cross_sum(pts: &[Point]) -> Vector {
    let mut sum = Vector::new(0., 0., 0.);
    for i in 0..pts.len() {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        sum.dx += (a.y - b.y) * (a.z + b.z);
        sum.dy += (a.z - b.z) * (a.x + b.x);
        sum.dz += (a.x - b.x) * (a.y + b.y);
    }
    sum
}

/// Polygon normal from Newell's method.
fn newell_normal(pts: &[Point]) -> Result<Vector> {
    cross_sum(pts).normalize()
}
