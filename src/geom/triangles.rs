use crate::geom::bboxes::is_point_inside_bbox;
use crate::geom::{EPS, IsClose};
use crate::vecutils::{max, min};
use crate::{Point, Vector};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Type for holding vertex indices for a triangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriangleIndex(pub usize, pub usize, pub usize);

/// Area of the triangle `(p0, p1, p2)`.
pub fn triangle_area(p0: Point, p1: Point, p2: Point) -> f64 {
    (p1 - p0).cross(&(p2 - p0)).length() / 2.0
}

/// Centroid of the triangle `(p0, p1, p2)`.
pub fn triangle_centroid(p0: Point, p1: Point, p2: Point) -> Point {
    Point::new(
        (p0.x + p1.x + p2.x) / 3.0,
        (p0.y + p1.y + p2.y) / 3.0,
        (p0.z + p1.z + p2.z) / 3.0,
    )
}

/// Triangulates the polygon defined by points `pts` and unit normal `vn`
/// using ear clipping.
///
/// The points must be ordered counterclockwise with respect to the front
/// side (the side `vn` points away from). Works for non-convex polygons.
pub fn triangulate(pts: &[Point], vn: Vector) -> Result<Vec<TriangleIndex>> {
    if vn.length().is_close(0.) {
        return Err(anyhow!("Normal vector cannot have zero length"));
    }
    if pts.len() < 3 {
        return Err(anyhow!("Cannot triangulate fewer than 3 points"));
    }

    match clip_ears(pts, vn) {
        Some(triangles) => Ok(triangles),
        None => {
            // Retry with flipped winding, keeping the original indices.
            let flipped: Vec<Point> = pts.iter().rev().cloned().collect();
            let n = pts.len();
            match clip_ears(&flipped, vn) {
                Some(triangles) => Ok(triangles
                    .into_iter()
                    .map(|t| TriangleIndex(n - 1 - t.0, n - 1 - t.1, n - 1 - t.2))
                    .collect()),
                None => Err(anyhow!("Ear-clipping algorithm failed")),
            }
        }
    }
}

fn clip_ears(pts: &[Point], vn: Vector) -> Option<Vec<TriangleIndex>> {
    let mut vertices: Vec<usize> = (0..pts.len()).collect();
    let mut triangles: Vec<TriangleIndex> = Vec::with_capacity(pts.len() - 2);
    let mut pos: usize = 0;
    let mut num_fail: usize = 0;

    while vertices.len() > 2 {
        if num_fail > vertices.len() {
            return None; // No ear found in a full loop
        }
        if pos > vertices.len() - 1 {
            pos = 0;
        }

        let prev_pos = if pos > 0 { pos - 1 } else { vertices.len() - 1 };
        let next_pos = if pos < vertices.len() - 1 { pos + 1 } else { 0 };

        let prev_id = vertices[prev_pos];
        let curr_id = vertices[pos];
        let next_id = vertices[next_pos];

        if is_corner_convex(&pts[prev_id], &pts[curr_id], &pts[next_id], &vn) {
            // Check that no remaining vertex lies within this candidate ear.
            // Needed for non-convex polygons.
            let any_point_inside = vertices.iter().any(|&test_id| {
                test_id != prev_id
                    && test_id != curr_id
                    && test_id != next_id
                    && is_point_inside_triangle(
                        pts[test_id],
                        pts[prev_id],
                        pts[curr_id],
                        pts[next_id],
                    )
            });
            if !any_point_inside {
                triangles.push(TriangleIndex(prev_id, curr_id, next_id));
                vertices.remove(pos);
                num_fail = 0;
                continue;
            }
        }
        num_fail += 1;
        pos += 1;
    }

    Some(triangles)
}

/// Checks if the angle between p2->p1 and p2->p3 is less than 180 degrees.
///
/// It is done by comparing the polygon normal vector with the cross
/// product p2->p3 x p2->p1.
///
/// # Panics
/// It panics if the length of the normal vector vn is not 1.
pub fn is_corner_convex(p1: &Point, p2: &Point, p3: &Point, vn: &Vector) -> bool {
    assert!((vn.length() - 1.0).abs() < EPS);

    let v1: Vector = *p2 - *p1;
    let v2: Vector = *p3 - *p2;
    match v1.cross(&v2).normalize() {
        // If the corner normal matches the polygon normal, the corner is convex
        Ok(v1v2_n) => v1v2_n.is_close(vn),
        Err(_) => false, // Collinear points p1, p2, p3
    }
}

/// Tests if point `ptest` is inside the triangle `(p1, p2, p3)`.
///
/// Using the "same side technique" described at:
/// https://blackpawn.com/texts/pointinpoly/
/// This function does not test if the point is coplanar with the triangle.
pub fn is_point_inside_triangle(ptest: Point, p1: Point, p2: Point, p3: Point) -> bool {
    if !is_point_inside_bbox(ptest, &[p1, p2, p3]) {
        return false;
    }
    // Test if the point is at any of the three vertices
    if ptest.is_close(&p1) || ptest.is_close(&p2) || ptest.is_close(&p3) {
        return true;
    }
    // Test if it's at any of the edges
    for (pa, pb) in [(p1, p2), (p2, p3), (p3, p1)].iter() {
        if are_points_collinear(&[*pa, *pb, ptest]) {
            // ptest is collinear, but is it on the edge or outside the triangle?
            return !(ptest.x > max(&[pa.x, pb.x]) + EPS
                || ptest.y > max(&[pa.y, pb.y]) + EPS
                || ptest.z > max(&[pa.z, pb.z]) + EPS
                || ptest.x < min(&[pa.x, pb.x]) - EPS
                || ptest.y < min(&[pa.y, pb.y]) - EPS
                || ptest.z < min(&[pa.z, pb.z]) - EPS);
        }
    }

    // Test if ptest is inside
    let side1 = is_point_on_same_side(p1, p2, ptest, p3).unwrap_or(false);
    let side2 = is_point_on_same_side(p2, p3, ptest, p1).unwrap_or(false);
    let side3 = is_point_on_same_side(p3, p1, ptest, p2).unwrap_or(false);

    side1 && side2 && side3
}

/// Checks if all points lie on a single line.
pub fn are_points_collinear(pts: &[Point]) -> bool {
    if pts.len() < 3 {
        return true;
    }
    let v0 = pts[1] - pts[0];
    pts.iter()
        .skip(2)
        .all(|&p| v0.cross(&(p - pts[0])).length() < EPS)
}

/// Checks if `ptest` is on the same side of the line `(p1, p2)` as `pref`.
///
/// Returns `None` when `pref` lies on the line (no reference side exists).
fn is_point_on_same_side(p1: Point, p2: Point, ptest: Point, pref: Point) -> Option<bool> {
    let edge = p2 - p1;
    let cref = edge.cross(&(pref - p1));
    if cref.length() < EPS {
        return None;
    }
    let ctest = edge.cross(&(ptest - p1));
    Some(cref.dot(&ctest) >= 0.0)
}
