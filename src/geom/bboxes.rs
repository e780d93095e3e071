use crate::geom::point::Point;
use crate::geom::EPS;

/// Checks whether a point is inside the bounding box holding all points `pts`.
pub fn is_point_inside_bbox(ptest: Point, pts: &[Point]) -> bool {
    let (pmin, pmax) = bounding_box(pts);
    !(ptest.x < pmin.x - EPS
        || ptest.y < pmin.y - EPS
        || ptest.z < pmin.z - EPS
        || ptest.x > pmax.x + EPS
        || ptest.y > pmax.y + EPS
        || ptest.z > pmax.z + EPS)
}

/// Returns the min and max corners of the bounding box of `pts`.
///
/// # Panics
/// Panics when `pts` is empty.
pub fn bounding_box(pts: &[Point]) -> (Point, Point) {
    assert!(!pts.is_empty(), "bounding_box() requires at least one point");

    let mut pmin = pts[0];
    let mut pmax = pts[0];
    for p in pts.iter().skip(1) {
        pmin.x = pmin.x.min(p.x);
        pmin.y = pmin.y.min(p.y);
        pmin.z = pmin.z.min(p.z);
        pmax.x = pmax.x.max(p.x);
        pmax.y = pmax.y.max(p.y);
        pmax.z = pmax.z.max(p.z);
    }

    (pmin, pmax)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let pts = vec![
            Point::new(0., 1., 2.),
            Point::new(-1., 5., 0.),
            Point::new(3., 0., 1.),
        ];
        let (pmin, pmax) = bounding_box(&pts);
        assert!(pmin.is_close(&Point::new(-1., 0., 0.)));
        assert!(pmax.is_close(&Point::new(3., 5., 2.)));
    }

    #[test]
    fn test_is_point_inside_bbox() {
        let pts = vec![Point::new(0., 0., 0.), Point::new(1., 1., 1.)];
        assert!(is_point_inside_bbox(Point::new(0.5, 0.5, 0.5), &pts));
        assert!(is_point_inside_bbox(Point::new(1., 1., 1.), &pts));
        assert!(!is_point_inside_bbox(Point::new(1.5, 0.5, 0.5), &pts));
    }
}
