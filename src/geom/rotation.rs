//! Axis-angle rotation of direction vectors.
//!
//! Used by the direction-set model to rotate a whole set of directions
//! (sky patches, sun vectors) by the north offset as one group.

use crate::geom::IsClose;
use crate::Vector;
use ndarray as nd;

/// Calculates the rotation matrix for a unit axis `u` and angle `phi` (radians).
///
/// Rodrigues form: `R = I + sin(phi) * W + 2 * sin^2(phi/2) * W^2`,
/// where `W` is the cross-product matrix of `u`.
/// Reference: https://en.wikipedia.org/wiki/Rodrigues%27_rotation_formula
///
/// # Panics
/// Panics if `u` is not a unit vector.
pub fn rotation_matrix(u: &Vector, phi: f64) -> nd::Array2<f64> {
    if !u.length().is_close(1.) {
        panic!("rotation_matrix() requires u to be a unit vector");
    }

    let w: nd::Array2<f64> = nd::arr2(&[[0., -u.dz, u.dy], [u.dz, 0., -u.dx], [-u.dy, u.dx, 0.]]);

    nd::Array::eye(3) + phi.sin() * &w + (2. * (phi / 2.).sin().powi(2)) * w.dot(&w)
}

/// Rotates direction vectors using the rotation matrix `rot`.
pub fn rotate_vectors(vecs: &[Vector], rot: &nd::Array2<f64>) -> Vec<Vector> {
    vecs.iter()
        .map(|v| {
            let col = rot.dot(&nd::arr1(&[v.dx, v.dy, v.dz]));
            Vector::new(col[0], col[1], col[2])
        })
        .collect()
}

/// Rotates direction vectors around the unit axis `u` by angle `phi` (radians).
///
/// Returns the input unchanged when the angle is (close to) zero.
pub fn rotate_vectors_around_axis(vecs: &[Vector], u: &Vector, phi: f64) -> Vec<Vector> {
    if phi.abs().is_close(0.) {
        return vecs.to_vec();
    }
    let rot = rotation_matrix(u, phi);
    rotate_vectors(vecs, &rot)
}
