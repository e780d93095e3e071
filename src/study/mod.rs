//! Visibility and irradiance studies.
//!
//! A study runs in four stages that share one data model:
//! surface sampling ([`sampler`]), context preparation ([`context`]),
//! per-point/per-target visibility evaluation ([`engine`]) and policy
//! aggregation ([`aggregate`]). Direction sets for the engine come from
//! [`directions`] (sky dome, sun vectors, view targets).

pub mod aggregate;
pub mod context;
pub mod directions;
pub mod engine;
pub mod sampler;
pub mod solar;

use crate::{Point, Vector};
use serde::{Deserialize, Serialize};

/// A sampled location and orientation on an analysis surface.
///
/// One test point is created per mesh face; its index in the sample
/// array is the row index of every downstream result.
#[derive(Debug, Clone, Copy)]
pub struct TestPoint {
    /// Position offset from the face centroid along the normal.
    pub position: Point,
    /// Unit outward normal of the source face.
    pub normal: Vector,
    /// Planar area of the source face.
    pub area: f64,
    /// Index of the source face in the sampled analysis mesh.
    pub source_face: usize,
}

/// Output of one study: one value per test point plus a surface total.
///
/// `per_point` has the same length and ordering as the test point array
/// it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyResult {
    pub per_point: Vec<f64>,
    pub total: f64,
}

impl StudyResult {
    /// Area-weighted total over the per-point values.
    ///
    /// `unit_scale` converts model units to meters; areas scale with its
    /// square.
    pub fn from_per_point(per_point: Vec<f64>, areas: &[f64], unit_scale: f64) -> Self {
        let total = per_point
            .iter()
            .zip(areas.iter())
            .map(|(v, a)| v * a * unit_scale * unit_scale)
            .sum();
        Self { per_point, total }
    }
}

/// Recoverable conditions absorbed during a run, surfaced once to the
/// caller instead of once per face or pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunWarnings {
    /// Faces dropped during sampling or context preparation.
    pub skipped_faces: usize,
    /// Point/target pairs conservatively recorded as occluded because the
    /// target was degenerate (zero-length direction or coincident point).
    pub degenerate_pairs: usize,
}

impl RunWarnings {
    pub fn any(&self) -> bool {
        self.skipped_faces > 0 || self.degenerate_pairs > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_weighted_total() {
        let res = StudyResult::from_per_point(vec![1.0, 2.0], &[2.0, 3.0], 1.0);
        assert!((res.total - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_unit_scale_squared() {
        // Centimeter model: areas convert with 0.01^2
        let res = StudyResult::from_per_point(vec![100.0], &[1.0], 0.01);
        assert!((res.total - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_warnings_any() {
        let mut w = RunWarnings::default();
        assert!(!w.any());
        w.degenerate_pairs = 1;
        assert!(w.any());
    }
}
