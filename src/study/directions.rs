//! Direction-set model.
//!
//! Produces the three kinds of target sets the visibility engine consumes:
//! the fixed 145-patch hemispherical sky dome, discrete sun direction
//! vectors, and arbitrary 3D view targets with importance weights and
//! angular-field weighting.

use crate::geom::rotation::rotate_vectors_around_axis;
use crate::{Point, Vector};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Number of patches in the hemispherical sky decomposition.
pub const NUM_SKY_PATCHES: usize = 145;

/// Patch counts per altitude band, horizon band first.
const BAND_PATCH_COUNTS: [usize; 8] = [30, 30, 24, 24, 18, 12, 6, 1];

/// Band center altitudes in degrees (the last band is the zenith patch).
const BAND_ALTITUDES_DEG: [f64; 8] = [6.0, 18.0, 30.0, 42.0, 54.0, 66.0, 78.0, 90.0];

/// Steradian-derived conversion factors per band. Baked constants; never
/// recomputed from geometry.
const BAND_WEIGHTS: [f64; 8] = [
    0.0435449227,
    0.0416418006,
    0.0473984151,
    0.0406730411,
    0.0428934136,
    0.0445221864,
    0.0455168385,
    0.0344199465,
];

/// One cell of the hemispherical sky decomposition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SkyPatch {
    /// Unit direction towards the patch center.
    pub direction: Vector,
    /// Solid-angle weight of the patch's band.
    pub weight: f64,
    /// Cumulative irradiance assigned to the patch (Wh/m2).
    pub value: f64,
}

/// The fixed 145-patch sky decomposition, rotated by a north offset.
///
/// Directions and band weights are generated together so that index `i`
/// always refers to the same patch in both; rotating the dome moves all
/// directions as one group and never reorders them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyDome {
    pub patches: Vec<SkyPatch>,
}

impl SkyDome {
    /// Generates the sky dome with all patch values set to zero.
    ///
    /// `north_offset` is the rotation of the dome around the vertical
    /// axis in radians (see [`north_angle`] for deriving it from a north
    /// vector).
    pub fn tregenza(north_offset: f64) -> Self {
        let mut directions = Vec::with_capacity(NUM_SKY_PATCHES);
        let mut weights = Vec::with_capacity(NUM_SKY_PATCHES);

        for (band, &count) in BAND_PATCH_COUNTS.iter().enumerate() {
            let alt = BAND_ALTITUDES_DEG[band].to_radians();
            let az_step = 2.0 * std::f64::consts::PI / count as f64;
            for k in 0..count {
                let az = k as f64 * az_step;
                // Azimuth measured from +Y (north), increasing towards +X
                directions.push(Vector::new(
                    alt.cos() * az.sin(),
                    alt.cos() * az.cos(),
                    alt.sin(),
                ));
                weights.push(BAND_WEIGHTS[band]);
            }
        }

        let directions =
            rotate_vectors_around_axis(&directions, &Vector::new(0., 0., 1.), north_offset);

        let patches = directions
            .into_iter()
            .zip(weights)
            .map(|(direction, weight)| SkyPatch {
                direction,
                weight,
                value: 0.0,
            })
            .collect();
        Self { patches }
    }

    /// Generates the sky dome and assigns per-patch irradiance values.
    ///
    /// `values` must hold exactly one value per patch, in patch order
    /// (horizon band first, zenith last).
    pub fn tregenza_with_values(north_offset: f64, values: &[f64]) -> Result<Self> {
        if values.len() != NUM_SKY_PATCHES {
            bail!(
                "Sky values must have {} entries, got {}",
                NUM_SKY_PATCHES,
                values.len()
            );
        }
        let mut dome = Self::tregenza(north_offset);
        for (patch, &value) in dome.patches.iter_mut().zip(values) {
            patch.value = value;
        }
        Ok(dome)
    }

    /// Patch directions in patch order.
    pub fn directions(&self) -> Vec<Vector> {
        self.patches.iter().map(|p| p.direction).collect()
    }
}

/// Signed rotation angle (radians) that aligns +Y with the given north
/// vector: zero for +Y, negative when north leans east.
pub fn north_angle(north: &Vector) -> Result<f64> {
    let angle = north
        .angle(&Vector::new(0., 1., 0.))
        .context("North vector cannot have zero length")?;
    Ok(if north.dx > 0.0 { -angle } else { angle })
}

/// Discrete sun direction vectors for a sunlight-hours study.
///
/// Below-horizon and degenerate samples are excluded here, at the model
/// boundary; the engine itself does not re-validate.
#[derive(Debug, Clone)]
pub struct SunVectorSet {
    /// Unit vectors pointing towards the sun, rotated by the north offset.
    pub vectors: Vec<Vector>,
    /// Samples dropped for pointing below the horizon or having zero length.
    pub dropped: usize,
}

impl SunVectorSet {
    pub fn new(samples: &[Vector], north_offset: f64) -> Self {
        let mut vectors = Vec::with_capacity(samples.len());
        let mut dropped = 0;
        for sample in samples {
            if sample.dz < 0.0 {
                dropped += 1;
                continue;
            }
            match sample.normalize() {
                Ok(v) => vectors.push(v),
                Err(_) => dropped += 1,
            }
        }
        let vectors =
            rotate_vectors_around_axis(&vectors, &Vector::new(0., 0., 1.), north_offset);
        Self { vectors, dropped }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// A single target of a view study.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewTarget {
    pub position: Point,
    /// Relative importance; 1.0 is neutral.
    pub weight: f64,
}

/// Builds view targets from points and optional importance weights.
///
/// An empty weight list assigns every target the neutral weight 1.0;
/// non-positive weights also fall back to neutral (the original component
/// treats zero as "equal importance"). A weight list of the wrong length
/// is an error.
pub fn view_targets(points: &[Point], weights: &[f64]) -> Result<Vec<ViewTarget>> {
    if points.is_empty() {
        bail!("No view targets provided");
    }
    if !weights.is_empty() && weights.len() != points.len() {
        bail!(
            "View target weights must match points: {} points, {} weights",
            points.len(),
            weights.len()
        );
    }
    Ok(points
        .iter()
        .enumerate()
        .map(|(i, &position)| {
            let w = weights.get(i).copied().unwrap_or(1.0);
            ViewTarget {
                position,
                weight: if w > 0.0 { w } else { 1.0 },
            }
        })
        .collect())
}

/// Angular view fields relative to a test point's normal.
///
/// Two band widths split the forward hemisphere into up to three fields:
/// `[0, f1)`, `[f1, f1+f2)` and `[f1+f2, 90)` degrees, each with its own
/// index weight (free percentages, e.g. 100/60/30).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewFields {
    pub field1_deg: f64,
    pub field2_deg: f64,
    pub weights: [f64; 3],
}

impl ViewFields {
    pub fn new(field1_deg: f64, field2_deg: f64, weights: [f64; 3]) -> Result<Self> {
        if field1_deg < 0.0 || field2_deg < 0.0 {
            bail!("View field angles cannot be negative");
        }
        if field1_deg + field2_deg > 90.0 {
            bail!(
                "Sum of view fields cannot be more than 90 degrees, got {}",
                field1_deg + field2_deg
            );
        }
        Ok(Self {
            field1_deg,
            field2_deg,
            weights,
        })
    }

    /// Field index for an angle from the normal (radians), or `None` for
    /// back-facing angles.
    pub fn field_of(&self, angle: f64) -> Option<usize> {
        let deg = angle.to_degrees();
        if deg < 0.0 || deg >= 90.0 {
            None
        } else if deg < self.field1_deg {
            Some(0)
        } else if deg < self.field1_deg + self.field2_deg {
            Some(1)
        } else {
            Some(2)
        }
    }
}

impl Default for ViewFields {
    fn default() -> Self {
        Self {
            field1_deg: 30.0,
            field2_deg: 30.0,
            weights: [100.0, 60.0, 30.0],
        }
    }
}
