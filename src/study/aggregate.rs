//! Aggregation policies.
//!
//! Three small reducers turn the shared per-pair visibility table into one
//! value per test point plus an area-weighted surface total. They contain
//! no intersection logic; everything geometric already happened in the
//! engine.

use crate::study::directions::{SkyDome, ViewFields, ViewTarget};
use crate::study::engine::VisibilityResult;
use crate::study::{StudyResult, TestPoint};
use anyhow::{bail, Result};

/// Cumulative solar radiation per test point (Wh/m2).
///
/// Per point: sum of `patch.value * cos(angle)` over unoccluded patches.
/// The total is the area-weighted sum over points, scaled by
/// `unit_scale^2` (model units to meters).
pub fn radiation(
    result: &VisibilityResult,
    dome: &SkyDome,
    points: &[TestPoint],
    unit_scale: f64,
) -> Result<StudyResult> {
    check_shape(result, points.len(), dome.patches.len(), "sky patches")?;

    let per_point = result
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&dome.patches)
                .filter(|(pair, _)| !pair.occluded)
                .map(|(pair, patch)| patch.value * pair.angle.cos())
                .sum()
        })
        .collect();

    Ok(StudyResult::from_per_point(
        per_point,
        &areas(points),
        unit_scale,
    ))
}

/// Direct sunlight hours per test point.
///
/// Per point: the number of unoccluded sun vectors divided by `timestep`
/// (samples per hour; 1 gives the plain count). The total is area-weighted
/// like the radiation total.
pub fn sunlight_hours(
    result: &VisibilityResult,
    points: &[TestPoint],
    timestep: f64,
    unit_scale: f64,
) -> Result<StudyResult> {
    if result.rows.len() != points.len() {
        bail!(
            "Visibility rows do not match test points: {} vs {}",
            result.rows.len(),
            points.len()
        );
    }
    if timestep <= 0.0 {
        bail!("Timestep must be positive, got {timestep}");
    }

    let per_point = result
        .rows
        .iter()
        .map(|row| row.iter().filter(|pair| !pair.occluded).count() as f64 / timestep)
        .collect();

    Ok(StudyResult::from_per_point(
        per_point,
        &areas(points),
        unit_scale,
    ))
}

/// Percentage of view targets visible per test point, in [0, 100].
///
/// Targets are bucketed into angular fields by their recorded angle; each
/// field scores `sum of w * cos(angle)` over its unoccluded targets,
/// normalized by the field's total weight, and the field scores are
/// combined with the field index weights. Fields without targets
/// contribute nothing.
pub fn view_factor(
    result: &VisibilityResult,
    targets: &[ViewTarget],
    fields: &ViewFields,
    points: &[TestPoint],
    unit_scale: f64,
) -> Result<StudyResult> {
    check_shape(result, points.len(), targets.len(), "view targets")?;

    let per_point = result
        .rows
        .iter()
        .map(|row| {
            let mut score = [0.0_f64; 3];
            let mut weight_sum = [0.0_f64; 3];
            for (pair, target) in row.iter().zip(targets) {
                if let Some(field) = fields.field_of(pair.angle) {
                    weight_sum[field] += target.weight;
                    if !pair.occluded {
                        score[field] += target.weight * pair.angle.cos();
                    }
                }
            }
            let mut value = 0.0;
            for field in 0..3 {
                if weight_sum[field] > 0.0 {
                    value += fields.weights[field] * score[field] / weight_sum[field];
                }
            }
            value.clamp(0.0, 100.0)
        })
        .collect();

    Ok(StudyResult::from_per_point(
        per_point,
        &areas(points),
        unit_scale,
    ))
}

fn areas(points: &[TestPoint]) -> Vec<f64> {
    points.iter().map(|p| p.area).collect()
}

fn check_shape(
    result: &VisibilityResult,
    num_points: usize,
    num_targets: usize,
    what: &str,
) -> Result<()> {
    if result.rows.len() != num_points {
        bail!(
            "Visibility rows do not match test points: {} vs {}",
            result.rows.len(),
            num_points
        );
    }
    if result.num_targets != num_targets {
        bail!(
            "Visibility columns do not match {what}: {} vs {}",
            result.num_targets,
            num_targets
        );
    }
    Ok(())
}
