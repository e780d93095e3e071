//! Visibility engine.
//!
//! For every (test point, target) pair the engine builds a ray or bounded
//! segment and asks whether it is blocked by the analysis surfaces
//! themselves or by the context mesh. The raw per-pair table is the single
//! input shared by the radiation, sunlight-hours and view aggregators.

use crate::geom::mesh::TriMesh;
use crate::geom::ray::{segment_hits_mesh, Ray};
use crate::geom::EPS;
use crate::study::directions::ViewTarget;
use crate::study::{RunWarnings, TestPoint};
use crate::Vector;
use anyhow::{bail, Result};
use rayon::prelude::*;
use std::f64::consts::FRAC_PI_2;

/// Targets of one engine run.
#[derive(Debug, Clone, Copy)]
pub enum TargetSet<'a> {
    /// Fixed world-frame directions (sky patches or sun vectors); targets
    /// are tested with unbounded rays.
    Directions(&'a [Vector]),
    /// View targets at specific positions; targets are tested with bounded
    /// segments.
    Points(&'a [ViewTarget]),
}

impl TargetSet<'_> {
    pub fn len(&self) -> usize {
        match self {
            TargetSet::Directions(d) => d.len(),
            TargetSet::Points(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Visibility of one (test point, target) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairVisibility {
    pub occluded: bool,
    /// Angle between the target direction and the surface normal (radians).
    pub angle: f64,
}

/// Per-pair visibility table: one row per test point, one column per
/// target, in input order regardless of execution strategy.
#[derive(Debug, Clone)]
pub struct VisibilityResult {
    pub rows: Vec<Vec<PairVisibility>>,
    pub num_targets: usize,
    pub warnings: RunWarnings,
}

/// Ray/segment visibility evaluation over a set of test points.
///
/// The engine holds no geometry itself; context and self meshes are passed
/// per run and shared read-only across worker threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityEngine {
    /// Evaluate test points on a thread pool instead of sequentially.
    /// Both strategies produce identical results.
    pub parallel: bool,
}

impl VisibilityEngine {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    /// Evaluates visibility for every (test point, target) pair.
    ///
    /// Back-facing targets (angle >= 90 degrees to the normal, strictly)
    /// are recorded occluded without an intersection test. Degenerate
    /// targets are recorded occluded and counted once per run. The self
    /// mesh, when present, is tested before the context mesh.
    pub fn evaluate(
        &self,
        points: &[TestPoint],
        targets: TargetSet,
        context: Option<&TriMesh>,
        self_mesh: Option<&TriMesh>,
    ) -> Result<VisibilityResult> {
        if points.is_empty() {
            bail!("No test points to evaluate");
        }
        if targets.is_empty() {
            bail!("No targets to evaluate");
        }

        let eval = |point: &TestPoint| evaluate_point(point, &targets, context, self_mesh);

        // Each point writes only its own row; row order follows point order
        // in both strategies.
        let per_point: Vec<(Vec<PairVisibility>, usize)> = if self.parallel {
            points.par_iter().map(eval).collect()
        } else {
            points.iter().map(eval).collect()
        };

        let mut rows = Vec::with_capacity(points.len());
        let mut warnings = RunWarnings::default();
        for (row, degenerate) in per_point {
            rows.push(row);
            warnings.degenerate_pairs += degenerate;
        }

        Ok(VisibilityResult {
            rows,
            num_targets: targets.len(),
            warnings,
        })
    }
}

fn evaluate_point(
    point: &TestPoint,
    targets: &TargetSet,
    context: Option<&TriMesh>,
    self_mesh: Option<&TriMesh>,
) -> (Vec<PairVisibility>, usize) {
    let mut row = Vec::with_capacity(targets.len());
    let mut degenerate = 0;

    match targets {
        TargetSet::Directions(directions) => {
            for dir in directions.iter() {
                let angle = match point.normal.angle(dir) {
                    Ok(a) => a,
                    Err(_) => {
                        degenerate += 1;
                        row.push(PairVisibility {
                            occluded: true,
                            angle: FRAC_PI_2,
                        });
                        continue;
                    }
                };
                let occluded = if angle < FRAC_PI_2 {
                    // Target direction is already unit length
                    let ray = Ray {
                        origin: point.position,
                        direction: *dir,
                    };
                    hits_any(&ray, context, self_mesh)
                } else {
                    true // Back-facing: no intersection test needed
                };
                row.push(PairVisibility { occluded, angle });
            }
        }
        TargetSet::Points(view_targets) => {
            for target in view_targets.iter() {
                let towards = target.position - point.position;
                if towards.length() < EPS {
                    degenerate += 1;
                    row.push(PairVisibility {
                        occluded: true,
                        angle: FRAC_PI_2,
                    });
                    continue;
                }
                let angle = view_angle(&point.normal, &towards);
                let occluded = if angle < FRAC_PI_2 {
                    let self_hit = self_mesh
                        .map(|m| segment_hits_mesh(point.position, target.position, m))
                        .unwrap_or(false);
                    self_hit
                        || context
                            .map(|m| segment_hits_mesh(point.position, target.position, m))
                            .unwrap_or(false)
                } else {
                    true
                };
                row.push(PairVisibility { occluded, angle });
            }
        }
    }

    (row, degenerate)
}

fn hits_any(ray: &Ray, context: Option<&TriMesh>, self_mesh: Option<&TriMesh>) -> bool {
    self_mesh.map(|m| ray.hits_mesh(m)).unwrap_or(false)
        || context.map(|m| ray.hits_mesh(m)).unwrap_or(false)
}

/// Angle between a surface normal and the direction towards a view target.
///
/// Both vectors are flattened to the horizontal plane so that a target's
/// height above the test point does not push it into a peripheral field;
/// a (near-)vertical normal has no horizontal frame, so the full 3D angle
/// is used instead.
fn view_angle(normal: &Vector, towards: &Vector) -> f64 {
    let nh = normal.horizontal();
    let th = towards.horizontal();
    if nh.length() > 1e-9 && th.length() > 1e-9 {
        nh.angle(&th).unwrap_or(FRAC_PI_2)
    } else {
        normal.angle(towards).unwrap_or(FRAC_PI_2)
    }
}
