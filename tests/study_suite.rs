//! End-to-end study scenarios: sample surfaces, build context, evaluate
//! visibility and aggregate, checking the documented invariants of the
//! three study types.

use anyhow::Result;
use sunview3d::study::directions::{view_targets, SunVectorSet};
use sunview3d::study::sampler::sample_polygons;
use sunview3d::{
    radiation, sunlight_hours, view_factor, ContextMesh, Point, Polygon, SkyDome, SkyPatch,
    TargetSet, TestPoint, TriMesh, Vector, ViewFields, VisibilityEngine,
};

/// Horizontal unit square centered at the origin, at the given height.
fn ground_square(z: f64) -> Result<Polygon> {
    Polygon::new(
        "ground",
        vec![
            Point::new(-0.5, -0.5, z),
            Point::new(0.5, -0.5, z),
            Point::new(0.5, 0.5, z),
            Point::new(-0.5, 0.5, z),
        ],
        None,
    )
}

/// Large horizontal blocker square at the given height.
fn blocker_square(z: f64, half_size: f64) -> Result<Polygon> {
    Polygon::new(
        "blocker",
        vec![
            Point::new(-half_size, -half_size, z),
            Point::new(half_size, -half_size, z),
            Point::new(half_size, half_size, z),
            Point::new(-half_size, half_size, z),
        ],
        None,
    )
}

fn single_up_point() -> TestPoint {
    TestPoint {
        position: Point::new(0., 0., 0.),
        normal: Vector::new(0., 0., 1.),
        area: 1.0,
        source_face: 0,
    }
}

/// A dome with one artificial patch, for the closed-form scenarios.
fn single_patch_dome(direction: Vector, value: f64) -> SkyDome {
    SkyDome {
        patches: vec![SkyPatch {
            direction,
            weight: 100.0,
            value,
        }],
    }
}

#[test]
fn radiation_single_patch_baseline() -> Result<()> {
    // One point looking up, one zenith patch worth 100, empty scene:
    // per-point value is exactly 100 * cos(0) = 100.
    let points = [single_up_point()];
    let dome = single_patch_dome(Vector::new(0., 0., 1.), 100.0);
    let dirs = dome.directions();

    let engine = VisibilityEngine::new(false);
    let table = engine.evaluate(&points, TargetSet::Directions(&dirs), None, None)?;
    let res = radiation(&table, &dome, &points, 1.0)?;

    assert!((res.per_point[0] - 100.0).abs() < 1e-12);
    assert!((res.total - 100.0).abs() < 1e-12);
    Ok(())
}

#[test]
fn radiation_fully_occluded_by_plane_above() -> Result<()> {
    // Same scenario, but a horizontal plane directly above the point.
    let points = [single_up_point()];
    let dome = single_patch_dome(Vector::new(0., 0., 1.), 100.0);
    let dirs = dome.directions();
    let context = ContextMesh::from_polygons(&[blocker_square(5.0, 50.0)?]);

    let engine = VisibilityEngine::new(false);
    let table = engine.evaluate(
        &points,
        TargetSet::Directions(&dirs),
        Some(&context.mesh),
        None,
    )?;
    let res = radiation(&table, &dome, &points, 1.0)?;

    assert_eq!(res.per_point[0], 0.0);
    assert_eq!(res.total, 0.0);
    Ok(())
}

#[test]
fn radiation_open_sky_matches_cosine_sum() -> Result<()> {
    // Empty context: every forward-facing patch is unoccluded and the
    // result must equal the closed-form cosine sum over the dome.
    let sampled = sample_polygons(&[ground_square(0.0)?], 0.5, 0.01)?;
    let values = vec![1.0; 145];
    let dome = SkyDome::tregenza_with_values(0.0, &values)?;
    let dirs = dome.directions();

    let engine = VisibilityEngine::new(false);
    let table = engine.evaluate(&sampled.points, TargetSet::Directions(&dirs), None, None)?;
    let res = radiation(&table, &dome, &sampled.points, 1.0)?;

    // For an upward normal, cos(angle to patch) is the patch's dz.
    let expected: f64 = dome.patches.iter().map(|p| p.direction.dz).sum();
    for v in &res.per_point {
        assert!((v - expected).abs() < 1e-9, "got {v}, expected {expected}");
    }
    Ok(())
}

#[test]
fn radiation_back_facing_patches_never_contribute() -> Result<()> {
    // A point looking straight down sees no sky patch, with or without
    // context geometry.
    let down = TestPoint {
        position: Point::new(0., 0., 10.),
        normal: Vector::new(0., 0., -1.),
        area: 1.0,
        source_face: 0,
    };
    let dome = SkyDome::tregenza_with_values(0.0, &vec![100.0; 145])?;
    let dirs = dome.directions();
    let engine = VisibilityEngine::new(false);

    for context in [None, Some(ContextMesh::from_polygons(&[blocker_square(20.0, 50.0)?]))] {
        let table = engine.evaluate(
            &[down],
            TargetSet::Directions(&dirs),
            context.as_ref().map(|c| &c.mesh),
            None,
        )?;
        assert!(table.rows[0].iter().all(|p| p.occluded));
        let res = radiation(&table, &dome, &[down], 1.0)?;
        assert_eq!(res.per_point[0], 0.0);
    }
    Ok(())
}

#[test]
fn sunlight_hours_counts_unblocked_vectors() -> Result<()> {
    // 4 samples: 2 below horizon (dropped at the boundary), 2 usable.
    // An eastern wall blocks the low-east sun but not the high-west one.
    let samples = vec![
        Vector::new(0.9, 0., 0.2),   // low east
        Vector::new(-0.5, 0., 0.8),  // high west
        Vector::new(0.5, 0., -0.3),  // below horizon
        Vector::new(-0.5, 0., -0.8), // below horizon
    ];
    let suns = SunVectorSet::new(&samples, 0.0);
    assert_eq!(suns.len(), 2);
    assert_eq!(suns.dropped, 2);

    let east_wall = Polygon::new(
        "east_wall",
        vec![
            Point::new(2., -10., 0.),
            Point::new(2., 10., 0.),
            Point::new(2., 10., 3.),
            Point::new(2., -10., 3.),
        ],
        None,
    )?;
    let context = ContextMesh::from_polygons(&[east_wall]);
    let points = [single_up_point()];

    let engine = VisibilityEngine::new(false);
    let table = engine.evaluate(
        &points,
        TargetSet::Directions(&suns.vectors),
        Some(&context.mesh),
        None,
    )?;
    let res = sunlight_hours(&table, &points, 1.0, 1.0)?;

    assert_eq!(res.per_point[0], 1.0); // only the high-west sun gets through
    Ok(())
}

#[test]
fn sunlight_hours_monotonic_under_added_blockers() -> Result<()> {
    let sampled = sample_polygons(&[ground_square(0.0)?], 0.25, 0.01)?;
    let samples: Vec<Vector> = (0..8)
        .map(|i| {
            let az = i as f64 * std::f64::consts::PI / 4.0;
            Vector::new(az.sin() * 0.7, az.cos() * 0.7, 0.5)
        })
        .collect();
    let suns = SunVectorSet::new(&samples, 0.0);
    let engine = VisibilityEngine::new(false);

    let no_blockers = {
        let table = engine.evaluate(
            &sampled.points,
            TargetSet::Directions(&suns.vectors),
            None,
            None,
        )?;
        sunlight_hours(&table, &sampled.points, 1.0, 1.0)?
    };

    let one_blocker = {
        let ctx = ContextMesh::from_polygons(&[blocker_square(2.0, 3.0)?]);
        let table = engine.evaluate(
            &sampled.points,
            TargetSet::Directions(&suns.vectors),
            Some(&ctx.mesh),
            None,
        )?;
        sunlight_hours(&table, &sampled.points, 1.0, 1.0)?
    };

    let two_blockers = {
        let ctx = ContextMesh::from_polygons(&[
            blocker_square(2.0, 3.0)?,
            blocker_square(1.0, 1.0)?,
        ]);
        let table = engine.evaluate(
            &sampled.points,
            TargetSet::Directions(&suns.vectors),
            Some(&ctx.mesh),
            None,
        )?;
        sunlight_hours(&table, &sampled.points, 1.0, 1.0)?
    };

    for i in 0..sampled.points.len() {
        assert!(one_blocker.per_point[i] <= no_blockers.per_point[i]);
        assert!(two_blockers.per_point[i] <= one_blocker.per_point[i]);
    }
    assert!(two_blockers.total <= no_blockers.total);
    Ok(())
}

#[test]
fn view_factor_stays_in_range() -> Result<()> {
    // A vertical wall looking at a ring of targets, some behind, with a
    // partial blocker: values must stay within [0, 100].
    let wall = Polygon::new(
        "wall",
        vec![
            Point::new(0., 0., 0.),
            Point::new(1., 0., 0.),
            Point::new(1., 0., 1.),
            Point::new(0., 0., 1.),
        ],
        None,
    )?;
    let sampled = sample_polygons(&[wall], 0.5, 0.01)?;

    let ring: Vec<Point> = (0..12)
        .map(|i| {
            let az = i as f64 * std::f64::consts::PI / 6.0;
            Point::new(0.5 + 5.0 * az.sin(), 5.0 * az.cos(), 1.0)
        })
        .collect();
    let targets = view_targets(&ring, &[])?;
    let fields = ViewFields::default();
    let context = ContextMesh::from_polygons(&[blocker_square(0.5, 2.0)?]);

    let engine = VisibilityEngine::new(false);
    let table = engine.evaluate(
        &sampled.points,
        TargetSet::Points(&targets),
        Some(&context.mesh),
        Some(&sampled.mesh),
    )?;
    let res = view_factor(&table, &targets, &fields, &sampled.points, 1.0)?;

    for v in &res.per_point {
        assert!((0.0..=100.0).contains(v), "view value out of range: {v}");
    }
    Ok(())
}

#[test]
fn self_shading_blocks_across_own_geometry() -> Result<()> {
    // Two parallel vertical walls facing each other; from each wall the
    // targets behind the other wall are blocked by the analysis mesh
    // itself (no context geometry at all).
    let near = Polygon::new(
        "near",
        vec![
            Point::new(0., 0., 0.),
            Point::new(1., 0., 0.),
            Point::new(1., 0., 1.),
            Point::new(0., 0., 1.),
        ],
        None,
    )?;
    let far = Polygon::new(
        "far",
        vec![
            Point::new(1., 2., 0.),
            Point::new(0., 2., 0.),
            Point::new(0., 2., 1.),
            Point::new(1., 2., 1.),
        ],
        None,
    )?;
    // `near` faces -Y and `far` faces +Y, so they face away from each
    // other; beyond-the-other-wall targets are back-facing for one wall
    // and self-shaded for none. Flip near to face +Y instead.
    let near_flipped = Polygon::new(
        "near",
        near.vertices().iter().rev().cloned().collect(),
        None,
    )?;
    let sampled = sample_polygons(&[near_flipped, far], 2.0, 0.01)?;

    // Target far beyond the `far` wall, in front of `near`
    let targets = view_targets(&[Point::new(0.5, 10.0, 0.5)], &[])?;
    let engine = VisibilityEngine::new(false);
    let table = engine.evaluate(
        &sampled.points,
        TargetSet::Points(&targets),
        None,
        Some(&sampled.mesh),
    )?;

    // Points on the near wall (y=0, facing +Y) see the target direction
    // forward but the far wall is in the way.
    for (tp, row) in sampled.points.iter().zip(&table.rows) {
        if tp.position.y < 1.0 && tp.normal.dy > 0.5 {
            assert!(row[0].occluded, "expected self-shading at {}", tp.position);
        }
    }
    Ok(())
}

#[test]
fn parallel_and_sequential_agree_end_to_end() -> Result<()> {
    let sampled = sample_polygons(&[ground_square(0.0)?, ground_square(2.0)?], 0.2, 0.01)?;
    let dome = SkyDome::tregenza_with_values(0.3, &(0..145).map(|i| i as f64).collect::<Vec<_>>())?;
    let dirs = dome.directions();
    let context = ContextMesh::from_polygons(&[blocker_square(1.0, 0.8)?]);

    let seq_table = VisibilityEngine::new(false).evaluate(
        &sampled.points,
        TargetSet::Directions(&dirs),
        Some(&context.mesh),
        Some(&sampled.mesh),
    )?;
    let par_table = VisibilityEngine::new(true).evaluate(
        &sampled.points,
        TargetSet::Directions(&dirs),
        Some(&context.mesh),
        Some(&sampled.mesh),
    )?;

    let seq = radiation(&seq_table, &dome, &sampled.points, 1.0)?;
    let par = radiation(&par_table, &dome, &sampled.points, 1.0)?;

    assert_eq!(seq.per_point.len(), par.per_point.len());
    for (a, b) in seq.per_point.iter().zip(par.per_point.iter()) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
    assert_eq!(seq.total.to_bits(), par.total.to_bits());
    Ok(())
}

#[test]
fn area_scaling_scales_totals_linearly() -> Result<()> {
    let sampled = sample_polygons(&[ground_square(0.0)?], 0.3, 0.01)?;
    let dome = SkyDome::tregenza_with_values(0.0, &vec![10.0; 145])?;
    let dirs = dome.directions();
    let engine = VisibilityEngine::new(false);
    let table = engine.evaluate(&sampled.points, TargetSet::Directions(&dirs), None, None)?;

    let base = radiation(&table, &dome, &sampled.points, 1.0)?;

    let k = 2.5;
    let scaled_points: Vec<TestPoint> = sampled
        .points
        .iter()
        .map(|p| TestPoint {
            area: p.area * k,
            ..*p
        })
        .collect();
    let scaled = radiation(&table, &dome, &scaled_points, 1.0)?;

    assert!((scaled.total - k * base.total).abs() < 1e-9 * base.total.abs().max(1.0));
    assert_eq!(base.per_point, scaled.per_point);
    Ok(())
}

#[test]
fn mismatched_table_shapes_are_rejected() -> Result<()> {
    let points = [single_up_point()];
    let dome = SkyDome::tregenza(0.0);
    let dirs = dome.directions();
    let engine = VisibilityEngine::new(false);
    let table = engine.evaluate(&points, TargetSet::Directions(&dirs), None, None)?;

    // Wrong point count
    assert!(radiation(&table, &dome, &[], 1.0).is_err());

    // Wrong target count
    let small_dome = single_patch_dome(Vector::new(0., 0., 1.), 1.0);
    assert!(radiation(&table, &small_dome, &points, 1.0).is_err());

    let targets = view_targets(&[Point::new(0., 5., 0.)], &[])?;
    assert!(view_factor(&table, &targets, &ViewFields::default(), &points, 1.0).is_err());
    Ok(())
}

#[test]
fn sampling_warnings_surface_skipped_geometry() -> Result<()> {
    // A healthy polygon next to a mesh with a malformed face: the study
    // proceeds and the skip count is reported.
    let mut mesh = TriMesh::from_polygon(&ground_square(0.0)?)?;
    mesh.faces.push(sunview3d::TriangleIndex(0, 1, 99));
    let sampled = sunview3d::sample_mesh(&mesh, 0.01)?;
    assert_eq!(sampled.warnings.skipped_faces, 1);
    assert_eq!(sampled.points.len(), 2);
    Ok(())
}
