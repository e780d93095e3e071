//! Radiation and sunlight-hours walkthrough: a ground plane shaded by a
//! wall to the south, analyzed against a uniform sky and one day of sun
//! positions.

use anyhow::Result;
use sunview3d::study::directions::SunVectorSet;
use sunview3d::study::sampler::sample_polygons;
use sunview3d::study::solar::day_sun_vectors;
use sunview3d::{
    radiation, sunlight_hours, ContextMesh, Point, Polygon, SkyDome, TargetSet, VisibilityEngine,
};

fn main() -> Result<()> {
    // Analysis surface: 10 x 10 m ground plane
    let ground = Polygon::new(
        "ground",
        vec![
            Point::new(-5., -5., 0.),
            Point::new(5., -5., 0.),
            Point::new(5., 5., 0.),
            Point::new(-5., 5., 0.),
        ],
        None,
    )?;
    let sampled = sample_polygons(&[ground], 1.0, 0.01)?;
    println!("Sampled {} test points", sampled.points.len());

    // Context: a 4 m wall along the southern edge
    let wall = Polygon::new(
        "south_wall",
        vec![
            Point::new(-5., -5., 0.),
            Point::new(5., -5., 0.),
            Point::new(5., -5., 4.),
            Point::new(-5., -5., 4.),
        ],
        None,
    )?;
    let context = ContextMesh::from_polygons(&[wall]);

    let engine = VisibilityEngine::new(true);

    // Radiation against a uniform overcast-like sky
    let dome = SkyDome::tregenza_with_values(0.0, &vec![5.0; 145])?;
    let dirs = dome.directions();
    let table = engine.evaluate(
        &sampled.points,
        TargetSet::Directions(&dirs),
        Some(&context.mesh),
        Some(&sampled.mesh),
    )?;
    let rad = radiation(&table, &dome, &sampled.points, 1.0)?;
    println!(
        "Radiation: total {:.1} Wh, per-point range {:.1} .. {:.1} Wh/m2",
        rad.total,
        rad.per_point.iter().cloned().fold(f64::INFINITY, f64::min),
        rad.per_point.iter().cloned().fold(0.0, f64::max),
    );

    // Sunlight hours on a winter day at 52 N
    let hours: Vec<f64> = (0..24).map(|h| h as f64 + 0.5).collect();
    let samples = day_sun_vectors(52.0, 355, &hours);
    let suns = SunVectorSet::new(&samples, 0.0);
    println!(
        "{} sun positions above the horizon ({} samples dropped)",
        suns.len(),
        suns.dropped
    );

    let table = engine.evaluate(
        &sampled.points,
        TargetSet::Directions(&suns.vectors),
        Some(&context.mesh),
        Some(&sampled.mesh),
    )?;
    let slh = sunlight_hours(&table, &sampled.points, 1.0, 1.0)?;
    println!(
        "Sunlight hours: per-point range {:.0} .. {:.0} h",
        slh.per_point.iter().cloned().fold(f64::INFINITY, f64::min),
        slh.per_point.iter().cloned().fold(0.0, f64::max),
    );

    if table.warnings.any() {
        println!("Warnings: {:?}", table.warnings);
    }

    Ok(())
}
