//! Solar position.
//!
//! Closed-form solar geometry used to produce sun direction vectors for
//! sunlight-hours studies. The engine itself treats sun vectors as opaque
//! inputs; this module is one convenient producer.

use crate::Vector;

/// Solar position (azimuth and altitude angles).
#[derive(Debug, Clone, Copy)]
pub struct SolarPosition {
    /// Solar altitude angle in degrees (0 = horizon, 90 = zenith).
    pub altitude: f64,
    /// Solar azimuth angle in degrees from north, clockwise (0=N, 90=E, 180=S, 270=W).
    pub azimuth: f64,
}

impl SolarPosition {
    /// Calculates the solar position using the Spencer algorithm.
    ///
    /// - `latitude`: in degrees (positive north)
    /// - `day_of_year`: 1-365
    /// - `hour`: solar time in hours (0-24)
    pub fn calculate(latitude: f64, day_of_year: u16, hour: f64) -> Self {
        let lat = latitude.to_radians();

        // Day angle (Spencer)
        let gamma = 2.0 * std::f64::consts::PI * (day_of_year as f64 - 1.0) / 365.0;

        // Solar declination (Spencer approximation)
        let declination = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
            - 0.006758 * (2.0 * gamma).cos()
            + 0.000907 * (2.0 * gamma).sin()
            - 0.002697 * (3.0 * gamma).cos()
            + 0.00148 * (3.0 * gamma).sin();

        // Hour angle (15 degrees per hour from solar noon)
        let hour_angle = (hour - 12.0) * 15.0_f64.to_radians();

        // Solar altitude
        let sin_alt =
            lat.sin() * declination.sin() + lat.cos() * declination.cos() * hour_angle.cos();
        let altitude = sin_alt.asin().to_degrees();

        // Solar azimuth
        let cos_azimuth = (declination.sin() * lat.cos()
            - declination.cos() * lat.sin() * hour_angle.cos())
            / altitude.to_radians().cos().max(1e-10);

        let mut azimuth = cos_azimuth.clamp(-1.0, 1.0).acos().to_degrees();
        if hour_angle > 0.0 {
            azimuth = 360.0 - azimuth;
        }

        Self { altitude, azimuth }
    }

    /// Returns true if the sun is above the horizon.
    pub fn is_above_horizon(&self) -> bool {
        self.altitude > 0.0
    }

    /// Converts solar position to a direction vector (pointing toward the sun).
    ///
    /// Convention: north = +Y, east = +X, up = +Z.
    pub fn to_direction(&self) -> Vector {
        let alt = self.altitude.to_radians();
        let azi = self.azimuth.to_radians();

        Vector::new(alt.cos() * azi.sin(), alt.cos() * azi.cos(), alt.sin())
    }
}

/// Sun direction vectors for the above-horizon hours of one day.
///
/// Hours at which the sun is below the horizon are skipped.
pub fn day_sun_vectors(latitude: f64, day_of_year: u16, hours: &[f64]) -> Vec<Vector> {
    hours
        .iter()
        .map(|&h| SolarPosition::calculate(latitude, day_of_year, h))
        .filter(|pos| pos.is_above_horizon())
        .map(|pos| pos.to_direction())
        .collect()
}
