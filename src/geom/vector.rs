use crate::geom::EPS;
use crate::Point;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Vector {
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    pub fn from_points(beg: Point, end: Point) -> Self {
        end - beg
    }

    /// Cross product between 2 vectors.
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            dx: self.dy * other.dz - self.dz * other.dy,
            dy: self.dz * other.dx - self.dx * other.dz,
            dz: self.dx * other.dy - self.dy * other.dx,
        }
    }

    /// Dot product between 2 vectors.
    pub fn dot(&self, other: &Self) -> f64 {
        self.dx * other.dx + self.dy * other.dy + self.dz * other.dz
    }

    /// Returns the length of the vector.
    pub fn length(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }

    pub fn is_close(&self, other: &Self) -> bool {
        (self.dx - other.dx).abs() < EPS
            && (self.dy - other.dy).abs() < EPS
            && (self.dz - other.dz).abs() < EPS
    }

    /// Normalizes the vector (divides by its length) and returns a copy.
    ///
    /// Fails for (near-)zero-length vectors.
    pub fn normalize(&self) -> Result<Self> {
        let len = self.length();
        if len < EPS {
            return Err(anyhow!("Cannot normalize a zero-length vector"));
        }
        Ok(Self {
            dx: self.dx / len,
            dy: self.dy / len,
            dz: self.dz / len,
        })
    }

    /// Calculates vector normal to the surface defined with 3 points.
    ///
    /// The normal does not exist if the points are collinear.
    pub fn normal(pt0: Point, pt1: Point, pt2: Point) -> Result<Self> {
        let v01 = pt1 - pt0;
        let v02 = pt2 - pt0;
        v01.cross(&v02).normalize()
    }

    /// Angle between two vectors in radians, in [0, pi].
    ///
    /// Fails if either vector has zero length.
    pub fn angle(&self, other: &Self) -> Result<f64> {
        let len_product = self.length() * other.length();
        if len_product < EPS {
            return Err(anyhow!("Angle is undefined for a zero-length vector"));
        }
        let cos_angle = (self.dot(other) / len_product).clamp(-1.0, 1.0);
        Ok(cos_angle.acos())
    }

    /// Returns the projection of this vector onto the horizontal (XY) plane.
    pub fn horizontal(&self) -> Self {
        Self {
            dx: self.dx,
            dy: self.dy,
            dz: 0.0,
        }
    }

    /// Rotates the vector around the vertical axis by `phi` radians
    /// (counterclockwise when looking from above).
    pub fn rotate_z(&self, phi: f64) -> Self {
        let (sin, cos) = phi.sin_cos();
        Self {
            dx: self.dx * cos - self.dy * sin,
            dy: self.dx * sin + self.dy * cos,
            dz: self.dz,
        }
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        write!(
            f,
            "Vector({:.prec$}, {:.prec$}, {:.prec$})",
            self.dx,
            self.dy,
            self.dz,
            prec = prec
        )
    }
}

impl Add for Vector {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            dx: self.dx + other.dx,
            dy: self.dy + other.dy,
            dz: self.dz + other.dz,
        }
    }
}

impl Sub for Vector {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            dx: self.dx - other.dx,
            dy: self.dy - other.dy,
            dz: self.dz - other.dz,
        }
    }
}

impl Mul<f64> for Vector {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            dx: self.dx * scalar,
            dy: self.dy * scalar,
            dz: self.dz * scalar,
        }
    }
}

impl Neg for Vector {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
            dz: -self.dz,
        }
    }
}
