//! Geodetic (B, L, H) ↔ geocentric Cartesian (X, Y, Z) conversion.

use std::f64::consts::FRAC_PI_2;

use log::debug;

use crate::error::ProjError;
use crate::point::{CartesianPoint, GeodeticPoint};
use crate::proj::ellipsoid::Ellipsoid;

/// Distance from the polar axis below which a point is treated as lying on it.
const POLAR_AXIS_EPS: f64 = 1e-9;

/// Convergence settings for the iterative Cartesian → geodetic inverse.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeocentricOptions {
    /// Stop once the latitude update is smaller than this (radians).
    pub tolerance: f64,
    /// Give up with [`ProjError::DidNotConverge`] after this many updates.
    pub max_iterations: usize,
}

impl Default for GeocentricOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 100,
        }
    }
}

/// Geodetic to geocentric conversion (closed form).
pub fn blh_to_xyz(ellipsoid: &Ellipsoid, p: GeodeticPoint) -> CartesianPoint {
    let n = ellipsoid.prime_vertical_radius(p.b);
    let (sin_b, cos_b) = p.b.sin_cos();
    let (sin_l, cos_l) = p.l.sin_cos();

    CartesianPoint::new(
        (n + p.h) * cos_b * cos_l,
        (n + p.h) * cos_b * sin_l,
        (n * (1.0 - ellipsoid.e2) + p.h) * sin_b,
    )
}

/// Geocentric to geodetic conversion with default convergence settings.
pub fn xyz_to_blh(ellipsoid: &Ellipsoid, p: CartesianPoint) -> Result<GeodeticPoint, ProjError> {
    xyz_to_blh_with(ellipsoid, p, &GeocentricOptions::default())
}

/// Geocentric to geodetic conversion by fixed-point iteration on the latitude.
///
/// Points on the polar axis (including the geocentre) map to B = ±π/2, L = 0,
/// H = |Z| - b; the geocentre is reported as the north pole.
pub fn xyz_to_blh_with(
    ellipsoid: &Ellipsoid,
    p: CartesianPoint,
    options: &GeocentricOptions,
) -> Result<GeodeticPoint, ProjError> {
    if !p.is_finite() {
        return Err(ProjError::InvalidParameter(format!(
            "non-finite cartesian coordinates ({}, {}, {})",
            p.x, p.y, p.z
        )));
    }

    let e2 = ellipsoid.e2;
    let rho = p.x.hypot(p.y);

    if rho < POLAR_AXIS_EPS {
        let b = if p.z < 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };
        return Ok(GeodeticPoint::new(b, 0.0, p.z.abs() - ellipsoid.b));
    }

    let l = p.y.atan2(p.x);
    let mut b = p.z.atan2(rho * (1.0 - e2));
    let mut step = f64::INFINITY;

    for iteration in 1..=options.max_iterations {
        let n = ellipsoid.prime_vertical_radius(b);
        let next = (p.z + e2 * n * b.sin()).atan2(rho);
        step = (next - b).abs();
        b = next;

        if step < options.tolerance {
            // Equivalent to ρ/cos B - N, but stable as B approaches the poles.
            let (sin_b, cos_b) = b.sin_cos();
            let h = rho * cos_b + p.z * sin_b - ellipsoid.a * (1.0 - e2 * sin_b * sin_b).sqrt();
            debug!("xyz_to_blh converged after {iteration} iterations");
            return Ok(GeodeticPoint::new(b, l, h));
        }
    }

    Err(ProjError::DidNotConverge {
        iterations: options.max_iterations,
        residual: step,
    })
}
