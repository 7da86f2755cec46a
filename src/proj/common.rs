//! Common helpers for projection math (meridian arc, footpoint latitude).

use std::f64::consts::FRAC_PI_2;

use super::ellipsoid::Ellipsoid;
use crate::error::ProjError;

const FOOTPOINT_MAX_ITER: usize = 10;
const FOOTPOINT_TOL: f64 = 1e-14;

/// Meridian arc series in powers of e² (five terms, up to sin 8φ).
///
/// X(φ) = a(1-e²) [A φ - B sin 2φ + C sin 4φ - D sin 6φ + E sin 8φ]
#[derive(Clone, Copy, Debug)]
pub struct MeridianArc {
    ellipsoid: Ellipsoid,
    k0: f64,
    k2: f64,
    k4: f64,
    k6: f64,
    k8: f64,
}

impl MeridianArc {
    pub fn new(ellipsoid: &Ellipsoid) -> Self {
        let e2 = ellipsoid.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let e8 = e6 * e2;

        Self {
            ellipsoid: *ellipsoid,
            k0: 1.0 + 3.0 * e2 / 4.0 + 45.0 * e4 / 64.0 + 175.0 * e6 / 256.0
                + 11025.0 * e8 / 16384.0,
            k2: 3.0 * e2 / 8.0 + 15.0 * e4 / 32.0 + 525.0 * e6 / 1024.0 + 2205.0 * e8 / 4096.0,
            k4: 15.0 * e4 / 256.0 + 105.0 * e6 / 1024.0 + 2205.0 * e8 / 16384.0,
            k6: 35.0 * e6 / 3072.0 + 315.0 * e8 / 12288.0,
            k8: 315.0 * e8 / 131072.0,
        }
    }

    /// Arc length from the equator to latitude `phi` (metres, signed).
    pub fn length(&self, phi: f64) -> f64 {
        let e = &self.ellipsoid;
        e.a * (1.0 - e.e2)
            * (self.k0 * phi - self.k2 * (2.0 * phi).sin() + self.k4 * (4.0 * phi).sin()
                - self.k6 * (6.0 * phi).sin()
                + self.k8 * (8.0 * phi).sin())
    }

    /// Footpoint latitude: the latitude whose arc length equals `arc`.
    ///
    /// Seeded with the rectifying-latitude series in e², then polished with Newton
    /// steps on [`MeridianArc::length`] so that it is the exact inverse of it.
    pub fn footpoint(&self, arc: f64) -> Result<f64, ProjError> {
        let e = &self.ellipsoid;
        let e2 = e.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;

        let mu = arc / (e.a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
        let mut phi = mu
            + (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * mu).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * mu).sin()
            + (35.0 * e6 / 3072.0) * (6.0 * mu).sin();

        let mut step = f64::INFINITY;
        for _ in 0..FOOTPOINT_MAX_ITER {
            step = (arc - self.length(phi)) / e.meridian_radius(phi);
            phi += step;
            if step.abs() < FOOTPOINT_TOL {
                break;
            }
        }
        if !phi.is_finite() || step.abs() >= 1e-9 {
            return Err(ProjError::DidNotConverge {
                iterations: FOOTPOINT_MAX_ITER,
                residual: step.abs(),
            });
        }
        if phi.abs() >= FRAC_PI_2 {
            return Err(ProjError::InvalidParameter(format!(
                "meridian distance {arc} m lies beyond the pole"
            )));
        }
        Ok(phi)
    }
}

/// Compute the meridian arc length from the equator to latitude phi.
pub fn meridian_arc(ellipsoid: &Ellipsoid, phi: f64) -> f64 {
    MeridianArc::new(ellipsoid).length(phi)
}
