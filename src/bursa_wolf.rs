//! Bursa-Wolf seven-parameter similarity transform between geocentric frames.
//!
//! The rotation is linearized, R(ε) ≈ I + [ε]×, which holds for the small
//! angles (well under 1e-3 rad) that relate realizations of geodetic datums.

use nalgebra::{Matrix3, Vector3};

const ARCSEC: f64 = std::f64::consts::PI / (180.0 * 3600.0);

#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SevenParameters {
    /// Translation (metres)
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    /// Rotation about X, Y, Z (radians)
    pub ex: f64,
    pub ey: f64,
    pub ez: f64,
    /// Scale offset; the applied scale is 1 + m
    pub m: f64,
}

impl SevenParameters {
    pub fn new(dx: f64, dy: f64, dz: f64, ex: f64, ey: f64, ez: f64, m: f64) -> Self {
        Self {
            dx,
            dy,
            dz,
            ex,
            ey,
            ez,
            m,
        }
    }

    /// Build from the units parameter sets are usually published in:
    /// metres, arc-seconds and parts per million.
    pub fn from_arc_seconds_ppm(
        dx: f64,
        dy: f64,
        dz: f64,
        ex_sec: f64,
        ey_sec: f64,
        ez_sec: f64,
        ppm: f64,
    ) -> Self {
        Self::new(
            dx,
            dy,
            dz,
            ex_sec * ARCSEC,
            ey_sec * ARCSEC,
            ez_sec * ARCSEC,
            ppm * 1e-6,
        )
    }

    /// [dx, dy, dz, ex, ey, ez, m]
    pub fn to_array(&self) -> [f64; 7] {
        [self.dx, self.dy, self.dz, self.ex, self.ey, self.ez, self.m]
    }

    pub fn from_array(p: &[f64; 7]) -> Self {
        Self::new(p[0], p[1], p[2], p[3], p[4], p[5], p[6])
    }

    pub fn translation(&self) -> Vector3<f64> {
        Vector3::new(self.dx, self.dy, self.dz)
    }

    /// Small-angle rotation matrix I + [ε]×.
    #[rustfmt::skip]
    pub fn rotation(&self) -> Matrix3<f64> {
        Matrix3::new(
            1.0,      -self.ez,  self.ey,
            self.ez,   1.0,     -self.ex,
            -self.ey,  self.ex,  1.0,
        )
    }

    /// Apply the transform: target = T + (1 + m)·R·source.
    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let v = self.translation() + (1.0 + self.m) * (self.rotation() * Vector3::from(p));
        [v.x, v.y, v.z]
    }

    /// Parameters of the reverse transform, to first order in the rotation angles.
    ///
    /// Round-trip error is of order |ε|²·|r|, a few micrometres for arc-second
    /// rotations at Earth radius.
    pub fn inverse(&self) -> SevenParameters {
        let m = 1.0 / (1.0 + self.m) - 1.0;
        let reversed = SevenParameters::new(0.0, 0.0, 0.0, -self.ex, -self.ey, -self.ez, m);
        let t = -(1.0 + m) * (reversed.rotation() * self.translation());
        SevenParameters { dx: t.x, dy: t.y, dz: t.z, ..reversed }
    }
}
