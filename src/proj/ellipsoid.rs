use std::fmt;
use std::str::FromStr;

use crate::error::ProjError;

/// A reference ellipsoid and its derived shape constants.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipsoid {
    /// Equatorial radius in metres
    pub a: f64,
    pub f: f64,
    /// Polar radius, a(1 - f)
    pub b: f64,
    /// e², 2f - f²
    pub e2: f64,
    /// e'², e²/(1 - e²)
    pub ep2: f64,
}

impl Ellipsoid {
    pub const fn new(a: f64, f: f64) -> Self {
        let b = a * (1.0 - f);
        let e2 = 2.0 * f - f * f;
        let ep2 = e2 / (1.0 - e2);
        Self { a, f, b, e2, ep2 }
    }

    /// First eccentricity e.
    pub fn eccentricity(&self) -> f64 {
        self.e2.sqrt()
    }

    /// Radius of curvature in the prime vertical, N(φ).
    pub fn prime_vertical_radius(&self, phi: f64) -> f64 {
        let s = phi.sin();
        self.a / (1.0 - self.e2 * s * s).sqrt()
    }

    /// Radius of curvature in the meridian, M(φ). Also dM/dφ of the meridian arc.
    pub fn meridian_radius(&self, phi: f64) -> f64 {
        let s = phi.sin();
        let w2 = 1.0 - self.e2 * s * s;
        self.a * (1.0 - self.e2) / (w2 * w2.sqrt())
    }
}

pub const WGS84: Ellipsoid = Ellipsoid::new(6_378_137.0, 1.0 / 298.257_223_563);
/// Krasovsky 1940, the ellipsoid of the Beijing 1954 datum.
pub const BEIJING54: Ellipsoid = Ellipsoid::new(6_378_245.0, 1.0 / 298.3);

/// The closed set of reference frames callers may select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EllipsoidId {
    Wgs84,
    Beijing54,
}

impl EllipsoidId {
    pub fn ellipsoid(self) -> &'static Ellipsoid {
        match self {
            EllipsoidId::Wgs84 => &WGS84,
            EllipsoidId::Beijing54 => &BEIJING54,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EllipsoidId::Wgs84 => "WGS84",
            EllipsoidId::Beijing54 => "Beijing54",
        }
    }
}

impl fmt::Display for EllipsoidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EllipsoidId {
    type Err = ProjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "wgs84" => Ok(EllipsoidId::Wgs84),
            "beijing54" | "bj54" | "krasovsky" | "krass" => Ok(EllipsoidId::Beijing54),
            _ => Err(ProjError::InvalidParameter(format!("unknown ellipsoid: {s}"))),
        }
    }
}
