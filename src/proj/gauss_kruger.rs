//! Gauss-Krüger projection: transverse Mercator in narrow 3° or 6° belts.
//!
//! Forward and inverse use the classical series in powers of the longitude
//! difference (forward) and the easting offset (inverse), both to fourth order
//! beyond the leading term. The inverse is polished against the forward series so
//! the pair round-trips to sub-nanoradian level anywhere inside a belt.

use std::f64::consts::FRAC_PI_2;

use log::warn;

use crate::error::ProjError;
use crate::proj::common::MeridianArc;
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::Projection;

const DEFAULT_FALSE_EASTING: f64 = 500_000.0;
const REFINE_MAX_ITER: usize = 10;
const REFINE_TOL: f64 = 1e-12;

/// Longitude width of a projection belt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BeltWidth {
    Three,
    Six,
}

impl BeltWidth {
    pub fn from_degrees(degrees: u32) -> Result<Self, ProjError> {
        match degrees {
            3 => Ok(BeltWidth::Three),
            6 => Ok(BeltWidth::Six),
            _ => Err(ProjError::InvalidParameter(format!(
                "belt width must be 3 or 6 degrees, got {degrees}"
            ))),
        }
    }

    pub fn degrees(self) -> f64 {
        match self {
            BeltWidth::Three => 3.0,
            BeltWidth::Six => 6.0,
        }
    }

    /// Zone number containing longitude `lon` (radians): floor(L° / width) + 1.
    pub fn zone_of(self, lon: f64) -> i32 {
        (lon.to_degrees() / self.degrees()).floor() as i32 + 1
    }

    /// Central meridian of a zone, in radians.
    pub fn central_meridian(self, zone: i32) -> f64 {
        let deg = match self {
            BeltWidth::Six => zone as f64 * 6.0 - 3.0,
            BeltWidth::Three => zone as f64 * 3.0 - 1.5,
        };
        deg.to_radians()
    }
}

/// Which belt a projector works in, and optionally its fixed central meridian.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneConvention {
    pub belt: BeltWidth,
    /// Central meridian in radians. `None` derives it from the data.
    pub central_meridian: Option<f64>,
}

impl ZoneConvention {
    /// Central meridian derived per point from its longitude.
    pub fn auto(belt: BeltWidth) -> Self {
        Self {
            belt,
            central_meridian: None,
        }
    }

    pub fn fixed(belt: BeltWidth, central_meridian: f64) -> Self {
        Self {
            belt,
            central_meridian: Some(central_meridian),
        }
    }

    /// Central meridian to use for a point at longitude `lon`.
    pub fn resolve(&self, lon: f64) -> f64 {
        self.central_meridian
            .unwrap_or_else(|| self.belt.central_meridian(self.belt.zone_of(lon)))
    }
}

impl Default for ZoneConvention {
    fn default() -> Self {
        Self::auto(BeltWidth::Six)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GaussKruger {
    ellipsoid: Ellipsoid,
    zone: ZoneConvention,
    false_easting: f64,
    false_northing: f64,
    arc: MeridianArc,
}

impl GaussKruger {
    pub fn new(ellipsoid: Ellipsoid, zone: ZoneConvention) -> Self {
        Self {
            arc: MeridianArc::new(&ellipsoid),
            ellipsoid,
            zone,
            false_easting: DEFAULT_FALSE_EASTING,
            false_northing: 0.0,
        }
    }

    /// Projector fixed on the central meridian of a numbered zone.
    pub fn for_zone(ellipsoid: Ellipsoid, belt: BeltWidth, zone: i32) -> Result<Self, ProjError> {
        if zone < 1 {
            return Err(ProjError::InvalidParameter(format!(
                "zone number must be positive, got {zone}"
            )));
        }
        Ok(Self::new(
            ellipsoid,
            ZoneConvention::fixed(belt, belt.central_meridian(zone)),
        ))
    }

    pub fn with_false_easting(mut self, false_easting: f64) -> Self {
        self.false_easting = false_easting;
        self
    }

    pub fn with_false_northing(mut self, false_northing: f64) -> Self {
        self.false_northing = false_northing;
        self
    }

    pub fn zone(&self) -> &ZoneConvention {
        &self.zone
    }

    pub fn central_meridian(&self) -> Option<f64> {
        self.zone.central_meridian
    }

    pub fn false_easting(&self) -> f64 {
        self.false_easting
    }

    pub fn false_northing(&self) -> f64 {
        self.false_northing
    }

    /// Forward series about `lon0`. Returns (easting, northing).
    fn project(&self, lon: f64, lat: f64, lon0: f64) -> (f64, f64) {
        let (sin_b, cos_b) = lat.sin_cos();
        let t = sin_b / cos_b;
        let t2 = t * t;
        let eta2 = self.ellipsoid.ep2 * cos_b * cos_b;
        let n = self.ellipsoid.prime_vertical_radius(lat);

        let m = (lon - lon0) * cos_b;
        let m2 = m * m;

        let northing = self.arc.length(lat)
            + n * t
                * m2
                * (0.5
                    + (5.0 - t2 + 9.0 * eta2 + 4.0 * eta2 * eta2) / 24.0 * m2
                    + (61.0 - 58.0 * t2 + t2 * t2) / 720.0 * m2 * m2);
        let easting = n
            * m
            * (1.0
                + (1.0 - t2 + eta2) / 6.0 * m2
                + (5.0 - 18.0 * t2 + t2 * t2 + 14.0 * eta2 - 58.0 * eta2 * t2) / 120.0 * m2 * m2);

        (easting + self.false_easting, northing + self.false_northing)
    }

    /// Inverse series about `lon0`, from the footpoint latitude. Returns (lon, lat).
    fn unproject_series(&self, x: f64, y: f64, lon0: f64) -> Result<(f64, f64), ProjError> {
        let east = x - self.false_easting;
        let bf = self.arc.footpoint(y - self.false_northing)?;

        let (sin_f, cos_f) = bf.sin_cos();
        let tf = sin_f / cos_f;
        let tf2 = tf * tf;
        let eta2 = self.ellipsoid.ep2 * cos_f * cos_f;
        let nf = self.ellipsoid.prime_vertical_radius(bf);

        let q = east / nf;
        let q2 = q * q;

        let dlon = q / cos_f
            * (1.0 - (1.0 + 2.0 * tf2 + eta2) / 6.0 * q2
                + (5.0 + 28.0 * tf2 + 24.0 * tf2 * tf2 + 6.0 * eta2 + 8.0 * eta2 * tf2) / 120.0
                    * q2
                    * q2);
        // t(1 + η²)/(2N²) is t/(2MN) with M = N/(1 + η²)
        let lat = bf
            - tf * (1.0 + eta2) * q2 / 2.0
                * (1.0 - (5.0 + 3.0 * tf2 + eta2 - 9.0 * eta2 * tf2) / 12.0 * q2
                    + (61.0 + 90.0 * tf2 + 45.0 * tf2 * tf2) / 360.0 * q2 * q2);

        Ok((lon0 + dlon, lat))
    }

    /// Inverse about `lon0`, corrected until it reproduces the forward series.
    fn unproject(&self, x: f64, y: f64, lon0: f64) -> Result<(f64, f64), ProjError> {
        self.refine(x, y, lon0, REFINE_MAX_ITER)
    }

    fn refine(&self, x: f64, y: f64, lon0: f64, max_iter: usize) -> Result<(f64, f64), ProjError> {
        let target = self.unproject_series(x, y, lon0)?;
        let (mut lon, mut lat) = target;
        let mut step = f64::INFINITY;

        for _ in 0..max_iter {
            let (xe, ye) = self.project(lon, lat, lon0);
            let (lon_e, lat_e) = self.unproject_series(xe, ye, lon0)?;
            let dlon = target.0 - lon_e;
            let dlat = target.1 - lat_e;
            lon += dlon;
            lat += dlat;
            step = dlon.abs().max(dlat.abs());
            if step < REFINE_TOL {
                return Ok((lon, lat));
            }
        }

        Err(ProjError::DidNotConverge {
            iterations: max_iter,
            residual: step,
        })
    }

    /// Zone number recovered from an easting as round(easting / false_easting).
    ///
    /// Only meaningful when the false easting itself encodes the zone, e.g. a
    /// single exact zone whose eastings stay within half a false easting of it.
    pub fn zone_from_easting(&self, x: f64) -> Result<i32, ProjError> {
        if self.false_easting == 0.0 || !self.false_easting.is_finite() {
            return Err(ProjError::InvalidParameter(
                "zone heuristic needs a non-zero false easting".into(),
            ));
        }
        let zone = (x / self.false_easting).round();
        if !(1.0..=i32::MAX as f64).contains(&zone) {
            return Err(ProjError::InvalidParameter(format!(
                "easting {x} does not encode a valid zone number"
            )));
        }
        Ok(zone as i32)
    }

    /// Inverse projection that ignores any configured central meridian and
    /// re-estimates it with [`GaussKruger::zone_from_easting`].
    pub fn inverse_with_zone_fallback(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let zone = self.zone_from_easting(x)?;
        let lon0 = self.zone.belt.central_meridian(zone);
        warn!(
            "central meridian not given; estimated zone {zone} ({:.1}°) from easting {x:.3}",
            lon0.to_degrees()
        );
        self.unproject(x, y, lon0)
    }
}

impl Projection for GaussKruger {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        if !lon.is_finite() || !(lat.abs() < FRAC_PI_2) {
            return Err(ProjError::InvalidParameter(format!(
                "cannot project lon={lon}, lat={lat}"
            )));
        }
        let lon0 = self.zone.resolve(lon);
        Ok(self.project(lon, lat, lon0))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjError::InvalidParameter(format!(
                "cannot unproject x={x}, y={y}"
            )));
        }
        match self.zone.central_meridian {
            Some(lon0) => self.unproject(x, y, lon0),
            None => self.inverse_with_zone_fallback(x, y),
        }
    }

    fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}
