pub mod common;
pub mod ellipsoid;
pub mod gauss_kruger;
pub mod geocentric;
pub mod pipeline;

use crate::error::ProjError;
use crate::point::{GeodeticPoint, ProjectedPoint};

/// A conformal map projection of one reference ellipsoid onto a plane.
///
/// Angles are radians. Plane coordinates come back as `(easting, northing)`.
pub trait Projection: Send + Sync {
    /// (lon, lat) -> (easting, northing)
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError>;

    /// (easting, northing) -> (lon, lat)
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError>;

    fn ellipsoid(&self) -> &ellipsoid::Ellipsoid;

    /// Project a geodetic point, carrying its height through unchanged.
    fn forward_point(&self, p: GeodeticPoint) -> Result<ProjectedPoint, ProjError> {
        let (easting, northing) = self.forward(p.l, p.b)?;
        Ok(ProjectedPoint::new(northing, easting, p.h))
    }

    /// Unproject a plane point, carrying its height through unchanged.
    fn inverse_point(&self, p: ProjectedPoint) -> Result<GeodeticPoint, ProjError> {
        let (lon, lat) = self.inverse(p.y, p.x)?;
        Ok(GeodeticPoint::new(lat, lon, p.h))
    }
}
