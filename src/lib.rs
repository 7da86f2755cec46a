//! Geodetic coordinate conversion and similarity-transform estimation.
//!
//! Converts between geodetic (B, L, H), geocentric (X, Y, Z) and Gauss-Krüger
//! plane coordinates on the WGS-84 and Beijing54 ellipsoids, and fits and
//! applies four-parameter (2D) and seven-parameter Bursa-Wolf (3D) transforms.

pub mod api;
pub mod batch;
pub mod bursa_wolf;
pub mod error;
pub mod fit;
pub mod point;
pub mod proj;
pub mod similarity;

#[cfg(feature = "python")]
mod py;

pub use bursa_wolf::SevenParameters;
pub use error::{FitError, ProjError, TransformError};
pub use fit::{FitReport, FourParameterReport, SevenParameterReport};
pub use point::{CartesianPoint, GeodeticPoint, ProjectedPoint};
pub use proj::ellipsoid::{Ellipsoid, EllipsoidId, BEIJING54, WGS84};
pub use proj::gauss_kruger::{BeltWidth, GaussKruger, ZoneConvention};
pub use similarity::FourParameters;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn _rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    py::register(m)?;
    Ok(())
}
