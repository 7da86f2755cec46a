//! PyO3 bindings for geodetic conversion and Gauss-Krüger projection.

use ndarray::Array2;
use numpy::{PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::batch;
use crate::proj::ellipsoid::EllipsoidId;
use crate::proj::gauss_kruger::{BeltWidth, GaussKruger, ZoneConvention};

fn parse_ellipsoid(name: &str) -> PyResult<EllipsoidId> {
    name.parse::<EllipsoidId>()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

fn projector(
    ellipsoid: &str,
    belt: u32,
    central_meridian: Option<f64>,
    false_easting: f64,
    false_northing: f64,
) -> PyResult<GaussKruger> {
    let id = parse_ellipsoid(ellipsoid)?;
    let belt = BeltWidth::from_degrees(belt).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let zone = ZoneConvention {
        belt,
        central_meridian,
    };
    Ok(GaussKruger::new(*id.ellipsoid(), zone)
        .with_false_easting(false_easting)
        .with_false_northing(false_northing))
}

/// Convert geodetic coordinates to geocentric Cartesian.
///
/// Args:
///     blh: (n, 3) array of [B, L, H] with angles in radians.
///     ellipsoid: "WGS84" or "Beijing54".
///
/// Returns:
///     (n, 3) array of [X, Y, Z] in metres.
#[pyfunction]
#[pyo3(signature = (blh, ellipsoid="WGS84"))]
pub fn blh_to_xyz<'py>(
    py: Python<'py>,
    blh: PyReadonlyArray2<'py, f64>,
    ellipsoid: &str,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let id = parse_ellipsoid(ellipsoid)?;
    let input: Array2<f64> = blh.as_array().to_owned();
    let result = py.allow_threads(move || batch::blh_to_xyz(&input.view(), id))?;
    Ok(PyArray2::from_owned_array(py, result))
}

/// Convert geocentric Cartesian coordinates to geodetic [B, L, H].
#[pyfunction]
#[pyo3(signature = (xyz, ellipsoid="WGS84"))]
pub fn xyz_to_blh<'py>(
    py: Python<'py>,
    xyz: PyReadonlyArray2<'py, f64>,
    ellipsoid: &str,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let id = parse_ellipsoid(ellipsoid)?;
    let input: Array2<f64> = xyz.as_array().to_owned();
    let result = py.allow_threads(move || batch::xyz_to_blh(&input.view(), id))?;
    Ok(PyArray2::from_owned_array(py, result))
}

/// Project geodetic coordinates onto the Gauss-Krüger plane.
///
/// Args:
///     bl: (n, 2) array of [B, L] in radians.
///     ellipsoid: "WGS84" or "Beijing54".
///     belt: Belt width in degrees, 3 or 6.
///     central_meridian: Central meridian in radians; derived per point when omitted.
///     false_easting: Added to eastings (default 500000).
///     false_northing: Added to northings (default 0).
///
/// Returns:
///     (n, 2) array of [northing, easting] in metres.
#[pyfunction]
#[pyo3(signature = (
    bl,
    ellipsoid="Beijing54",
    belt=6,
    central_meridian=None,
    false_easting=500000.0,
    false_northing=0.0,
))]
pub fn blh_to_xy<'py>(
    py: Python<'py>,
    bl: PyReadonlyArray2<'py, f64>,
    ellipsoid: &str,
    belt: u32,
    central_meridian: Option<f64>,
    false_easting: f64,
    false_northing: f64,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let gk = projector(ellipsoid, belt, central_meridian, false_easting, false_northing)?;
    let input: Array2<f64> = bl.as_array().to_owned();
    let result = py.allow_threads(move || batch::blh_to_xy(&input.view(), &gk))?;
    Ok(PyArray2::from_owned_array(py, result))
}

/// Unproject Gauss-Krüger [northing, easting] rows to [B, L] in radians.
///
/// Without `central_meridian` the zone number is estimated from the easting,
/// which only works when the false easting encodes the zone.
#[pyfunction]
#[pyo3(signature = (
    xy,
    ellipsoid="Beijing54",
    belt=6,
    central_meridian=None,
    false_easting=500000.0,
    false_northing=0.0,
))]
pub fn xy_to_blh<'py>(
    py: Python<'py>,
    xy: PyReadonlyArray2<'py, f64>,
    ellipsoid: &str,
    belt: u32,
    central_meridian: Option<f64>,
    false_easting: f64,
    false_northing: f64,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let gk = projector(ellipsoid, belt, central_meridian, false_easting, false_northing)?;
    let input: Array2<f64> = xy.as_array().to_owned();
    let result = py.allow_threads(move || batch::xy_to_blh(&input.view(), &gk))?;
    Ok(PyArray2::from_owned_array(py, result))
}
