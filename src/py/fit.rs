//! PyO3 bindings for parameter estimation and application.

use ndarray::Array2;
use numpy::{PyArray2, PyReadonlyArray2};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::batch;
use crate::bursa_wolf::SevenParameters;
use crate::fit::{AxisStats, FitReport};
use crate::similarity::FourParameters;

fn stats_dicts<'py>(py: Python<'py>, stats: &[AxisStats]) -> PyResult<Vec<Bound<'py, PyDict>>> {
    stats
        .iter()
        .map(|s| {
            let d = PyDict::new(py);
            d.set_item("min", s.min)?;
            d.set_item("max", s.max)?;
            d.set_item("mean", s.mean)?;
            d.set_item("std", s.std)?;
            Ok(d)
        })
        .collect()
}

fn report_dict<'py, P, const D: usize>(
    py: Python<'py>,
    report: FitReport<P, [f64; D]>,
) -> PyResult<Bound<'py, PyDict>> {
    let d = PyDict::new(py);
    d.set_item("sigma0", report.sigma0)?;
    d.set_item("rms", report.rms())?;
    d.set_item("point_errors", report.point_errors())?;
    d.set_item("stats", stats_dicts(py, &report.stats)?)?;
    d.set_item(
        "residuals",
        PyArray2::from_owned_array(py, Array2::from(report.residuals)),
    )?;
    Ok(d)
}

/// Fit a four-parameter transform from (n, 2) source to (n, 2) target points.
///
/// Returns:
///     Dict with "parameters" ([a, b, dx, dy]), "scale", "theta" (radians),
///     "sigma0", "rms", "point_errors", "stats" and "residuals".
#[pyfunction]
pub fn fit_four_parameters<'py>(
    py: Python<'py>,
    source: PyReadonlyArray2<'py, f64>,
    target: PyReadonlyArray2<'py, f64>,
) -> PyResult<Bound<'py, PyDict>> {
    let src: Array2<f64> = source.as_array().to_owned();
    let dst: Array2<f64> = target.as_array().to_owned();
    let report = py.allow_threads(move || batch::fit_four_parameters(&src.view(), &dst.view()))?;

    let params = report.parameters;
    let d = report_dict(py, report)?;
    d.set_item("parameters", params.to_array())?;
    d.set_item("scale", params.scale())?;
    d.set_item("theta", params.theta())?;
    Ok(d)
}

/// Fit Bursa-Wolf parameters from (n, 3) source to (n, 3) target points.
///
/// Returns:
///     Dict with "parameters" ([dx, dy, dz, ex, ey, ez, m], radians and
///     dimensionless scale), "sigma0", "rms", "point_errors", "stats" and "residuals".
#[pyfunction]
pub fn fit_seven_parameters<'py>(
    py: Python<'py>,
    source: PyReadonlyArray2<'py, f64>,
    target: PyReadonlyArray2<'py, f64>,
) -> PyResult<Bound<'py, PyDict>> {
    let src: Array2<f64> = source.as_array().to_owned();
    let dst: Array2<f64> = target.as_array().to_owned();
    let report = py.allow_threads(move || batch::fit_seven_parameters(&src.view(), &dst.view()))?;

    let params = report.parameters;
    let d = report_dict(py, report)?;
    d.set_item("parameters", params.to_array())?;
    Ok(d)
}

/// Apply [a, b, dx, dy] to an (n, 2) array of points.
#[pyfunction]
pub fn apply_four_parameters<'py>(
    py: Python<'py>,
    points: PyReadonlyArray2<'py, f64>,
    params: [f64; 4],
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let params = FourParameters::from_array(&params);
    let input: Array2<f64> = points.as_array().to_owned();
    let result = py.allow_threads(move || batch::apply_four_parameters(&input.view(), &params))?;
    Ok(PyArray2::from_owned_array(py, result))
}

/// Apply [dx, dy, dz, ex, ey, ez, m] to an (n, 3) array of points.
#[pyfunction]
pub fn apply_seven_parameters<'py>(
    py: Python<'py>,
    points: PyReadonlyArray2<'py, f64>,
    params: [f64; 7],
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let params = SevenParameters::from_array(&params);
    let input: Array2<f64> = points.as_array().to_owned();
    let result = py.allow_threads(move || batch::apply_seven_parameters(&input.view(), &params))?;
    Ok(PyArray2::from_owned_array(py, result))
}
