use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::TransformError;

mod fit;
mod geodetic;

impl From<TransformError> for PyErr {
    fn from(e: TransformError) -> Self {
        PyValueError::new_err(e.to_string())
    }
}

/// Register all Python-visible functions and types.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(geodetic::blh_to_xyz, m)?)?;
    m.add_function(wrap_pyfunction!(geodetic::xyz_to_blh, m)?)?;
    m.add_function(wrap_pyfunction!(geodetic::blh_to_xy, m)?)?;
    m.add_function(wrap_pyfunction!(geodetic::xy_to_blh, m)?)?;
    m.add_function(wrap_pyfunction!(fit::fit_four_parameters, m)?)?;
    m.add_function(wrap_pyfunction!(fit::fit_seven_parameters, m)?)?;
    m.add_function(wrap_pyfunction!(fit::apply_four_parameters, m)?)?;
    m.add_function(wrap_pyfunction!(fit::apply_seven_parameters, m)?)?;
    Ok(())
}
