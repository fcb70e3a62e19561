//! Python bindings for kalmanfilter-rs using PyO3.
//!
//! The API follows the `bayesianfilter` Python package: `update` assimilates
//! one observation, `predict_state` and `predict_observation` extrapolate.

use pyo3::prelude::*;

mod filter;

pub use filter::PyKalmanFilter;

/// Python module for kalmanfilter-rs.
#[pymodule]
fn _kalmanfilter_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyKalmanFilter>()?;

    // Version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
