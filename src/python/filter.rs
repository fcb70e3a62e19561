//! Python wrapper for KalmanFilter.

use nalgebra::{DMatrix, DVector};
use numpy::ndarray::{Array1, Array2};
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::{PyArithmeticError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyList;

use crate::{Error, Forecast, Gaussian, KalmanFilter};

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        match err {
            Error::SingularInnovationCovariance => PyArithmeticError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

type PyGaussian<'py> = (Bound<'py, PyArray1<f64>>, Bound<'py, PyArray2<f64>>);

/// Linear Kalman filter.
///
/// Example:
///     >>> import numpy as np
///     >>> from kalmanfilter_rs import KalmanFilter
///     >>>
///     >>> kf = KalmanFilter(F, H, Q, R)
///     >>> for y in trajectory:
///     ...     m, P = kf.update(y)
///     >>> m, P = kf.predict_state(10, spot_estimation=True)
#[pyclass(name = "KalmanFilter")]
#[derive(Clone)]
pub struct PyKalmanFilter {
    inner: KalmanFilter,
}

#[pymethods]
impl PyKalmanFilter {
    /// Create a new KalmanFilter.
    ///
    /// Args:
    ///     F: Transition matrix of shape (dim_x, dim_x).
    ///     H: Observation matrix of shape (dim_z, dim_x).
    ///     Q: Process noise covariance of shape (dim_x, dim_x).
    ///     R: Observation noise covariance of shape (dim_z, dim_z).
    ///     m: Optional initial mean of shape (dim_x,). Default: zeros.
    ///     P: Optional initial covariance of shape (dim_x, dim_x). Default: 10 * I.
    #[new]
    #[pyo3(signature = (F, H, Q, R, m=None, P=None))]
    #[allow(non_snake_case)]
    fn new(
        F: PyReadonlyArray2<f64>,
        H: PyReadonlyArray2<f64>,
        Q: PyReadonlyArray2<f64>,
        R: PyReadonlyArray2<f64>,
        m: Option<PyReadonlyArray1<f64>>,
        P: Option<PyReadonlyArray2<f64>>,
    ) -> PyResult<Self> {
        let prior = match (m, P) {
            (Some(m), Some(p)) => Some((numpy_to_dvector(&m), numpy_to_dmatrix(&p))),
            (None, None) => None,
            _ => {
                return Err(PyValueError::new_err(
                    "initial mean and covariance must be given together",
                ))
            }
        };

        let inner = KalmanFilter::from_matrices(
            numpy_to_dmatrix(&F),
            numpy_to_dmatrix(&H),
            numpy_to_dmatrix(&Q),
            numpy_to_dmatrix(&R),
            prior,
        )?;
        Ok(Self { inner })
    }

    /// Assimilate one observation and return the new (mean, covariance).
    fn update<'py>(&mut self, py: Python<'py>, observed_data: PyReadonlyArray1<f64>) -> PyResult<PyGaussian<'py>> {
        let x = numpy_to_dvector(&observed_data);
        let belief = self.inner.assimilate(&x)?;
        Ok(gaussian_to_numpy(py, belief))
    }

    /// Extrapolate the state distribution k steps ahead.
    ///
    /// Returns (mean, covariance) when spot_estimation is true, otherwise a
    /// list of k such pairs.
    #[pyo3(signature = (k, spot_estimation=false))]
    fn predict_state(&self, py: Python<'_>, k: usize, spot_estimation: bool) -> PyResult<PyObject> {
        let forecast = self.inner.predict_state(k, spot_estimation)?;
        Ok(forecast_to_python(py, &forecast))
    }

    /// Extrapolate the observation distribution k steps ahead.
    #[pyo3(signature = (k, spot_estimation=false))]
    fn predict_observation(&self, py: Python<'_>, k: usize, spot_estimation: bool) -> PyResult<PyObject> {
        let forecast = self.inner.predict_observation(k, spot_estimation)?;
        Ok(forecast_to_python(py, &forecast))
    }

    /// Current (mean, covariance).
    #[getter]
    fn current_state<'py>(&self, py: Python<'py>) -> PyGaussian<'py> {
        gaussian_to_numpy(py, self.inner.belief())
    }

    #[getter]
    fn transition_matrix<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        dmatrix_to_numpy(py, self.inner.transition_matrix())
    }

    #[getter]
    fn observation_matrix<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        dmatrix_to_numpy(py, self.inner.observation_matrix())
    }

    #[getter]
    fn process_covariance_matrix<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        dmatrix_to_numpy(py, self.inner.process_noise_covariance())
    }

    #[getter]
    fn observation_covariance_matrix<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        dmatrix_to_numpy(py, self.inner.observation_noise_covariance())
    }

    #[getter]
    fn state_dim(&self) -> usize {
        self.inner.state_dim()
    }

    #[getter]
    fn obs_dim(&self) -> usize {
        self.inner.obs_dim()
    }

    fn __repr__(&self) -> String {
        format!(
            "KalmanFilter(state_dim={}, obs_dim={})",
            self.inner.state_dim(),
            self.inner.obs_dim()
        )
    }
}

fn forecast_to_python(py: Python<'_>, forecast: &Forecast) -> PyObject {
    match forecast {
        Forecast::Spot(g) => gaussian_to_numpy(py, g).into_py(py),
        Forecast::Sequence(steps) => {
            let items: Vec<PyObject> = steps
                .iter()
                .map(|g| gaussian_to_numpy(py, g).into_py(py))
                .collect();
            PyList::new_bound(py, items).into_py(py)
        }
    }
}

fn gaussian_to_numpy<'py>(py: Python<'py>, g: &Gaussian) -> PyGaussian<'py> {
    (dvector_to_numpy(py, &g.mean), dmatrix_to_numpy(py, &g.covariance))
}

/// Helper to convert a 2D numpy array to DMatrix
fn numpy_to_dmatrix(arr: &PyReadonlyArray2<f64>) -> DMatrix<f64> {
    let view = arr.as_array();
    DMatrix::from_fn(view.nrows(), view.ncols(), |i, j| view[[i, j]])
}

fn numpy_to_dvector(arr: &PyReadonlyArray1<f64>) -> DVector<f64> {
    let view = arr.as_array();
    DVector::from_iterator(view.len(), view.iter().cloned())
}

/// Helper to convert DMatrix to 2D numpy array
fn dmatrix_to_numpy<'py>(py: Python<'py>, matrix: &DMatrix<f64>) -> Bound<'py, PyArray2<f64>> {
    let arr = Array2::from_shape_fn((matrix.nrows(), matrix.ncols()), |(i, j)| matrix[(i, j)]);
    arr.into_pyarray_bound(py)
}

fn dvector_to_numpy<'py>(py: Python<'py>, vector: &DVector<f64>) -> Bound<'py, PyArray1<f64>> {
    Array1::from_vec(vector.iter().cloned().collect()).into_pyarray_bound(py)
}
