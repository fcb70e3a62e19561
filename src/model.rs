//! Linear-Gaussian state space model.
//!
//! ```text
//! z[n+1] = F z[n] + w,   w ~ N(0, Q)
//! x[n]   = H z[n] + v,   v ~ N(0, R)
//! ```

use nalgebra::DMatrix;

use crate::utils::check_shape;
use crate::{Error, Result};

/// Model matrices of a linear-Gaussian system.
///
/// Shapes are validated once in [`LinearGaussianModel::new`] and the
/// matrices cannot be changed afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGaussianModel {
    f: DMatrix<f64>,
    h: DMatrix<f64>,
    q: DMatrix<f64>,
    r: DMatrix<f64>,
}

impl LinearGaussianModel {
    /// Create a model from its four matrices.
    ///
    /// # Arguments
    /// * `f` - Transition matrix (state_dim x state_dim)
    /// * `h` - Observation matrix (obs_dim x state_dim)
    /// * `q` - Process noise covariance (state_dim x state_dim)
    /// * `r` - Observation noise covariance (obs_dim x obs_dim)
    ///
    /// # Errors
    /// `Error::ShapeMismatch` if any dimension disagrees or a dimension is zero.
    pub fn new(f: DMatrix<f64>, h: DMatrix<f64>, q: DMatrix<f64>, r: DMatrix<f64>) -> Result<Self> {
        let state_dim = f.nrows();
        if state_dim == 0 {
            return Err(Error::ShapeMismatch {
                name: "transition_matrix",
                expected: "non-empty square matrix".to_string(),
                got: format!("({}, {})", f.nrows(), f.ncols()),
            });
        }
        check_shape("transition_matrix", &f, state_dim, state_dim)?;
        check_shape("process_noise_covariance", &q, state_dim, state_dim)?;

        let obs_dim = h.nrows();
        if obs_dim == 0 {
            return Err(Error::ShapeMismatch {
                name: "observation_matrix",
                expected: format!("(obs_dim >= 1, {})", state_dim),
                got: format!("({}, {})", h.nrows(), h.ncols()),
            });
        }
        check_shape("observation_matrix", &h, obs_dim, state_dim)?;
        check_shape("observation_noise_covariance", &r, obs_dim, obs_dim)?;

        Ok(Self { f, h, q, r })
    }

    /// Constant-velocity model with white-noise acceleration.
    ///
    /// State is `[p_1, ..., p_n, v_1, ..., v_n]` and only positions are
    /// observed. Each axis gets the process noise block
    /// `q * [[dt^3/3, dt^2/2], [dt^2/2, dt]]`.
    ///
    /// # Arguments
    /// * `n_dims` - Number of spatial axes
    /// * `dt` - Time step
    /// * `q` - Acceleration noise intensity
    /// * `r` - Observation noise variance per axis
    pub fn constant_velocity(n_dims: usize, dt: f64, q: f64, r: f64) -> Result<Self> {
        if n_dims == 0 {
            return Err(Error::InvalidConfig("n_dims must be at least 1".to_string()));
        }
        let dim_x = n_dims * 2;

        // F = [I, dt*I]
        //     [0,    I]
        let mut f = DMatrix::identity(dim_x, dim_x);
        for i in 0..n_dims {
            f[(i, n_dims + i)] = dt;
        }

        // H = [I, 0]
        let mut h = DMatrix::zeros(n_dims, dim_x);
        for i in 0..n_dims {
            h[(i, i)] = 1.0;
        }

        let mut qm = DMatrix::zeros(dim_x, dim_x);
        for i in 0..n_dims {
            let v = n_dims + i;
            qm[(i, i)] = q * dt.powi(3) / 3.0;
            qm[(i, v)] = q * dt.powi(2) / 2.0;
            qm[(v, i)] = q * dt.powi(2) / 2.0;
            qm[(v, v)] = q * dt;
        }

        let rm = DMatrix::identity(n_dims, n_dims) * r;

        Self::new(f, h, qm, rm)
    }

    /// Transition matrix F.
    #[inline(always)]
    pub fn transition_matrix(&self) -> &DMatrix<f64> {
        &self.f
    }

    /// Observation matrix H.
    #[inline(always)]
    pub fn observation_matrix(&self) -> &DMatrix<f64> {
        &self.h
    }

    /// Process noise covariance Q.
    #[inline(always)]
    pub fn process_noise_covariance(&self) -> &DMatrix<f64> {
        &self.q
    }

    /// Observation noise covariance R.
    #[inline(always)]
    pub fn observation_noise_covariance(&self) -> &DMatrix<f64> {
        &self.r
    }

    #[inline(always)]
    pub fn state_dim(&self) -> usize {
        self.f.nrows()
    }

    #[inline(always)]
    pub fn obs_dim(&self) -> usize {
        self.h.nrows()
    }
}
