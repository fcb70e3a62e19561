//! Gaussian distribution described by its first two moments.

use nalgebra::{DMatrix, DVector};

/// Mean vector and covariance matrix of a multivariate Gaussian.
#[derive(Clone, Debug, PartialEq)]
pub struct Gaussian {
    /// Mean vector
    pub mean: DVector<f64>,
    /// Covariance matrix
    pub covariance: DMatrix<f64>,
}

/// The filter's current distribution over the hidden state.
pub type Belief = Gaussian;

impl Gaussian {
    pub fn new(mean: DVector<f64>, covariance: DMatrix<f64>) -> Self {
        Self { mean, covariance }
    }

    /// Zero mean with covariance `scale * I`.
    pub fn diffuse(dim: usize, scale: f64) -> Self {
        Self {
            mean: DVector::zeros(dim),
            covariance: DMatrix::identity(dim, dim) * scale,
        }
    }

    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Split into `(mean, covariance)`.
    pub fn into_parts(self) -> (DVector<f64>, DMatrix<f64>) {
        (self.mean, self.covariance)
    }
}

impl From<(DVector<f64>, DMatrix<f64>)> for Gaussian {
    fn from((mean, covariance): (DVector<f64>, DMatrix<f64>)) -> Self {
        Self::new(mean, covariance)
    }
}
