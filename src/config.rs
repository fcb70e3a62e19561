//! Construction options for [`KalmanFilter`](crate::KalmanFilter).

use nalgebra::{DMatrix, DVector};

use crate::filter::{Belief, Gaussian};
use crate::model::LinearGaussianModel;
use crate::utils::{check_len, check_shape, require_positive_semidefinite};
use crate::{Error, Result};

/// Default scale of the identity prior covariance.
pub const DEFAULT_INITIAL_COVARIANCE_SCALE: f64 = 10.0;

/// Default tolerance for the optional covariance checks.
pub const DEFAULT_PSD_TOLERANCE: f64 = 1e-9;

/// Configuration for a Kalman filter.
#[derive(Clone, Debug)]
pub struct KalmanConfig {
    /// Model matrices (F, H, Q, R).
    pub model: LinearGaussianModel,

    /// Prior mean. Zero vector when `None`.
    pub initial_mean: Option<DVector<f64>>,

    /// Prior covariance. `initial_covariance_scale * I` when `None`.
    pub initial_covariance: Option<DMatrix<f64>>,

    /// Scale of the identity prior covariance used when no covariance is given.
    pub initial_covariance_scale: f64,

    /// Reject Q, R and the prior covariance unless they are symmetric PSD.
    pub check_covariances: bool,

    /// Tolerance used by `check_covariances`.
    pub psd_tolerance: f64,
}

impl KalmanConfig {
    /// Create a configuration with an uninformative prior.
    pub fn new(model: LinearGaussianModel) -> Self {
        Self {
            model,
            initial_mean: None,
            initial_covariance: None,
            initial_covariance_scale: DEFAULT_INITIAL_COVARIANCE_SCALE,
            check_covariances: false,
            psd_tolerance: DEFAULT_PSD_TOLERANCE,
        }
    }

    /// Use an explicit prior `(mean, covariance)`.
    pub fn with_prior(mut self, mean: DVector<f64>, covariance: DMatrix<f64>) -> Self {
        self.initial_mean = Some(mean);
        self.initial_covariance = Some(covariance);
        self
    }

    pub fn with_initial_covariance_scale(mut self, scale: f64) -> Self {
        self.initial_covariance_scale = scale;
        self
    }

    pub fn with_covariance_checks(mut self, tolerance: f64) -> Self {
        self.check_covariances = true;
        self.psd_tolerance = tolerance;
        self
    }

    /// Validate the options and resolve the initial belief.
    pub(crate) fn initial_belief(&self) -> Result<Belief> {
        let n = self.model.state_dim();

        if !(self.initial_covariance_scale.is_finite() && self.initial_covariance_scale > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "initial_covariance_scale must be finite and positive, got {}",
                self.initial_covariance_scale
            )));
        }
        if !(self.psd_tolerance.is_finite() && self.psd_tolerance >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "psd_tolerance must be finite and non-negative, got {}",
                self.psd_tolerance
            )));
        }

        let mut belief = Gaussian::diffuse(n, self.initial_covariance_scale);
        if let Some(m) = &self.initial_mean {
            check_len("initial_mean", m, n)?;
            belief.mean = m.clone();
        }
        if let Some(p) = &self.initial_covariance {
            check_shape("initial_covariance", p, n, n)?;
            belief.covariance = p.clone();
        }

        if self.check_covariances {
            let tol = self.psd_tolerance;
            require_positive_semidefinite("process_noise_covariance", self.model.process_noise_covariance(), tol)?;
            require_positive_semidefinite("observation_noise_covariance", self.model.observation_noise_covariance(), tol)?;
            require_positive_semidefinite("initial_covariance", &belief.covariance, tol)?;
        }

        Ok(belief)
    }
}

impl From<LinearGaussianModel> for KalmanConfig {
    fn from(model: LinearGaussianModel) -> Self {
        Self::new(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LinearGaussianModel {
        LinearGaussianModel::constant_velocity(2, 0.1, 0.5, 0.25).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = KalmanConfig::new(model());
        assert!(config.initial_mean.is_none());
        assert!(config.initial_covariance.is_none());
        assert_eq!(config.initial_covariance_scale, 10.0);
        assert!(!config.check_covariances);

        let belief = config.initial_belief().unwrap();
        assert_eq!(belief.mean, DVector::zeros(4));
        assert_eq!(belief.covariance, DMatrix::identity(4, 4) * 10.0);
    }

    #[test]
    fn test_config_custom_scale() {
        let belief = KalmanConfig::new(model())
            .with_initial_covariance_scale(100.0)
            .initial_belief()
            .unwrap();
        assert_eq!(belief.covariance, DMatrix::identity(4, 4) * 100.0);
    }

    #[test]
    fn test_config_invalid_scale() {
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = KalmanConfig::new(model())
                .with_initial_covariance_scale(scale)
                .initial_belief();
            assert!(matches!(result, Err(Error::InvalidConfig(_))), "scale {} accepted", scale);
        }
    }

    #[test]
    fn test_config_prior_shape_mismatch() {
        let result = KalmanConfig::new(model())
            .with_prior(DVector::zeros(3), DMatrix::identity(4, 4))
            .initial_belief();
        assert!(matches!(result, Err(Error::ShapeMismatch { name: "initial_mean", .. })));

        let result = KalmanConfig::new(model())
            .with_prior(DVector::zeros(4), DMatrix::identity(4, 3))
            .initial_belief();
        assert!(matches!(result, Err(Error::ShapeMismatch { name: "initial_covariance", .. })));
    }

    #[test]
    fn test_config_covariance_checks() {
        let mut bad_p = DMatrix::identity(4, 4);
        bad_p[(0, 0)] = -1.0;

        // Unchecked by default
        let config = KalmanConfig::new(model()).with_prior(DVector::zeros(4), bad_p.clone());
        assert!(config.initial_belief().is_ok());

        let result = config.with_covariance_checks(1e-9).initial_belief();
        assert_eq!(result, Err(Error::NotPositiveSemidefinite("initial_covariance")));
    }

    #[test]
    fn test_config_checks_model_noise() {
        let mut r = DMatrix::identity(2, 2);
        r[(0, 1)] = 5.0;
        r[(1, 0)] = 5.0;
        let m = model();
        let model = LinearGaussianModel::new(
            m.transition_matrix().clone(),
            m.observation_matrix().clone(),
            m.process_noise_covariance().clone(),
            r,
        )
        .unwrap();

        let result = KalmanConfig::new(model)
            .with_covariance_checks(1e-9)
            .initial_belief();
        assert_eq!(result, Err(Error::NotPositiveSemidefinite("observation_noise_covariance")));
    }
}
