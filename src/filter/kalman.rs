//! Linear Kalman filter with multi-step forecasting.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace, warn};

use super::forecast::Forecast;
use super::gaussian::{Belief, Gaussian};
use crate::config::KalmanConfig;
use crate::model::LinearGaussianModel;
use crate::utils::is_numerically_singular;
use crate::{Error, Result};

/// Standard discrete-time Kalman filter.
///
/// Owns a fixed [`LinearGaussianModel`] and the current belief over the
/// hidden state. [`assimilate`](Self::assimilate) is the only operation that
/// changes the belief; forecasts work on copies.
#[derive(Clone, Debug)]
pub struct KalmanFilter {
    model: LinearGaussianModel,
    belief: Belief,
}

impl KalmanFilter {
    /// Create a filter from a configuration.
    ///
    /// # Errors
    /// * `Error::ShapeMismatch` - prior mean or covariance has the wrong shape
    /// * `Error::InvalidConfig` - bad covariance scale or tolerance
    /// * `Error::NotPositiveSemidefinite` - only with `check_covariances`
    pub fn new(config: KalmanConfig) -> Result<Self> {
        let belief = config.initial_belief()?;
        debug!(
            state_dim = config.model.state_dim(),
            obs_dim = config.model.obs_dim(),
            "created Kalman filter"
        );
        Ok(Self {
            model: config.model,
            belief,
        })
    }

    /// Create a filter with zero mean and `10 * I` prior covariance.
    pub fn from_model(model: LinearGaussianModel) -> Result<Self> {
        Self::new(KalmanConfig::new(model))
    }

    /// Create a filter directly from its matrices.
    ///
    /// # Arguments
    /// * `f` - Transition matrix
    /// * `h` - Observation matrix
    /// * `q` - Process noise covariance
    /// * `r` - Observation noise covariance
    /// * `prior` - Optional initial `(mean, covariance)`
    pub fn from_matrices(
        f: DMatrix<f64>,
        h: DMatrix<f64>,
        q: DMatrix<f64>,
        r: DMatrix<f64>,
        prior: Option<(DVector<f64>, DMatrix<f64>)>,
    ) -> Result<Self> {
        let mut config = KalmanConfig::new(LinearGaussianModel::new(f, h, q, r)?);
        if let Some((mean, covariance)) = prior {
            config = config.with_prior(mean, covariance);
        }
        Self::new(config)
    }

    /// Assimilate one observation: predict one step, then correct.
    ///
    /// The new belief is committed only once both phases succeed, so on error
    /// the filter is left exactly as it was.
    ///
    /// # Errors
    /// * `Error::DimensionError` - observation length is not `obs_dim`
    /// * `Error::SingularInnovationCovariance` - `H P Hᵀ + R` cannot be inverted
    pub fn assimilate(&mut self, observation: &DVector<f64>) -> Result<&Belief> {
        if observation.len() != self.obs_dim() {
            return Err(Error::DimensionError {
                expected: self.obs_dim(),
                got: observation.len(),
            });
        }

        let predicted = self.predict_step(&self.belief);
        let posterior = self.correct(predicted, observation)?;

        self.belief = posterior;
        Ok(&self.belief)
    }

    /// Assimilate a sequence of observations in order.
    ///
    /// Returns the posterior after each observation. Stops at the first
    /// failing observation; beliefs from earlier observations stay committed.
    pub fn assimilate_all<'a, I>(&mut self, observations: I) -> Result<Vec<Belief>>
    where
        I: IntoIterator<Item = &'a DVector<f64>>,
    {
        observations
            .into_iter()
            .map(|x| self.assimilate(x).cloned())
            .collect()
    }

    /// Extrapolate the state distribution `k` steps ahead.
    ///
    /// # Arguments
    /// * `k` - Number of steps, at least 1
    /// * `spot_estimation` - Return only step `k` instead of steps `1..=k`
    ///
    /// # Errors
    /// `Error::InvalidStepCount` if `k == 0`.
    pub fn predict_state(&self, k: usize, spot_estimation: bool) -> Result<Forecast> {
        let steps = self.state_trajectory(k)?;
        trace!(k, spot_estimation, "state forecast");
        Ok(Forecast::from_steps(steps, spot_estimation))
    }

    /// Extrapolate the observation distribution `k` steps ahead.
    ///
    /// Each step's state distribution is projected through the observation
    /// model: mean `H m`, covariance `H P Hᵀ + R`.
    ///
    /// # Errors
    /// `Error::InvalidStepCount` if `k == 0`.
    pub fn predict_observation(&self, k: usize, spot_estimation: bool) -> Result<Forecast> {
        // Every intermediate state is needed, even for a spot forecast
        let h = self.model.observation_matrix();
        let r = self.model.observation_noise_covariance();
        let steps = self
            .state_trajectory(k)?
            .iter()
            .map(|s| Gaussian::new(h * &s.mean, h * &s.covariance * h.transpose() + r))
            .collect();
        trace!(k, spot_estimation, "observation forecast");
        Ok(Forecast::from_steps(steps, spot_estimation))
    }

    /// Current belief.
    #[inline(always)]
    pub fn belief(&self) -> &Belief {
        &self.belief
    }

    /// Copies of the current `(mean, covariance)`.
    pub fn current_state(&self) -> (DVector<f64>, DMatrix<f64>) {
        self.belief.clone().into_parts()
    }

    /// Copy of the current mean.
    pub fn mean(&self) -> DVector<f64> {
        self.belief.mean.clone()
    }

    /// Copy of the current covariance.
    pub fn covariance(&self) -> DMatrix<f64> {
        self.belief.covariance.clone()
    }

    #[inline(always)]
    pub fn model(&self) -> &LinearGaussianModel {
        &self.model
    }

    #[inline(always)]
    pub fn transition_matrix(&self) -> &DMatrix<f64> {
        self.model.transition_matrix()
    }

    #[inline(always)]
    pub fn observation_matrix(&self) -> &DMatrix<f64> {
        self.model.observation_matrix()
    }

    #[inline(always)]
    pub fn process_noise_covariance(&self) -> &DMatrix<f64> {
        self.model.process_noise_covariance()
    }

    #[inline(always)]
    pub fn observation_noise_covariance(&self) -> &DMatrix<f64> {
        self.model.observation_noise_covariance()
    }

    #[inline(always)]
    pub fn state_dim(&self) -> usize {
        self.model.state_dim()
    }

    #[inline(always)]
    pub fn obs_dim(&self) -> usize {
        self.model.obs_dim()
    }

    // m = F @ m
    // P = F @ P @ F.T + Q
    fn predict_step(&self, belief: &Belief) -> Belief {
        let f = self.model.transition_matrix();
        Gaussian::new(
            f * &belief.mean,
            f * &belief.covariance * f.transpose() + self.model.process_noise_covariance(),
        )
    }

    fn correct(&self, predicted: Belief, x: &DVector<f64>) -> Result<Belief> {
        let h = self.model.observation_matrix();
        let Gaussian { mean: m, covariance: p } = predicted;

        // S = H @ P @ H.T + R (innovation covariance)
        let pht = &p * h.transpose();
        let s = h * &pht + self.model.observation_noise_covariance();

        let si = if is_numerically_singular(&s) {
            None
        } else {
            s.clone().try_inverse()
        };
        let si = match si {
            Some(si) if si.iter().all(|v| v.is_finite()) => si,
            _ => {
                warn!(obs_dim = self.obs_dim(), "innovation covariance is singular");
                return Err(Error::SingularInnovationCovariance);
            }
        };

        // K = P @ H.T @ S^-1 (Kalman gain)
        let k = pht * si;

        // y = x - H @ m (innovation)
        let y = x - h * &m;
        trace!(innovation_norm = y.norm(), "assimilating observation");

        let mean = m + &k * y;
        let covariance = p - &k * s * k.transpose();
        Ok(Gaussian::new(mean, covariance))
    }

    fn state_trajectory(&self, k: usize) -> Result<Vec<Belief>> {
        if k == 0 {
            return Err(Error::InvalidStepCount(k));
        }

        let mut steps = Vec::new();
        let mut current = self.belief.clone();
        for _ in 0..k {
            current = self.predict_step(&current);
            steps.push(current.clone());
        }
        Ok(steps)
    }
}
