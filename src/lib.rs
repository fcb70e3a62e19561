//! # kalmanfilter-rs - Linear Kalman Filtering and Forecasting
//!
//! Rust port of the `bayesianfilter` Python package.
//!
//! Estimates the hidden state of a linear-Gaussian dynamical system from noisy
//! observations and extrapolates that state, and the observations it implies,
//! any number of steps ahead.
//!
//! ## Features
//!
//! - Predict-then-correct Kalman recursion over caller-supplied observations
//! - Multi-step state forecasts (spot or full sequence)
//! - Multi-step observation forecasts through the observation model
//! - Validated, immutable model matrices
//! - Optional Python bindings (`python` feature)
//!
//! ## Example
//!
//! ```rust
//! use kalmanfilter_rs::{KalmanFilter, LinearGaussianModel};
//! use nalgebra::DVector;
//!
//! let model = LinearGaussianModel::constant_velocity(2, 0.1, 0.5, 0.25).unwrap();
//! let mut kf = KalmanFilter::from_model(model).unwrap();
//!
//! kf.assimilate(&DVector::from_vec(vec![1.0, 0.0])).unwrap();
//! let forecast = kf.predict_state(10, false).unwrap();
//! assert_eq!(forecast.len(), 10);
//! ```

// Public modules
pub mod config;
pub mod filter;
pub mod model;
pub mod utils;

// Optional modules
#[cfg(feature = "python")]
pub mod python;

// Re-exports for convenience
pub use config::KalmanConfig;
pub use filter::{Belief, Forecast, Gaussian, KalmanFilter};
pub use model::LinearGaussianModel;

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur while building or running a filter
    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum Error {
        #[error("Shape mismatch for {name}: expected {expected}, got {got}")]
        ShapeMismatch {
            name: &'static str,
            expected: String,
            got: String,
        },

        #[error("Observation has length {got}, expected {expected}")]
        DimensionError { expected: usize, got: usize },

        #[error("Innovation covariance is singular")]
        SingularInnovationCovariance,

        #[error("Invalid step count {0}: forecasts need at least one step")]
        InvalidStepCount(usize),

        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("{0} is not symmetric positive semi-definite")]
        NotPositiveSemidefinite(&'static str),
    }

    /// Result type for filter operations
    pub type Result<T> = std::result::Result<T, Error>;
}
