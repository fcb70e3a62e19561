//! Kalman filtering and forecasting.
//!
//! - `KalmanFilter` - Predict/correct recursion plus multi-step forecasts
//! - `Gaussian` / `Belief` - Mean and covariance pairs
//! - `Forecast` - Spot or full-sequence extrapolation results

mod forecast;
mod gaussian;
mod kalman;

pub use forecast::Forecast;
pub use gaussian::{Belief, Gaussian};
pub use kalman::KalmanFilter;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinearGaussianModel;
    use nalgebra::DVector;

    // ===== Forecast/assimilation consistency =====

    #[test]
    fn test_forecast_matches_first_predict_phase() {
        // With infinite observation noise the correction does nothing, so
        // assimilating equals a one-step state forecast. Approximate with huge R.
        let model = LinearGaussianModel::constant_velocity(1, 1.0, 0.1, 1e12).unwrap();
        let mut kf = KalmanFilter::from_model(model).unwrap();
        let forecast = kf.predict_state(1, true).unwrap();
        let expected = forecast.last().unwrap().clone();

        let belief = kf.assimilate(&DVector::from_vec(vec![0.0])).unwrap();
        for i in 0..2 {
            approx::assert_relative_eq!(belief.mean[i], expected.mean[i], epsilon = 1e-9);
            for j in 0..2 {
                approx::assert_relative_eq!(
                    belief.covariance[(i, j)],
                    expected.covariance[(i, j)],
                    epsilon = 1e-6
                );
            }
        }
    }

    #[test]
    fn test_filter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KalmanFilter>();
        assert_send_sync::<Forecast>();
    }
}
