//! Fixture tests against reference trajectories.
//!
//! Each fixture holds a model, a prior, a sequence of observations with the
//! expected posterior after each one, and the expected forecasts from the
//! final posterior.
//!
//! Run with: cargo test fixture

use nalgebra::{DMatrix, DVector};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use kalmanfilter_rs::{KalmanConfig, KalmanFilter, LinearGaussianModel};

// ============================================================================
// Fixture JSON Schema
// ============================================================================

#[derive(Debug, Deserialize)]
struct Fixture {
    model: ModelJson,
    initial_mean: Vec<f64>,
    initial_covariance: Vec<Vec<f64>>,
    steps: Vec<Step>,
    forecast: Vec<ForecastStep>,
}

#[derive(Debug, Deserialize)]
struct ModelJson {
    transition_matrix: Vec<Vec<f64>>,
    observation_matrix: Vec<Vec<f64>>,
    process_noise_covariance: Vec<Vec<f64>>,
    observation_noise_covariance: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct Step {
    observation: Vec<f64>,
    mean: Vec<f64>,
    covariance: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct ForecastStep {
    state_mean: Vec<f64>,
    state_covariance: Vec<Vec<f64>>,
    observation_mean: Vec<f64>,
    observation_covariance: Vec<Vec<f64>>,
}

// ============================================================================
// Test Helpers
// ============================================================================

fn find_testdata_dir() -> PathBuf {
    let candidates = [
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/fixtures"),
        PathBuf::from("testdata/fixtures"),
        PathBuf::from("../testdata/fixtures"),
    ];

    for candidate in &candidates {
        if candidate.exists() {
            return candidate.clone();
        }
    }
    panic!("Could not find testdata/fixtures directory");
}

fn load_fixture(scenario: &str) -> Fixture {
    let path = find_testdata_dir().join(format!("fixture_{}.json", scenario));

    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));

    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

fn to_matrix(rows: &[Vec<f64>]) -> DMatrix<f64> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, |r| r.len());
    let data: Vec<f64> = rows.iter().flatten().copied().collect();
    DMatrix::from_row_slice(n_rows, n_cols, &data)
}

fn create_filter(fixture: &Fixture) -> KalmanFilter {
    let model = LinearGaussianModel::new(
        to_matrix(&fixture.model.transition_matrix),
        to_matrix(&fixture.model.observation_matrix),
        to_matrix(&fixture.model.process_noise_covariance),
        to_matrix(&fixture.model.observation_noise_covariance),
    )
    .expect("fixture model should be valid");

    let config = KalmanConfig::new(model).with_prior(
        DVector::from_vec(fixture.initial_mean.clone()),
        to_matrix(&fixture.initial_covariance),
    );
    KalmanFilter::new(config).expect("Failed to create filter")
}

fn assert_vector_close(label: &str, actual: &DVector<f64>, expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{}: length mismatch", label);
    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= 1e-9 * e.abs().max(1.0),
            "{}[{}]: got {}, expected {}",
            label,
            i,
            a,
            e
        );
    }
}

fn assert_matrix_close(label: &str, actual: &DMatrix<f64>, expected: &[Vec<f64>]) {
    let expected = to_matrix(expected);
    assert_eq!(actual.shape(), expected.shape(), "{}: shape mismatch", label);
    for i in 0..expected.nrows() {
        for j in 0..expected.ncols() {
            let (a, e) = (actual[(i, j)], expected[(i, j)]);
            assert!(
                (a - e).abs() <= 1e-9 * e.abs().max(1.0),
                "{}[{}, {}]: got {}, expected {}",
                label,
                i,
                j,
                a,
                e
            );
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_fixture_constant_velocity_filtering() {
    let fixture = load_fixture("constant_velocity");
    let mut kf = create_filter(&fixture);

    for (i, step) in fixture.steps.iter().enumerate() {
        let belief = kf
            .assimilate(&DVector::from_vec(step.observation.clone()))
            .unwrap_or_else(|e| panic!("step {}: {}", i, e));

        assert_vector_close(&format!("step {} mean", i), &belief.mean, &step.mean);
        assert_matrix_close(&format!("step {} covariance", i), &belief.covariance, &step.covariance);
    }
}

#[test]
fn test_fixture_constant_velocity_forecast() {
    let fixture = load_fixture("constant_velocity");
    let mut kf = create_filter(&fixture);

    let observations: Vec<DVector<f64>> = fixture
        .steps
        .iter()
        .map(|s| DVector::from_vec(s.observation.clone()))
        .collect();
    kf.assimilate_all(&observations).expect("filtering should succeed");

    let k = fixture.forecast.len();
    let states = kf.predict_state(k, false).unwrap();
    let observed = kf.predict_observation(k, false).unwrap();
    assert_eq!(states.len(), k);
    assert_eq!(observed.len(), k);

    for (i, expected) in fixture.forecast.iter().enumerate() {
        let s = states.get(i).unwrap();
        assert_vector_close(&format!("forecast {} state mean", i), &s.mean, &expected.state_mean);
        assert_matrix_close(
            &format!("forecast {} state covariance", i),
            &s.covariance,
            &expected.state_covariance,
        );

        let o = observed.get(i).unwrap();
        assert_vector_close(
            &format!("forecast {} observation mean", i),
            &o.mean,
            &expected.observation_mean,
        );
        assert_matrix_close(
            &format!("forecast {} observation covariance", i),
            &o.covariance,
            &expected.observation_covariance,
        );
    }
}

#[test]
fn test_fixture_matches_constant_velocity_builder() {
    // The fixture model is the constant-velocity model with dt=0.1, q=0.5, r=0.25
    let fixture = load_fixture("constant_velocity");
    let built = LinearGaussianModel::constant_velocity(2, 0.1, 0.5, 0.25).unwrap();

    assert_matrix_close("F", built.transition_matrix(), &fixture.model.transition_matrix);
    assert_matrix_close("H", built.observation_matrix(), &fixture.model.observation_matrix);
    assert_matrix_close("Q", built.process_noise_covariance(), &fixture.model.process_noise_covariance);
    assert_matrix_close("R", built.observation_noise_covariance(), &fixture.model.observation_noise_covariance);
}
