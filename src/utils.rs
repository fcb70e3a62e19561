//! Utility functions for shape and covariance validation.

use nalgebra::{DMatrix, DVector};
use crate::{Error, Result};

/// Validate that a matrix has shape (rows, cols).
pub fn check_shape(name: &'static str, matrix: &DMatrix<f64>, rows: usize, cols: usize) -> Result<()> {
    if matrix.shape() != (rows, cols) {
        return Err(Error::ShapeMismatch {
            name,
            expected: format!("({}, {})", rows, cols),
            got: format!("({}, {})", matrix.nrows(), matrix.ncols()),
        });
    }
    Ok(())
}

/// Validate that a vector has the given length.
pub fn check_len(name: &'static str, vector: &DVector<f64>, len: usize) -> Result<()> {
    if vector.len() != len {
        return Err(Error::ShapeMismatch {
            name,
            expected: format!("vector of length {}", len),
            got: format!("vector of length {}", vector.len()),
        });
    }
    Ok(())
}

/// Check that a square matrix is symmetric up to `tolerance`.
pub fn is_symmetric(matrix: &DMatrix<f64>, tolerance: f64) -> bool {
    if !matrix.is_square() {
        return false;
    }
    let n = matrix.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            if (matrix[(i, j)] - matrix[(j, i)]).abs() > tolerance {
                return false;
            }
        }
    }
    true
}

/// Check that a matrix is symmetric positive semi-definite.
///
/// The smallest eigenvalue may dip below zero by `tolerance` scaled with the
/// matrix magnitude, which absorbs rounding in products like `F·P·Fᵀ`.
pub fn is_positive_semidefinite(matrix: &DMatrix<f64>, tolerance: f64) -> bool {
    if !is_symmetric(matrix, tolerance * matrix.amax().max(1.0)) {
        return false;
    }
    if matrix.is_empty() {
        return true;
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return false;
    }

    // Eigenvalues of the symmetric part
    let sym = (matrix + matrix.transpose()) * 0.5;
    let scale = sym.amax().max(1.0);
    let eigenvalues = sym.symmetric_eigen().eigenvalues;
    eigenvalues.iter().all(|&l| l >= -tolerance * scale)
}

/// Check whether a square matrix is singular to working precision.
///
/// The smallest singular value must exceed `n * EPSILON` times the largest,
/// so a rank-deficient matrix whose rounded determinant is merely tiny still
/// counts as singular. Non-finite entries count as singular.
pub fn is_numerically_singular(matrix: &DMatrix<f64>) -> bool {
    if !matrix.is_square() || matrix.is_empty() {
        return true;
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return true;
    }

    let singular_values = matrix.singular_values();
    let largest = singular_values.max();
    let smallest = singular_values.min();
    smallest <= largest * matrix.nrows() as f64 * f64::EPSILON
}

/// Fail with `NotPositiveSemidefinite` unless `matrix` passes
/// [`is_positive_semidefinite`].
pub fn require_positive_semidefinite(name: &'static str, matrix: &DMatrix<f64>, tolerance: f64) -> Result<()> {
    if is_positive_semidefinite(matrix, tolerance) {
        Ok(())
    } else {
        Err(Error::NotPositiveSemidefinite(name))
    }
}
