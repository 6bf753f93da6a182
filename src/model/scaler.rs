//! Feature standardization
//!
//! Per-column affine transform (value - mean) / std, with parameters frozen
//! at fit time. The fitted means and standard deviations are part of the
//! persisted artifacts; inference must never refit.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_STD: f64 = 1e-12;

/// Errors raised while fitting or applying the scaler
#[derive(Error, Debug)]
pub enum ScalerError {
    #[error("column {column} has zero variance; scaling is undefined")]
    DegenerateColumn { column: usize },

    #[error("dimension mismatch: scaler fitted on {expected} columns, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("cannot fit a scaler on an empty matrix")]
    EmptyInput,
}

/// Standard scaler with fitted per-column mean and standard deviation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Array1<f64>,
    stds: Array1<f64>,
}

impl StandardScaler {
    /// Fit on training data
    ///
    /// Uses the population standard deviation. A zero-variance column is
    /// rejected rather than epsilon-guarded: a constant feature in this
    /// dataset means a broken extract, and silently zeroing it would hide
    /// that from the training run.
    pub fn fit(x: &Array2<f64>) -> Result<Self, ScalerError> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ScalerError::EmptyInput);
        }

        let means = x.mean_axis(Axis(0)).expect("non-empty checked above");
        let stds = x.std_axis(Axis(0), 0.0);

        if let Some(column) = stds.iter().position(|&s| s <= MIN_STD) {
            return Err(ScalerError::DegenerateColumn { column });
        }

        Ok(Self { means, stds })
    }

    /// Build a scaler from already-known parameters
    pub fn from_parameters(means: Array1<f64>, stds: Array1<f64>) -> Self {
        assert_eq!(means.len(), stds.len(), "means and stds must pair up");
        Self { means, stds }
    }

    /// Number of columns the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    pub fn means(&self) -> &Array1<f64> {
        &self.means
    }

    pub fn stds(&self) -> &Array1<f64> {
        &self.stds
    }

    /// Apply the frozen transform to a matrix
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ScalerError> {
        if x.ncols() != self.n_features() {
            return Err(ScalerError::DimensionMismatch {
                expected: self.n_features(),
                got: x.ncols(),
            });
        }
        Ok((x - &self.means) / &self.stds)
    }

    /// Apply the frozen transform to a single row
    pub fn transform_row(&self, row: &Array1<f64>) -> Result<Array1<f64>, ScalerError> {
        if row.len() != self.n_features() {
            return Err(ScalerError::DimensionMismatch {
                expected: self.n_features(),
                got: row.len(),
            });
        }
        Ok((row - &self.means) / &self.stds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_transform_standardizes() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
        let scaler = StandardScaler::fit(&x).unwrap();
        let scaled = scaler.transform(&x).unwrap();

        for j in 0..2 {
            let col = scaled.column(j);
            assert!(col.mean().unwrap().abs() < 1e-12);
            assert!((col.std(0.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_training_mean_maps_to_zero_vector() {
        let x = array![[1.0, 10.0], [3.0, 30.0]];
        let scaler = StandardScaler::fit(&x).unwrap();

        let mean_row = array![2.0, 20.0];
        let scaled = scaler.transform_row(&mean_row).unwrap();
        assert!(scaled.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_zero_variance_column_is_rejected() {
        let x = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        let err = StandardScaler::fit(&x).unwrap_err();
        assert!(matches!(err, ScalerError::DegenerateColumn { column: 1 }));
    }

    #[test]
    fn test_transform_dimension_mismatch() {
        let x = array![[1.0, 10.0], [3.0, 30.0]];
        let scaler = StandardScaler::fit(&x).unwrap();
        let err = scaler.transform(&array![[1.0], [2.0]]).unwrap_err();
        assert!(matches!(
            err,
            ScalerError::DimensionMismatch {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_parameters_are_frozen() {
        let train = array![[0.0], [10.0]];
        let scaler = StandardScaler::fit(&train).unwrap();

        // Transforming different data must use the training parameters.
        let other = array![[100.0]];
        let scaled = scaler.transform(&other).unwrap();
        assert!((scaled[[0, 0]] - (100.0 - 5.0) / 5.0).abs() < 1e-12);
    }
}
