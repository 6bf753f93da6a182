//! Ordinary least squares linear regression
//!
//! Fits by solving the normal equations with a Cholesky decomposition,
//! falling back to an iterative solver when the system is too close to
//! singular. The fitted coefficients and intercept are the model artifact.

use ndarray::{concatenate, s, Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during linear regression
#[derive(Error, Debug)]
pub enum LinearRegressionError {
    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("computation error: {0}")]
    Computation(String),
}

/// Fitted linear regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LinearRegression {
    /// Fit with an intercept by ordinary least squares
    ///
    /// Solves the normal equations beta = (X'X)^-1 X'y.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self, LinearRegressionError> {
        if x.nrows() != y.len() {
            return Err(LinearRegressionError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(LinearRegressionError::Computation(
                "cannot fit on an empty matrix".to_string(),
            ));
        }

        // Column of ones for the intercept term.
        let ones = Array2::ones((x.nrows(), 1));
        let x_design = concatenate(Axis(1), &[ones.view(), x.view()])
            .map_err(|e| LinearRegressionError::Computation(e.to_string()))?;

        let xt = x_design.t();
        let xtx = xt.dot(&x_design);
        let xty = xt.dot(y);

        let beta = solve_normal_equations(&xtx, &xty)?;

        Ok(Self {
            intercept: beta[0],
            coefficients: beta.slice(s![1..]).to_owned(),
        })
    }

    /// Build a model from already-known parameters
    pub fn from_parameters(coefficients: Array1<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// Coefficient vector, in feature-schema order
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of features the model was fitted on
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// One score per input row
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, LinearRegressionError> {
        if x.ncols() != self.coefficients.len() {
            return Err(LinearRegressionError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: x.ncols(),
            });
        }
        Ok(x.dot(&self.coefficients) + self.intercept)
    }

    /// Score a single row
    pub fn predict_row(&self, row: &Array1<f64>) -> Result<f64, LinearRegressionError> {
        if row.len() != self.coefficients.len() {
            return Err(LinearRegressionError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: row.len(),
            });
        }
        Ok(row.dot(&self.coefficients) + self.intercept)
    }
}

/// Solve X'X beta = X'y, preferring Cholesky
fn solve_normal_equations(
    xtx: &Array2<f64>,
    xty: &Array1<f64>,
) -> Result<Array1<f64>, LinearRegressionError> {
    let n = xtx.nrows();

    // Tiny diagonal jitter for numerical stability.
    let mut xtx_reg = xtx.clone();
    for i in 0..n {
        xtx_reg[[i, i]] += 1e-10;
    }

    match cholesky_solve(&xtx_reg, xty) {
        Ok(beta) => Ok(beta),
        Err(_) => gradient_solve(&xtx_reg, xty),
    }
}

/// Solve A x = b via Cholesky decomposition (A symmetric positive definite)
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, LinearRegressionError> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }

            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return Err(LinearRegressionError::SingularMatrix);
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * z[j];
        }
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L' x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Ok(x)
}

/// Gradient-descent fallback for near-singular systems
fn gradient_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, LinearRegressionError> {
    let n = a.ncols();
    let mut x = Array1::<f64>::zeros(n);
    let learning_rate = 0.01;
    let max_iter = 1000;
    let tol = 1e-10;

    for _ in 0..max_iter {
        let residual = a.dot(&x) - b;
        let gradient = a.t().dot(&residual);

        let norm: f64 = gradient.iter().map(|&g| g * g).sum::<f64>().sqrt();
        if norm < tol {
            break;
        }

        x = &x - &(&gradient * learning_rate);
    }

    Ok(x)
}
