//! Regression metrics for the training-time evaluation report
//!
//! These are diagnostics only: the serving path never computes them.

use ndarray::Array1;

/// Collection of regression metrics
#[derive(Debug, Clone)]
pub struct RegressionMetrics {
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// R-squared (coefficient of determination)
    pub r2: f64,
    /// Number of samples
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Calculate all metrics against a held-out split
    pub fn calculate(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let mse = Self::mean_squared_error(y_true, y_pred);
        Self {
            mse,
            rmse: mse.sqrt(),
            mae: Self::mean_absolute_error(y_true, y_pred),
            r2: Self::r_squared(y_true, y_pred),
            n_samples: y_true.len(),
        }
    }

    /// Mean Squared Error: (1/n) * sum((y_true - y_pred)^2)
    pub fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        let n = y_true.len() as f64;
        y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&t, &p)| (t - p).powi(2))
            .sum::<f64>()
            / n
    }

    /// Root Mean Squared Error
    pub fn root_mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        Self::mean_squared_error(y_true, y_pred).sqrt()
    }

    /// Mean Absolute Error: (1/n) * sum(|y_true - y_pred|)
    pub fn mean_absolute_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        let n = y_true.len() as f64;
        y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&t, &p)| (t - p).abs())
            .sum::<f64>()
            / n
    }

    /// R-squared: 1 - SS_res / SS_tot
    pub fn r_squared(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        let y_mean = y_true.mean().unwrap_or(0.0);

        let ss_res: f64 = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&t, &p)| (t - p).powi(2))
            .sum();

        let ss_tot: f64 = y_true.iter().map(|&t| (t - y_mean).powi(2)).sum();

        if ss_tot < 1e-10 {
            return 0.0;
        }

        1.0 - ss_res / ss_tot
    }

    /// Print a summary report
    pub fn report(&self) -> String {
        let mut s = String::new();
        s.push_str("Regression Metrics Report\n");
        s.push_str("=========================\n\n");
        s.push_str(&format!("Samples:     {}\n\n", self.n_samples));
        s.push_str("Error Metrics:\n");
        s.push_str(&format!("  MSE:       {:.6}\n", self.mse));
        s.push_str(&format!("  RMSE:      {:.6}\n", self.rmse));
        s.push_str(&format!("  MAE:       {:.6}\n", self.mae));
        s.push_str("\nGoodness of Fit:\n");
        s.push_str(&format!("  R²:        {:.6}\n", self.r2));
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mse_perfect_fit() {
        let y_true = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let y_pred = y_true.clone();

        let mse = RegressionMetrics::mean_squared_error(&y_true, &y_pred);
        assert!(mse.abs() < 1e-10);
    }

    #[test]
    fn test_r_squared_perfect() {
        let y_true = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let y_pred = y_true.clone();

        let r2 = RegressionMetrics::r_squared(&y_true, &y_pred);
        assert!((r2 - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_rmse_known_value() {
        let y_true = Array1::from_vec(vec![0.0, 0.0]);
        let y_pred = Array1::from_vec(vec![3.0, 4.0]);

        // MSE = (9 + 16) / 2 = 12.5
        let rmse = RegressionMetrics::root_mean_squared_error(&y_true, &y_pred);
        assert!((rmse - 12.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_bundles_everything() {
        let y_true = Array1::from_vec(vec![1.0, 2.0, 3.0]);
        let y_pred = Array1::from_vec(vec![1.0, 2.0, 4.0]);

        let metrics = RegressionMetrics::calculate(&y_true, &y_pred);
        assert_eq!(metrics.n_samples, 3);
        assert!((metrics.mse - 1.0 / 3.0).abs() < 1e-12);
        assert!(metrics.r2 < 1.0);
    }
}
