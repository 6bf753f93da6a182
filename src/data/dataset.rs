//! Numeric dataset for model fitting
//!
//! Contains feature matrix X and target vector y, produced by the
//! preprocessing pipeline from a cleaned raw table.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Dataset for machine learning
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature matrix (n_samples x n_features)
    pub x: Array2<f64>,
    /// Target vector (n_samples)
    pub y: Array1<f64>,
    /// Feature names, in X column order
    pub feature_names: Vec<String>,
    /// Target name
    pub target_name: String,
}

impl Dataset {
    /// Create a new dataset
    pub fn new(
        x: Array2<f64>,
        y: Array1<f64>,
        feature_names: Vec<String>,
        target_name: String,
    ) -> Self {
        assert_eq!(x.nrows(), y.len(), "X rows must match y length");
        assert_eq!(
            x.ncols(),
            feature_names.len(),
            "X columns must match feature names"
        );
        Self {
            x,
            y,
            feature_names,
            target_name,
        }
    }

    /// Get number of samples
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    /// Get number of features
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Split into train and test sets after a seeded shuffle
    ///
    /// The shuffle mirrors the original training procedure so evaluation
    /// numbers stay reproducible for a fixed seed. Ratios outside [0, 1]
    /// are clamped.
    pub fn train_test_split(&self, test_ratio: f64, seed: u64) -> (Dataset, Dataset) {
        let test_ratio = test_ratio.clamp(0.0, 1.0);
        let n = self.n_samples();
        let test_size = (n as f64 * test_ratio).round() as usize;
        let train_size = n - test_size;

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let (train_idx, test_idx) = indices.split_at(train_size);

        let build = |idx: &[usize]| -> Dataset {
            let x = self.x.select(Axis(0), idx);
            let y = Array1::from_vec(idx.iter().map(|&i| self.y[i]).collect());
            Dataset::new(x, y, self.feature_names.clone(), self.target_name.clone())
        };

        (build(train_idx), build(test_idx))
    }
}
