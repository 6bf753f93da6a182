//! Serving layer: align, scale, predict, classify
//!
//! The `Predictor` owns the loaded artifacts for the life of the process and
//! exposes the two serving surfaces: batch tables and single manual records.
//! Alignment guarantees fixed dimensionality, so any error escaping the
//! prediction path after load indicates an invariant violation, not a normal
//! failure mode.

use crate::artifacts::{ArtifactError, Artifacts};
use crate::data::RawTable;
use crate::model::{LinearRegressionError, ScalerError};
use crate::schema::FeatureSchema;
use ndarray::Array1;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Binary intensity label relative to the session threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intensity {
    High,
    Low,
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intensity::High => write!(f, "High"),
            Intensity::Low => write!(f, "Low"),
        }
    }
}

/// Classify a predicted score against a threshold
///
/// The boundary is inclusive: a score exactly at the threshold is High.
/// The threshold is session configuration, never a model parameter, so the
/// classification boundary can move without retraining.
pub fn classify(score: f64, threshold: f64) -> Intensity {
    if score >= threshold {
        Intensity::High
    } else {
        Intensity::Low
    }
}

/// A single prediction: continuous score plus derived label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub score: f64,
    pub label: Intensity,
}

/// Predictions for a whole batch, row-aligned with the input table
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub scores: Vec<f64>,
    pub labels: Vec<Intensity>,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn high_count(&self) -> usize {
        self.labels.iter().filter(|l| **l == Intensity::High).count()
    }

    pub fn low_count(&self) -> usize {
        self.len() - self.high_count()
    }
}

/// Errors escaping the prediction path; these are defects, not user errors
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("scaler rejected aligned input: {0}")]
    Scaler(#[from] ScalerError),

    #[error("model rejected scaled input: {0}")]
    Model(#[from] LinearRegressionError),
}

/// Loaded-once prediction service
#[derive(Debug, Clone)]
pub struct Predictor {
    artifacts: Artifacts,
}

impl Predictor {
    /// Load artifacts from disk; failure here must keep the process from serving
    pub fn load<P: AsRef<Path>>(artifacts_dir: P) -> Result<Self, ArtifactError> {
        Ok(Self {
            artifacts: Artifacts::load(artifacts_dir)?,
        })
    }

    pub fn new(artifacts: Artifacts) -> Self {
        Self { artifacts }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.artifacts.schema
    }

    /// Align, scale and score every row of a raw table
    pub fn predict_table(
        &self,
        table: &RawTable,
        threshold: f64,
    ) -> Result<BatchOutcome, PredictError> {
        let aligned = self.artifacts.schema.align_table(table);
        debug!(rows = aligned.nrows(), features = aligned.ncols(), "aligned batch");

        let scaled = self.artifacts.scaler.transform(&aligned)?;
        let scores = self.artifacts.model.predict(&scaled)?;

        let labels = scores.iter().map(|&s| classify(s, threshold)).collect();
        Ok(BatchOutcome {
            scores: scores.to_vec(),
            labels,
        })
    }

    /// Score a single manual record
    pub fn predict_record(
        &self,
        record: &HashMap<String, f64>,
        threshold: f64,
    ) -> Result<Prediction, PredictError> {
        let aligned = self.artifacts.schema.align_record(record);
        let score = self.score_aligned(&aligned)?;
        Ok(Prediction {
            score,
            label: classify(score, threshold),
        })
    }

    /// Aligned view of a record, for echoing back what the model will see
    pub fn align_record(&self, record: &HashMap<String, f64>) -> Array1<f64> {
        self.artifacts.schema.align_record(record)
    }

    /// Set the indicator column for a categorical selection
    ///
    /// Follows the training encoding: `<field>_<category>` becomes 1, every
    /// other indicator stays 0. Selections the schema has never seen are
    /// ignored, which also covers the dropped reference category.
    pub fn apply_category(
        &self,
        record: &mut HashMap<String, f64>,
        field: &str,
        category: &str,
    ) -> bool {
        let key = format!("{}_{}", field, category);
        if self.artifacts.schema.contains(&key) {
            record.insert(key, 1.0);
            true
        } else {
            false
        }
    }

    /// Categories selectable for a one-hot encoded field
    pub fn categories(&self, field: &str) -> Vec<String> {
        self.artifacts.schema.indicator_categories(field)
    }

    fn score_aligned(&self, aligned: &Array1<f64>) -> Result<f64, PredictError> {
        let scaled = self.artifacts.scaler.transform_row(aligned)?;
        Ok(self.artifacts.model.predict_row(&scaled)?)
    }
}
