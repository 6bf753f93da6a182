//! # Fire Radiative Power (FRP) Prediction Pipeline
//!
//! Predicts fire intensity (FRP) from climate and land-use features, in two
//! stages:
//!
//! - **Training** cleans a historical dataset (id/geo column drop, hour
//!   extraction, drop-first one-hot land-use encoding, sequential IQR outlier
//!   removal), fits a standard scaler and an OLS linear model, and persists
//!   the three artifacts: feature schema, scaler, model.
//! - **Inference** loads the artifacts once, aligns any incoming record to
//!   the schema (zero-filling gaps, ignoring extras), scales, predicts, and
//!   classifies the score against a session threshold.
//!
//! ## Modules
//!
//! - `data` - Raw tables, numeric datasets, CSV ingestion
//! - `preprocess` - Training-time cleaning and encoding
//! - `schema` - Feature schema and record alignment
//! - `model` - Standard scaler and linear regression
//! - `metrics` - Training-time evaluation metrics
//! - `artifacts` - Persisting and loading the trained artifacts
//! - `predict` - Batch and single-record serving

pub mod artifacts;
pub mod data;
pub mod metrics;
pub mod model;
pub mod predict;
pub mod preprocess;
pub mod schema;

pub use artifacts::{ArtifactError, Artifacts};
pub use data::{Dataset, IngestionError, RawTable, Value};
pub use metrics::RegressionMetrics;
pub use model::{LinearRegression, StandardScaler};
pub use predict::{classify, BatchOutcome, Intensity, Prediction, Predictor};
pub use preprocess::{PreprocessConfig, PreprocessError, Preprocessor};
pub use schema::FeatureSchema;
