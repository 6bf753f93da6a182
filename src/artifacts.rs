//! Persisted training artifacts
//!
//! Training produces exactly three artifacts: the feature schema, the fitted
//! scaler, and the fitted linear model. They are written as JSON files in a
//! single directory and loaded together at serving start. A missing or
//! corrupt artifact is fatal: there is no fallback prediction without them.

use crate::model::{LinearRegression, StandardScaler};
use crate::schema::FeatureSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const SCHEMA_FILE: &str = "feature_schema.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "linear_model.json";

/// Errors raised while persisting or loading artifacts
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("artifact {path} is missing; run training first")]
    Missing { path: PathBuf },

    #[error("artifact {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The three artifacts a trained pipeline consists of
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub schema: FeatureSchema,
    pub scaler: StandardScaler,
    pub model: LinearRegression,
}

impl Artifacts {
    /// Write all three artifacts into `dir`, creating it when needed
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<(), ArtifactError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|source| ArtifactError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        write_json(&dir.join(SCHEMA_FILE), &self.schema)?;
        write_json(&dir.join(SCALER_FILE), &self.scaler)?;
        write_json(&dir.join(MODEL_FILE), &self.model)?;

        info!(dir = %dir.display(), "saved feature schema, scaler and model artifacts");
        Ok(())
    }

    /// Load all three artifacts from `dir`, failing fast when any is absent
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        let schema: FeatureSchema = read_json(&dir.join(SCHEMA_FILE))?;
        let scaler: StandardScaler = read_json(&dir.join(SCALER_FILE))?;
        let model: LinearRegression = read_json(&dir.join(MODEL_FILE))?;

        info!(
            dir = %dir.display(),
            features = schema.len(),
            "loaded training artifacts"
        );
        Ok(Self {
            schema,
            scaler,
            model,
        })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let file = File::create(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(file, value).map_err(|source| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(file).map_err(|source| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;
    use tempfile::tempdir;

    fn sample_artifacts() -> Artifacts {
        Artifacts {
            schema: FeatureSchema::new(vec!["a".to_string(), "b".to_string()]),
            scaler: StandardScaler::from_parameters(array![1.0, 2.0], array![0.5, 1.5]),
            model: LinearRegression::from_parameters(array![2.0, -1.0], 0.25),
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let artifacts = sample_artifacts();
        artifacts.save(dir.path()).unwrap();

        let loaded = Artifacts::load(dir.path()).unwrap();
        assert_eq!(loaded.schema, artifacts.schema);
        assert_eq!(loaded.scaler.means(), artifacts.scaler.means());
        assert_eq!(loaded.model.coefficients(), artifacts.model.coefficients());
        assert_eq!(loaded.model.intercept(), artifacts.model.intercept());
    }

    #[test]
    fn test_missing_artifact_is_fatal() {
        let dir = tempdir().unwrap();
        let artifacts = sample_artifacts();
        artifacts.save(dir.path()).unwrap();
        std::fs::remove_file(dir.path().join(SCALER_FILE)).unwrap();

        let err = Artifacts::load(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Missing { .. }));
    }

    #[test]
    fn test_corrupt_artifact_is_fatal() {
        let dir = tempdir().unwrap();
        let artifacts = sample_artifacts();
        artifacts.save(dir.path()).unwrap();

        let mut file = File::create(dir.path().join(MODEL_FILE)).unwrap();
        write!(file, "not json").unwrap();
        drop(file);

        let err = Artifacts::load(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Corrupt { .. }));
    }
}
