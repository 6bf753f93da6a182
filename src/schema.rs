//! Feature schema and alignment
//!
//! The schema is the contract between training and inference: the exact
//! column names, in the exact order, that the scaler and model were fitted
//! on. Training writes it once; everything downstream treats it as
//! immutable reference data. Alignment reindexes whatever arrives at
//! inference time against it, filling gaps with zero and ignoring extras.

use crate::data::RawTable;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical ordered list of feature column names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in schema order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column in the schema
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Categories encoded for a one-hot field, recovered from column names
    ///
    /// A schema column `land_use_urban` yields `urban` for field `land_use`.
    /// The dropped reference category is not recoverable and is represented
    /// at prediction time by leaving all indicators zero.
    pub fn indicator_categories(&self, field: &str) -> Vec<String> {
        let prefix = format!("{}_", field);
        let mut categories: Vec<String> = self
            .columns
            .iter()
            .filter_map(|c| c.strip_prefix(&prefix))
            .map(|s| s.to_string())
            .collect();
        categories.sort();
        categories
    }

    /// Align a single record to schema order
    ///
    /// Pure and total: schema columns absent from the record become 0.0,
    /// record keys outside the schema are ignored. An empty record yields
    /// the zero vector of schema length.
    pub fn align_record(&self, record: &HashMap<String, f64>) -> Array1<f64> {
        Array1::from_vec(
            self.columns
                .iter()
                .map(|name| record.get(name).copied().unwrap_or(0.0))
                .collect(),
        )
    }

    /// Align every row of a raw table to schema order
    ///
    /// Cells that are missing or non-numeric count as absent and become 0.0.
    pub fn align_table(&self, table: &RawTable) -> Array2<f64> {
        let indices: Vec<Option<usize>> = self
            .columns
            .iter()
            .map(|name| table.column_index(name))
            .collect();

        let mut aligned = Array2::<f64>::zeros((table.n_rows(), self.columns.len()));
        for i in 0..table.n_rows() {
            let row = table.row(i);
            for (j, idx) in indices.iter().enumerate() {
                if let Some(idx) = idx {
                    aligned[[i, j]] = row[*idx].as_number().unwrap_or(0.0);
                }
            }
        }
        aligned
    }
}
