//! Training-time preprocessing pipeline
//!
//! Turns a raw historical table into a numeric dataset plus the feature
//! schema the fitted model will expect forever after. The cleaning order
//! matters and mirrors the procedure the model was originally trained with:
//!
//! 1. drop identifier/geographic columns (silently skipped when absent)
//! 2. parse timestamps, derive the hour-of-day feature, drop unparsable rows
//! 3. one-hot encode land use (drop-first, sorted categories)
//! 4. sequential per-column IQR outlier removal
//! 5. drop rows that still have missing cells

pub mod encode;
pub mod outliers;

use crate::data::{Dataset, RawTable, Value};
use crate::schema::FeatureSchema;
use chrono::{DateTime, NaiveDateTime, Timelike};
use ndarray::{Array1, Array2};
use thiserror::Error;
use tracing::info;

pub use encode::one_hot_drop_first;
pub use outliers::{filter_column, iqr_bounds, quantile, OutlierBounds};

/// Errors raised while cleaning a training table
#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("required column '{0}' is missing from the training data")]
    MissingColumn(String),

    #[error("no rows survived cleaning; cannot fit a model")]
    EmptyDataset,
}

/// Column vocabulary the cleaning pipeline operates on
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Identifier/geographic columns removed up front when present
    pub drop_columns: Vec<String>,
    /// Timestamp column parsed into the hour feature
    pub timestamp_column: String,
    /// Name of the derived hour-of-day feature
    pub hour_column: String,
    /// Categorical column expanded into indicator columns
    pub categorical_column: String,
    /// Continuous columns filtered by the IQR rule, in filtering order
    pub outlier_columns: Vec<String>,
    /// Target column (fire radiative power)
    pub target_column: String,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            drop_columns: vec![
                "id".to_string(),
                "latitude".to_string(),
                "longitude".to_string(),
            ],
            timestamp_column: "timestamp".to_string(),
            hour_column: "hour".to_string(),
            categorical_column: "land_use".to_string(),
            outlier_columns: vec![
                "temperature_c".to_string(),
                "humidity_pct".to_string(),
                "wind_speed_kmh".to_string(),
                "frp".to_string(),
            ],
            target_column: "frp".to_string(),
        }
    }
}

/// Preprocessing engine
#[derive(Debug, Default)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Clean a raw table into (dataset, feature schema)
    pub fn run(&self, raw: &RawTable) -> Result<(Dataset, FeatureSchema), PreprocessError> {
        let cfg = &self.config;
        let mut table = raw.clone();

        let drop: Vec<&str> = cfg.drop_columns.iter().map(|s| s.as_str()).collect();
        table.drop_columns(&drop);
        info!(columns = ?cfg.drop_columns, "dropped identifier columns where present");

        self.extract_hour(&mut table)?;

        if !table.has_column(&cfg.categorical_column) {
            return Err(PreprocessError::MissingColumn(cfg.categorical_column.clone()));
        }
        let created = one_hot_drop_first(&mut table, &cfg.categorical_column)
            .expect("categorical column checked above");
        info!(
            column = %cfg.categorical_column,
            indicators = created.len(),
            "one-hot encoded land use"
        );

        // Bounds are recomputed per column on the progressively filtered
        // table; earlier columns change what later columns see.
        for column in &cfg.outlier_columns {
            let removed = filter_column(&mut table, column)
                .ok_or_else(|| PreprocessError::MissingColumn(column.clone()))?;
            info!(column = %column, removed, "IQR outlier filtering");
        }

        // Non-numeric leftovers count as missing here: every surviving cell
        // must be usable in the feature matrix.
        table.retain_rows(|row| row.iter().all(|v| v.as_number().is_some()));
        info!(rows = table.n_rows(), "rows after cleaning");

        self.build_dataset(&table)
    }

    /// Parse the timestamp column, keep its hour of day, drop failed rows
    fn extract_hour(&self, table: &mut RawTable) -> Result<(), PreprocessError> {
        let cfg = &self.config;
        let cells = table
            .column(&cfg.timestamp_column)
            .ok_or_else(|| PreprocessError::MissingColumn(cfg.timestamp_column.clone()))?;

        let hours: Vec<Option<u32>> = cells.iter().map(|v| parse_hour(v)).collect();

        let mut i = 0;
        table.retain_rows(|_| {
            let keep = hours[i].is_some();
            i += 1;
            keep
        });

        let hour_values: Vec<Value> = hours
            .into_iter()
            .flatten()
            .map(|h| Value::Number(h as f64))
            .collect();
        table.add_column(&cfg.hour_column, hour_values);
        table.drop_column(&cfg.timestamp_column);

        info!(
            column = %cfg.hour_column,
            rows = table.n_rows(),
            "derived hour-of-day feature"
        );
        Ok(())
    }

    /// Split the cleaned table into X, y and derive the feature schema
    fn build_dataset(&self, table: &RawTable) -> Result<(Dataset, FeatureSchema), PreprocessError> {
        let cfg = &self.config;
        if !table.has_column(&cfg.target_column) {
            return Err(PreprocessError::MissingColumn(cfg.target_column.clone()));
        }
        if table.n_rows() == 0 {
            return Err(PreprocessError::EmptyDataset);
        }

        let feature_names: Vec<String> = table
            .columns()
            .iter()
            .filter(|c| *c != &cfg.target_column)
            .cloned()
            .collect();

        let n_rows = table.n_rows();
        let n_features = feature_names.len();

        let mut x = Array2::<f64>::zeros((n_rows, n_features));
        for (j, name) in feature_names.iter().enumerate() {
            let values = table.numeric_column(name).expect("column exists");
            for (i, v) in values.into_iter().enumerate() {
                x[[i, j]] = v.expect("non-numeric rows dropped above");
            }
        }

        let y = Array1::from_vec(
            table
                .numeric_column(&cfg.target_column)
                .expect("target checked above")
                .into_iter()
                .map(|v| v.expect("non-numeric rows dropped above"))
                .collect(),
        );

        let schema = FeatureSchema::new(feature_names.clone());
        let dataset = Dataset::new(x, y, feature_names, cfg.target_column.clone());
        Ok((dataset, schema))
    }
}

/// Hour of day from a raw timestamp cell; None when unparsable
fn parse_hour(value: &Value) -> Option<u32> {
    let text = value.as_text()?;
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.hour());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.hour());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.hour());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_fixture() -> RawTable {
        let columns = vec![
            "id", "latitude", "longitude", "timestamp", "temperature_c", "humidity_pct",
            "wind_speed_kmh", "confidence", "fire_detected", "land_use", "frp",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        let mut table = RawTable::new(columns);

        let rows: Vec<(f64, &str, f64, f64, f64, f64, f64, &str, f64)> = vec![
            (1.0, "2023-08-01 14:30:00", 30.0, 40.0, 15.0, 0.9, 1.0, "forest", 120.0),
            (2.0, "2023-08-01 02:00:00", 28.0, 45.0, 12.0, 0.8, 0.0, "urban", 90.0),
            (3.0, "2023-08-02 16:10:00", 31.0, 42.0, 14.0, 0.7, 1.0, "water", 110.0),
            (4.0, "2023-08-02 18:00:00", 29.0, 44.0, 13.0, 0.95, 1.0, "forest", 100.0),
            (5.0, "not a date", 27.0, 41.0, 11.0, 0.6, 0.0, "urban", 95.0),
        ];

        for (id, ts, temp, hum, wind, conf, fire, land, frp) in rows {
            table.push_row(vec![
                Value::Number(id),
                Value::Number(-10.0),
                Value::Number(-50.0),
                Value::Text(ts.to_string()),
                Value::Number(temp),
                Value::Number(hum),
                Value::Number(wind),
                Value::Number(conf),
                Value::Number(fire),
                Value::Text(land.to_string()),
                Value::Number(frp),
            ]);
        }
        table
    }

    #[test]
    fn test_run_produces_schema_in_cleaning_order() {
        let raw = raw_fixture();
        let (dataset, schema) = Preprocessor::default().run(&raw).unwrap();

        // Row with the unparsable timestamp is gone.
        assert_eq!(dataset.n_samples(), 4);

        // Surviving input columns first, then hour, then sorted indicators.
        assert_eq!(
            schema.columns(),
            &[
                "temperature_c".to_string(),
                "humidity_pct".to_string(),
                "wind_speed_kmh".to_string(),
                "confidence".to_string(),
                "fire_detected".to_string(),
                "hour".to_string(),
                "land_use_urban".to_string(),
                "land_use_water".to_string(),
            ]
        );
        assert_eq!(dataset.feature_names, schema.columns());
    }

    #[test]
    fn test_run_extracts_hour() {
        let raw = raw_fixture();
        let (dataset, schema) = Preprocessor::default().run(&raw).unwrap();

        let hour_idx = schema.position("hour").unwrap();
        assert_eq!(dataset.x[[0, hour_idx]], 14.0);
        assert_eq!(dataset.x[[1, hour_idx]], 2.0);
    }

    #[test]
    fn test_missing_categorical_column_is_schema_error() {
        let mut raw = raw_fixture();
        raw.drop_column("land_use");
        let err = Preprocessor::default().run(&raw).unwrap_err();
        assert!(matches!(err, PreprocessError::MissingColumn(c) if c == "land_use"));
    }

    #[test]
    fn test_missing_continuous_column_is_schema_error() {
        let mut raw = raw_fixture();
        raw.drop_column("humidity_pct");
        let err = Preprocessor::default().run(&raw).unwrap_err();
        assert!(matches!(err, PreprocessError::MissingColumn(c) if c == "humidity_pct"));
    }

    #[test]
    fn test_sequential_iqr_is_order_dependent() {
        // Column a's outlier row carries b's only extreme value; once a is
        // filtered first, b sees no outliers at all.
        let mut table = RawTable::new(vec!["a".into(), "b".into()]);
        let rows = [
            (1.0, 10.0),
            (2.0, 11.0),
            (3.0, 12.0),
            (4.0, 13.0),
            (5.0, 14.0),
            (100.0, 500.0),
        ];
        for (a, b) in rows {
            table.push_row(vec![Value::Number(a), Value::Number(b)]);
        }

        let mut forward = table.clone();
        filter_column(&mut forward, "a").unwrap();
        let removed_b_after_a = filter_column(&mut forward, "b").unwrap();
        assert_eq!(removed_b_after_a, 0);

        let mut reverse = table.clone();
        let removed_b_first = filter_column(&mut reverse, "b").unwrap();
        assert_eq!(removed_b_first, 1);
    }

    #[test]
    fn test_parse_hour_formats() {
        assert_eq!(
            parse_hour(&Value::Text("2023-01-05 23:59:59".into())),
            Some(23)
        );
        assert_eq!(
            parse_hour(&Value::Text("2023-01-05T07:00:00".into())),
            Some(7)
        );
        assert_eq!(
            parse_hour(&Value::Text("2023-01-05T07:00:00+03:00".into())),
            Some(7)
        );
        assert_eq!(parse_hour(&Value::Text("yesterday".into())), None);
        assert_eq!(parse_hour(&Value::Missing), None);
    }
}
