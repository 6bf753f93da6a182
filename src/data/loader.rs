//! CSV ingestion and prediction output
//!
//! Batch input arrives as a CSV with arbitrary columns; nothing about its
//! shape is trusted. Ingestion failures are recoverable per file: they are
//! reported to the caller and never take the serving process down.

use super::table::{RawTable, Value};
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading or writing batch files
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("{path} contains no data rows")]
    Empty { path: String },
}

/// Load a CSV file into a raw table, keeping all columns as they arrive
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<RawTable, IngestionError> {
    let path_str = path.as_ref().display().to_string();
    let file = File::open(&path).map_err(|source| IngestionError::Io {
        path: path_str.clone(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(file);
    let headers = reader
        .headers()
        .map_err(|source| IngestionError::Malformed {
            path: path_str.clone(),
            source,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();

    let mut table = RawTable::new(headers);
    for record in reader.records() {
        let record = record.map_err(|source| IngestionError::Malformed {
            path: path_str.clone(),
            source,
        })?;
        let mut row: Vec<Value> = record.iter().map(Value::parse).collect();
        // Short rows happen with trailing commas; pad rather than reject.
        row.resize(table.n_columns(), Value::Missing);
        table.push_row(row);
    }

    if table.n_rows() == 0 {
        return Err(IngestionError::Empty { path: path_str });
    }

    Ok(table)
}

/// Write the batch output: the input columns plus predicted score and label
pub fn save_predictions<P: AsRef<Path>>(
    table: &RawTable,
    scores: &[f64],
    labels: &[String],
    path: P,
) -> Result<(), IngestionError> {
    assert_eq!(table.n_rows(), scores.len(), "one score per input row");
    assert_eq!(table.n_rows(), labels.len(), "one label per input row");

    let path_str = path.as_ref().display().to_string();
    let file = File::create(&path).map_err(|source| IngestionError::Io {
        path: path_str.clone(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);

    let mut header: Vec<String> = table.columns().to_vec();
    header.push("predicted_frp".to_string());
    header.push("intensity_label".to_string());
    writer
        .write_record(&header)
        .map_err(|source| IngestionError::Malformed {
            path: path_str.clone(),
            source,
        })?;

    for i in 0..table.n_rows() {
        let mut record: Vec<String> = table.row(i).iter().map(|v| v.to_string()).collect();
        record.push(format!("{:.4}", scores[i]));
        record.push(labels[i].clone());
        writer
            .write_record(&record)
            .map_err(|source| IngestionError::Malformed {
                path: path_str.clone(),
                source,
            })?;
    }

    writer.flush().map_err(|source| IngestionError::Io {
        path: path_str,
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "temperature_c,land_use,frp").unwrap();
        writeln!(file, "30.5,forest,120.0").unwrap();
        writeln!(file, "12.0,,80.0").unwrap();
        drop(file);

        let table = load_table(&path).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.get(0, "temperature_c"), Some(&Value::Number(30.5)));
        assert_eq!(
            table.get(0, "land_use"),
            Some(&Value::Text("forest".into()))
        );
        assert!(table.get(1, "land_use").unwrap().is_missing());
    }

    #[test]
    fn test_load_table_nan_cells_are_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nan.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "temperature_c,frp").unwrap();
        writeln!(file, "NaN,120.0").unwrap();
        writeln!(file, "25.0,inf").unwrap();
        drop(file);

        let table = load_table(&path).unwrap();
        assert!(table.get(0, "temperature_c").unwrap().is_missing());
        assert!(table.get(1, "frp").unwrap().is_missing());
    }

    #[test]
    fn test_load_table_empty_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "a,b").unwrap();
        drop(file);

        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, IngestionError::Empty { .. }));
    }

    #[test]
    fn test_load_table_missing_file_is_error() {
        let err = load_table("no/such/file.csv").unwrap_err();
        assert!(matches!(err, IngestionError::Io { .. }));
    }

    #[test]
    fn test_save_predictions_appends_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut table = RawTable::new(vec!["temperature_c".into()]);
        table.push_row(vec![Value::Number(30.0)]);
        table.push_row(vec![Value::Number(10.0)]);

        save_predictions(
            &table,
            &[150.0, 20.0],
            &["High".to_string(), "Low".to_string()],
            &path,
        )
        .unwrap();

        let written = load_table(&path).unwrap();
        assert_eq!(
            written.columns(),
            &[
                "temperature_c".to_string(),
                "predicted_frp".to_string(),
                "intensity_label".to_string()
            ]
        );
        assert_eq!(
            written.get(0, "intensity_label"),
            Some(&Value::Text("High".into()))
        );
        assert_eq!(written.get(1, "predicted_frp"), Some(&Value::Number(20.0)));
    }
}
