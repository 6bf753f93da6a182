//! One-hot encoding with a dropped reference category
//!
//! The categorical land-use field becomes N-1 indicator columns named
//! `<field>_<category>`. Categories are sorted before the first is dropped,
//! which makes the encoding (and therefore the feature schema) deterministic
//! for a given training file.

use crate::data::{RawTable, Value};
use std::collections::BTreeSet;

/// Replace `column` with sorted drop-first indicator columns
///
/// Rows with a missing value map to all-zero indicators and are kept, as do
/// rows holding the dropped reference category. Returns the names of the
/// created columns, or None when `column` does not exist.
pub fn one_hot_drop_first(table: &mut RawTable, column: &str) -> Option<Vec<String>> {
    let cells = table.column(column)?;

    let categories: BTreeSet<String> = cells
        .iter()
        .filter_map(|v| v.as_text())
        .map(|s| s.to_string())
        .collect();

    // Skip the first sorted category; it is encoded as all-zeros.
    let encoded: Vec<String> = categories.iter().skip(1).cloned().collect();

    let indicator_rows: Vec<Vec<f64>> = cells
        .iter()
        .map(|cell| {
            encoded
                .iter()
                .map(|cat| match cell.as_text() {
                    Some(text) if text == cat => 1.0,
                    _ => 0.0,
                })
                .collect()
        })
        .collect();

    let mut created = Vec::with_capacity(encoded.len());
    for (j, cat) in encoded.iter().enumerate() {
        let name = format!("{}_{}", column, cat);
        let values = indicator_rows.iter().map(|r| Value::Number(r[j])).collect();
        table.add_column(&name, values);
        created.push(name);
    }

    table.drop_column(column);
    Some(created)
}
