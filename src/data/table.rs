//! Dynamic table of raw records
//!
//! Incoming data has no fixed shape: a CSV upload or a manual form may carry
//! any subset or superset of the columns the model was trained on. `RawTable`
//! keeps whatever columns arrived, in arrival order, so the alignment layer
//! can reindex them against the persisted feature schema later.

/// A single cell of a raw record
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Numeric cell
    Number(f64),
    /// Non-numeric cell (category names, timestamps)
    Text(String),
    /// Empty cell
    Missing,
}

impl Value {
    /// Parse a CSV field: empty -> Missing, finite numeric -> Number, else Text
    ///
    /// Literal `NaN`/`inf` cells count as missing: a non-finite number can
    /// never feed the feature matrix, and treating it as present would let
    /// it slip past the dropna step and poison the scaler fit.
    pub fn parse(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Value::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            Ok(_) => Value::Missing,
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    /// Numeric view of the cell, if it has one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text view of the cell, if it has one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Missing => Ok(()),
        }
    }
}

/// Column-ordered table of raw records
///
/// Columns keep their arrival order; rows are dense (one cell per column,
/// `Value::Missing` where the source had nothing).
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RawTable {
    /// Create an empty table with the given column names
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row; its length must match the column count
    pub fn push_row(&mut self, row: Vec<Value>) {
        assert_eq!(
            row.len(),
            self.columns.len(),
            "row length must match column count"
        );
        self.rows.push(row);
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in table order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (row, column name)
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Borrow a full row
    pub fn row(&self, row: usize) -> &[Value] {
        &self.rows[row]
    }

    /// All cells of one column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Numeric values of one column; non-numeric cells yield None entries
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx].as_number()).collect())
    }

    /// Drop columns by name, silently ignoring names that are absent
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&i| !names.contains(&self.columns[i].as_str()))
            .collect();
        if keep.len() == self.columns.len() {
            return;
        }
        self.columns = keep.iter().map(|&i| self.columns[i].clone()).collect();
        for row in &mut self.rows {
            *row = keep.iter().map(|&i| row[i].clone()).collect();
        }
    }

    /// Drop a single column by name, ignoring it if absent
    pub fn drop_column(&mut self, name: &str) {
        self.drop_columns(&[name]);
    }

    /// Append a column; the value vector must have one entry per row
    pub fn add_column(&mut self, name: &str, values: Vec<Value>) {
        assert_eq!(
            values.len(),
            self.rows.len(),
            "column length must match row count"
        );
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Keep only rows for which the predicate holds
    pub fn retain_rows<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&[Value]) -> bool,
    {
        self.rows.retain(|row| predicate(row));
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawTable {
        let mut table = RawTable::new(vec!["a".into(), "b".into(), "c".into()]);
        table.push_row(vec![
            Value::Number(1.0),
            Value::Text("x".into()),
            Value::Missing,
        ]);
        table.push_row(vec![
            Value::Number(2.0),
            Value::Text("y".into()),
            Value::Number(3.0),
        ]);
        table
    }

    #[test]
    fn test_value_parse() {
        assert_eq!(Value::parse("1.5"), Value::Number(1.5));
        assert_eq!(Value::parse("forest"), Value::Text("forest".into()));
        assert_eq!(Value::parse("  "), Value::Missing);
    }

    #[test]
    fn test_value_parse_non_finite_is_missing() {
        assert_eq!(Value::parse("NaN"), Value::Missing);
        assert_eq!(Value::parse("nan"), Value::Missing);
        assert_eq!(Value::parse("inf"), Value::Missing);
        assert_eq!(Value::parse("-inf"), Value::Missing);
    }

    #[test]
    fn test_drop_columns_ignores_absent() {
        let mut table = sample();
        table.drop_columns(&["b", "not_there"]);
        assert_eq!(table.columns(), &["a".to_string(), "c".to_string()]);
        assert_eq!(table.row(0).len(), 2);
    }

    #[test]
    fn test_add_column_and_retain() {
        let mut table = sample();
        table.add_column("d", vec![Value::Number(10.0), Value::Number(20.0)]);
        assert_eq!(table.n_columns(), 4);

        table.retain_rows(|row| row[3].as_number() == Some(20.0));
        assert_eq!(table.n_rows(), 1);
        assert_eq!(table.get(0, "a"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn test_numeric_column() {
        let table = sample();
        let col = table.numeric_column("c").unwrap();
        assert_eq!(col, vec![None, Some(3.0)]);
        assert!(table.numeric_column("missing").is_none());
    }
}
