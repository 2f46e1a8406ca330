//! Flat tabular log struct

use serde::{Deserialize, Serialize};

use crate::event_log::event_log_struct::{Attribute, AttributeValue, Attributes};
use crate::event_log::EditableAttributes;

/// Column name for case identifiers in tabular logs
pub const CASE_COLUMN: &str = "case_id";
/// Column name for activities in tabular logs
pub const ACTIVITY_COLUMN: &str = "activity";
/// Column name for timestamps in tabular logs
pub const TIMESTAMP_COLUMN: &str = "timestamp";
/// Column name for resources in tabular logs
pub const RESOURCE_COLUMN: &str = "resource";

///
/// A flat tabular event log: an ordered list of columns and one typed row per event
///
/// Each row is an [`Attributes`] record in column order; absent cells carry
/// [`AttributeValue::None`]. Cell types are decided once at parse time (see
/// [`super::csv_import`]) and never implicitly re-coerced.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TableLog {
    /// Column names, in file order
    pub columns: Vec<String>,
    /// One record per event, fields in column order
    pub rows: Vec<Attributes>,
}

impl TableLog {
    /// Initializes an empty table log with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Get the value of `column` in `row`, if the column exists and the cell is not absent
    pub fn cell<'a>(&self, row: &'a Attributes, column: &str) -> Option<&'a AttributeValue> {
        row.get_by_key(column)
            .map(|a| &a.value)
            .filter(|v| !v.is_none())
    }

    /// Columns other than the required case/activity/timestamp triple
    pub fn attribute_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| *c != CASE_COLUMN && *c != ACTIVITY_COLUMN && *c != TIMESTAMP_COLUMN)
            .collect()
    }

    /// Fail fast if any of the given required columns is missing, naming all missing ones
    pub fn require_columns(&self, required: &[&str]) -> Result<(), SchemaError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|c| !self.columns.iter().any(|col| col == *c))
            .map(|c| c.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError { missing })
        }
    }

    /// Append a row; fields are expected in column order
    pub fn push_row(&mut self, row: Attributes) {
        self.rows.push(row);
    }
}

/// Required fields are missing from an input log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    /// The missing field names
    pub missing: Vec<String>,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Missing required fields: {}", self.missing.join(", "))
    }
}

impl std::error::Error for SchemaError {}

/// Build a row in column order from (column, value) pairs
pub fn row_from_pairs<I: IntoIterator<Item = (String, AttributeValue)>>(pairs: I) -> Attributes {
    pairs
        .into_iter()
        .map(|(key, value)| Attribute::new(key, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_columns() {
        let table = TableLog::new(vec!["case_id".to_string(), "activity".to_string()]);
        assert!(table.require_columns(&[CASE_COLUMN, ACTIVITY_COLUMN]).is_ok());
        let err = table
            .require_columns(&[CASE_COLUMN, ACTIVITY_COLUMN, TIMESTAMP_COLUMN])
            .unwrap_err();
        assert_eq!(err.missing, vec!["timestamp".to_string()]);
        assert!(err.to_string().contains("timestamp"));
    }

    #[test]
    fn test_attribute_columns() {
        let table = TableLog::new(
            ["case_id", "activity", "timestamp", "resource", "cost"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        assert_eq!(table.attribute_columns(), vec!["resource", "cost"]);
    }
}
