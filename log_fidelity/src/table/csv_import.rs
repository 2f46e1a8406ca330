//! CSV import for [`TableLog`]

use std::fmt::Display;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::event_log::event_log_struct::{Attribute, AttributeValue};
use crate::table::table_struct::TableLog;

/// Error type for CSV import
#[derive(Debug)]
pub enum CsvImportError {
    /// CSV parsing error
    Csv(csv::Error),
    /// IO error
    Io(std::io::Error),
}

impl Display for CsvImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(e) => write!(f, "CSV error: {e}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CsvImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<csv::Error> for CsvImportError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

impl From<std::io::Error> for CsvImportError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Options for CSV import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvImportOptions {
    /// Field delimiter (default `,`)
    pub delimiter: u8,
}

impl Default for CsvImportOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Type a raw CSV cell exactly once
///
/// Empty cells become [`AttributeValue::None`]; otherwise boolean, integer and
/// float literals are recognized in that order, with string as the fallback.
/// Timestamp cells stay strings here; importers hand them to
/// [`crate::timestamp::parse_timestamp`] explicitly where a date is required.
fn type_cell(raw: &str) -> AttributeValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return AttributeValue::None();
    }
    match trimmed {
        "true" | "True" | "TRUE" => return AttributeValue::Boolean(true),
        "false" | "False" | "FALSE" => return AttributeValue::Boolean(false),
        _ => {}
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return AttributeValue::Int(n);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return AttributeValue::Float(f);
    }
    AttributeValue::String(trimmed.to_string())
}

///
/// Import a [`TableLog`] from a CSV reader
///
pub fn import_table<R: Read>(
    reader: R,
    options: &CsvImportOptions,
) -> Result<TableLog, CsvImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(reader);
    let columns: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut table = TableLog::new(columns);
    for record in csv_reader.records() {
        let record = record?;
        let row = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let value = record.get(i).map(type_cell).unwrap_or(AttributeValue::None());
                Attribute::new(col.clone(), value)
            })
            .collect();
        table.push_row(row);
    }
    Ok(table)
}

///
/// Import a [`TableLog`] from a CSV file path
///
pub fn import_table_path<P: AsRef<Path>>(
    path: P,
    options: &CsvImportOptions,
) -> Result<TableLog, CsvImportError> {
    let file = File::open(path)?;
    import_table(file, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::table_struct::CASE_COLUMN;

    const CSV: &str = "case_id,activity,timestamp,resource,cost\n\
        c1,register,2023-10-06 09:30:21,alice,10\n\
        ,approve,2023-10-06 11:00:00,bob;carol,10.5\n";

    #[test]
    fn test_import_types_cells_once() {
        let table = import_table(CSV.as_bytes(), &CsvImportOptions::default()).unwrap();
        assert_eq!(table.columns.len(), 5);
        assert_eq!(table.rows.len(), 2);
        // first row: int cost, string resource
        assert_eq!(
            table.cell(&table.rows[0], "cost"),
            Some(&AttributeValue::Int(10))
        );
        assert_eq!(
            table.cell(&table.rows[0], "resource"),
            Some(&AttributeValue::String("alice".to_string()))
        );
        // second row: empty case id is absent, cost typed float
        assert_eq!(table.cell(&table.rows[1], CASE_COLUMN), None);
        assert_eq!(
            table.cell(&table.rows[1], "cost"),
            Some(&AttributeValue::Float(10.5))
        );
    }
}
