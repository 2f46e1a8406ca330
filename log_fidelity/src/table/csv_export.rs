//! CSV export for [`TableLog`]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::event_log::event_log_struct::AttributeValue;
use crate::table::table_struct::TableLog;

///
/// Export a [`TableLog`] as CSV to a writer
///
/// Absent cells ([`AttributeValue::None`]) are written as empty fields.
///
pub fn export_table<W: Write>(writer: W, table: &TableLog) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&table.columns)?;
    for row in &table.rows {
        let record: Vec<String> = table
            .columns
            .iter()
            .map(|col| match table.cell(row, col) {
                Some(AttributeValue::Date(d)) => d.to_rfc3339(),
                Some(v) => v.to_string(),
                None => String::new(),
            })
            .collect();
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

///
/// Export a [`TableLog`] as CSV to a file path
///
pub fn export_table_path<P: AsRef<Path>>(table: &TableLog, path: P) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    export_table(file, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::csv_import::{import_table, CsvImportOptions};

    #[test]
    fn test_export_import_roundtrip() {
        let csv = "case_id,activity,timestamp,cost\nc1,register,2023-10-06 09:30:21,10\n";
        let table = import_table(csv.as_bytes(), &CsvImportOptions::default()).unwrap();
        let mut out = Vec::new();
        export_table(&mut out, &table).unwrap();
        let table2 = import_table(out.as_slice(), &CsvImportOptions::default()).unwrap();
        assert_eq!(table, table2);
    }
}
