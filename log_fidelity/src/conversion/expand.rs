//! Multi-Value Expander
//!
//! Explodes delimiter-separated attribute values into the cartesian product
//! of synthetic records, paired with the (normally singleton) list of
//! normalized case identifiers.

use itertools::Itertools;

use crate::event_log::constants::{MULTI_VALUE_DELIMITER, SYSTEM_CASE_ID};
use crate::event_log::event_log_struct::{Attribute, AttributeValue, Attributes};
use crate::table::table_struct::{TableLog, CASE_COLUMN};

/// Normalize a raw case identifier cell to the list of case ids of a record
///
/// Absent, empty and whitespace-only values map to the singleton
/// `["SYSTEM"]`; delimiter-separated values split into one case id per
/// part; any other value maps to its trimmed string form. After this step
/// no record has a null case identifier.
pub fn normalize_case_ids(value: Option<&AttributeValue>) -> Vec<String> {
    let raw = match value {
        None => String::new(),
        Some(v) if v.is_none() => String::new(),
        Some(v) => v.to_string(),
    };
    let ids: Vec<String> = raw
        .split(MULTI_VALUE_DELIMITER)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();
    if ids.is_empty() {
        vec![SYSTEM_CASE_ID.to_string()]
    } else {
        ids
    }
}

/// Split one attribute cell into its multi-value parts
///
/// Only string values containing the delimiter are split (parts are
/// trimmed); every other value is a singleton list.
fn split_cell(value: Option<&AttributeValue>) -> Vec<AttributeValue> {
    match value {
        Some(AttributeValue::String(s)) if s.contains(MULTI_VALUE_DELIMITER) => s
            .split(MULTI_VALUE_DELIMITER)
            .map(|part| AttributeValue::String(part.trim().to_string()))
            .collect(),
        Some(v) => vec![v.clone()],
        None => vec![AttributeValue::None()],
    }
}

/// Expand a single row into the cartesian product of its case identifiers
/// and multi-value attribute splits
///
/// The output count is `|case_ids| × Π |splits of attribute i|`; a row
/// without multi-valued attributes expands to exactly one row with all
/// fields unchanged except the normalized case identifier.
pub fn expand_row(table: &TableLog, row: &Attributes) -> Vec<Attributes> {
    let attr_cols = table.attribute_columns();
    let case_ids = normalize_case_ids(table.cell(row, CASE_COLUMN));
    let splits: Vec<Vec<AttributeValue>> = attr_cols
        .iter()
        .map(|col| split_cell(table.cell(row, col)))
        .collect();
    // multi_cartesian_product over zero iterators yields nothing, but a row
    // without attribute columns still expands to one record
    let combos: Vec<Vec<AttributeValue>> = if splits.is_empty() {
        vec![Vec::new()]
    } else {
        splits
            .iter()
            .map(|values| values.iter().cloned())
            .multi_cartesian_product()
            .collect()
    };

    let mut expanded = Vec::with_capacity(case_ids.len() * combos.len());
    for case_id in &case_ids {
        for combo in &combos {
            let new_row: Attributes = table
                .columns
                .iter()
                .map(|col| {
                    if col == CASE_COLUMN {
                        Attribute::new(
                            col.clone(),
                            AttributeValue::String(case_id.clone()),
                        )
                    } else if let Some(idx) = attr_cols.iter().position(|c| c == col) {
                        Attribute::new(col.clone(), combo[idx].clone())
                    } else {
                        // activity and timestamp pass through unchanged
                        Attribute::new(
                            col.clone(),
                            table
                                .cell(row, col)
                                .cloned()
                                .unwrap_or(AttributeValue::None()),
                        )
                    }
                })
                .collect();
            expanded.push(new_row);
        }
    }
    expanded
}

/// Expand all rows of a table (see [`expand_row`])
pub fn expand_table(table: &TableLog) -> TableLog {
    let mut expanded = TableLog::new(table.columns.clone());
    for row in &table.rows {
        for new_row in expand_row(table, row) {
            expanded.push_row(new_row);
        }
    }
    expanded
}
