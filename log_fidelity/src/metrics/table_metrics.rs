//! Metrics extractor for flat tabular logs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::util::time_range_hours;
use crate::conversion::expand::normalize_case_ids;
use crate::event_log::event_log_struct::AttributeValue;
use crate::table::table_struct::{
    SchemaError, TableLog, ACTIVITY_COLUMN, CASE_COLUMN, TIMESTAMP_COLUMN,
};
use crate::timestamp::parse_timestamp;

/// Delimiters that mark a column as potentially multi-valued
pub const MULTI_VALUE_DELIMITERS: [char; 5] = [';', '|', ',', '&', '+'];

/// Descriptive statistics of one flat tabular log
///
/// Produced once per file, never mutated afterwards; all scoring is pure
/// function application over pairs of snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableMetrics {
    /// Distinct case identifiers after `SYSTEM` normalization
    pub num_cases: usize,
    /// Number of rows
    pub num_events: usize,
    /// Events per case (0 for an empty log)
    pub avg_events_per_case: f64,
    /// Distinct activity values
    pub num_activities: usize,
    /// Columns other than the required case/activity/timestamp triple
    pub num_event_attributes: usize,
    /// Attribute columns containing at least one delimiter-separated value
    pub num_multi_attributes: usize,
    /// Elapsed hours between the earliest and latest parseable timestamp
    pub time_range_hours: f64,
}

/// Compute [`TableMetrics`] for a table in a single pass
///
/// Fails fast with a [`SchemaError`] naming the missing columns if any of
/// `case_id`, `activity` or `timestamp` is absent. Empty case identifiers
/// count under the `SYSTEM` sentinel; unparseable timestamps are excluded
/// from the time range.
pub fn table_metrics(
    table: &TableLog,
    date_format: Option<&str>,
) -> Result<TableMetrics, SchemaError> {
    table.require_columns(&[CASE_COLUMN, ACTIVITY_COLUMN, TIMESTAMP_COLUMN])?;

    let mut cases: HashSet<String> = HashSet::new();
    let mut activities: HashSet<String> = HashSet::new();
    let attribute_columns = table.attribute_columns();
    let mut multi_columns: HashSet<&str> = HashSet::new();
    let mut timestamps = Vec::new();

    for row in &table.rows {
        for case in normalize_case_ids(table.cell(row, CASE_COLUMN)) {
            cases.insert(case);
        }
        if let Some(activity) = table.cell(row, ACTIVITY_COLUMN) {
            activities.insert(activity.to_string());
        }
        match table.cell(row, TIMESTAMP_COLUMN) {
            Some(AttributeValue::Date(d)) => timestamps.push(*d),
            Some(AttributeValue::String(s)) => {
                if let Some(dt) = parse_timestamp(s, date_format) {
                    timestamps.push(dt);
                }
            }
            _ => {}
        }
        for &col in &attribute_columns {
            if multi_columns.contains(col) {
                continue;
            }
            if let Some(AttributeValue::String(s)) = table.cell(row, col) {
                if s.contains(MULTI_VALUE_DELIMITERS) {
                    multi_columns.insert(col);
                }
            }
        }
    }

    let num_events = table.rows.len();
    let num_cases = cases.len();
    Ok(TableMetrics {
        num_cases,
        num_events,
        avg_events_per_case: if num_cases > 0 {
            num_events as f64 / num_cases as f64
        } else {
            0.0
        },
        num_activities: activities.len(),
        num_event_attributes: attribute_columns.len(),
        num_multi_attributes: multi_columns.len(),
        time_range_hours: time_range_hours(timestamps),
    })
}
