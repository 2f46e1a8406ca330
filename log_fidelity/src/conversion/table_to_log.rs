//! Flat table to [`EventLog`] pipeline
//!
//! Expands multi-value cells, normalizes case identifiers, maps the
//! tabular columns onto XES field keys, and groups rows into traces
//! sorted by (case, timestamp).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::conversion::expand::{expand_table, normalize_case_ids};
use crate::event_log::constants::{RESOURCE_NAME, TIMESTAMP_NAME, TRACE_ID_NAME};
use crate::event_log::event_log_struct::{Attribute, AttributeValue, Event, Trace};
use crate::table::table_struct::{
    SchemaError, TableLog, ACTIVITY_COLUMN, CASE_COLUMN, RESOURCE_COLUMN, TIMESTAMP_COLUMN,
};
use crate::timestamp::parse_timestamp;
use crate::EventLog;

/// Options for the table to event-log conversion
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TableConversionOptions {
    /// Optional custom date format tried first when parsing timestamp cells
    pub date_format: Option<String>,
}

fn parse_row_timestamp(
    value: Option<&AttributeValue>,
    options: &TableConversionOptions,
) -> Option<DateTime<FixedOffset>> {
    match value {
        Some(AttributeValue::Date(d)) => Some(*d),
        Some(AttributeValue::String(s)) => parse_timestamp(s, options.date_format.as_deref()),
        // Unparseable and non-string timestamps coerce to absent
        _ => None,
    }
}

/// Convert a [`TableLog`] to a flat [`EventLog`]
///
/// The `activity` and `timestamp` columns are required; `case_id` is
/// optional and missing or empty case values normalize to the `SYSTEM`
/// sentinel. Rows are sorted by (case identifier, timestamp) with events
/// lacking a parseable timestamp ordered first within their case.
pub fn table_to_log(
    table: &TableLog,
    options: &TableConversionOptions,
) -> Result<EventLog, SchemaError> {
    table.require_columns(&[ACTIVITY_COLUMN, TIMESTAMP_COLUMN])?;
    let expanded = expand_table(table);

    let mut keyed_events: Vec<(String, Option<DateTime<FixedOffset>>, Event)> = expanded
        .rows
        .iter()
        .map(|row| {
            let case_id = normalize_case_ids(expanded.cell(row, CASE_COLUMN))
                .into_iter()
                .next()
                .unwrap_or_default();
            let timestamp = parse_row_timestamp(expanded.cell(row, TIMESTAMP_COLUMN), options);
            let activity = expanded
                .cell(row, ACTIVITY_COLUMN)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "unknown".to_string());

            let mut event = Event::new(activity);
            event.attributes.push(Attribute::new(
                TIMESTAMP_NAME.to_string(),
                match timestamp {
                    Some(dt) => AttributeValue::Date(dt),
                    None => AttributeValue::None(),
                },
            ));
            if let Some(resource) = expanded.cell(row, RESOURCE_COLUMN) {
                event
                    .attributes
                    .push(Attribute::new(RESOURCE_NAME.to_string(), resource.clone()));
            }
            for col in expanded.attribute_columns() {
                if col == RESOURCE_COLUMN {
                    continue;
                }
                if let Some(value) = expanded.cell(row, col) {
                    event
                        .attributes
                        .push(Attribute::new(col.to_string(), value.clone()));
                }
            }
            (case_id, timestamp, event)
        })
        .collect();

    keyed_events.sort_by(|(case_a, time_a, _), (case_b, time_b, _)| {
        case_a.cmp(case_b).then(time_a.cmp(time_b))
    });

    let mut log = EventLog::new();
    for (case_id, _, event) in keyed_events {
        let start_new_trace = log
            .traces
            .last()
            .and_then(|t| {
                t.attributes
                    .iter()
                    .find(|a| a.key == TRACE_ID_NAME)
                    .map(|a| a.value.to_string())
            })
            .map_or(true, |last| last != case_id);
        if start_new_trace {
            let mut trace = Trace::new();
            trace.attributes.push(Attribute::new(
                TRACE_ID_NAME.to_string(),
                AttributeValue::String(case_id),
            ));
            log.traces.push(trace);
        }
        if let Some(trace) = log.traces.last_mut() {
            trace.events.push(event);
        }
    }
    Ok(log)
}
