//! Metrics extractor for flat tagged event logs

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::util::time_range_hours;
use crate::conversion::synthesize::case_id_of;
use crate::event_log::constants::{ACTIVITY_NAME, RESOURCE_NAME, TIMESTAMP_NAME};
use crate::event_log::EditableAttributes;
use crate::table::table_struct::SchemaError;
use crate::EventLog;

/// Descriptive statistics of one flat tagged event log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventLogMetrics {
    /// Total number of events
    pub num_events: usize,
    /// Distinct normalized case identifiers (blank and missing ids
    /// collapse to the system case)
    pub num_cases: usize,
    /// Distinct activity values
    pub num_activities: usize,
    /// Distinct resource values
    pub num_resources: usize,
    /// Distinct event-level attribute keys
    pub num_event_attributes: usize,
    /// Distinct trace-level attribute keys
    pub num_case_attributes: usize,
    /// Events per case (0 for an empty log)
    pub avg_events_per_case: f64,
    /// Mean elapsed hours between the first and last event of a case
    pub avg_case_duration_hours: f64,
    /// Elapsed hours between the earliest and latest event timestamp
    pub time_range_hours: f64,
    /// Mode of the activity values (ties break to the smallest name)
    pub most_frequent_activity: Option<String>,
    /// Mode of the resource values (ties break to the smallest name)
    pub most_active_resource: Option<String>,
}

fn mode(counts: HashMap<String, usize>) -> Option<String> {
    counts
        .into_iter()
        .max_by(|(name_a, count_a), (name_b, count_b)| {
            count_a.cmp(count_b).then(name_b.cmp(name_a))
        })
        .map(|(name, _)| name)
}

/// Compute [`EventLogMetrics`] for a flat event log in a single pass
///
/// Fails fast with a [`SchemaError`] if the log contains events but none of
/// them carries the activity or timestamp field. Events without a parseable
/// timestamp are excluded from duration and range computation. Case counts
/// and per-case averages are taken over distinct normalized case identifiers,
/// so traces sharing an identifier (or all lacking one) merge into one case.
pub fn log_metrics(log: &EventLog) -> Result<EventLogMetrics, SchemaError> {
    let num_events = log.num_events();
    let mut activity_counts: HashMap<String, usize> = HashMap::new();
    let mut resource_counts: HashMap<String, usize> = HashMap::new();
    let mut event_attr_keys: HashSet<&str> = HashSet::new();
    let mut case_attr_keys: HashSet<&str> = HashSet::new();
    let mut timestamps = Vec::new();
    // Traces sharing a normalized case identifier count as one case
    let mut case_timestamps: HashMap<String, Vec<chrono::DateTime<chrono::FixedOffset>>> =
        HashMap::new();
    let mut any_activity = false;
    let mut any_timestamp = false;

    for trace in &log.traces {
        for attr in &trace.attributes {
            case_attr_keys.insert(attr.key.as_str());
        }
        let case_times = case_timestamps.entry(case_id_of(&trace.attributes)).or_default();
        for event in &trace.events {
            for attr in &event.attributes {
                event_attr_keys.insert(attr.key.as_str());
            }
            if let Some(attr) = event.attributes.get_by_key(ACTIVITY_NAME) {
                any_activity = true;
                *activity_counts.entry(attr.value.to_string()).or_default() += 1;
            }
            if let Some(attr) = event
                .attributes
                .get_by_key(RESOURCE_NAME)
                .filter(|a| !a.value.is_none())
            {
                *resource_counts.entry(attr.value.to_string()).or_default() += 1;
            }
            if let Some(attr) = event.attributes.get_by_key(TIMESTAMP_NAME) {
                any_timestamp = true;
                if let Some(dt) = attr.value.try_as_date() {
                    timestamps.push(*dt);
                    case_times.push(*dt);
                }
            }
        }
    }

    if num_events > 0 {
        let mut missing = Vec::new();
        if !any_activity {
            missing.push(ACTIVITY_NAME.to_string());
        }
        if !any_timestamp {
            missing.push(TIMESTAMP_NAME.to_string());
        }
        if !missing.is_empty() {
            return Err(SchemaError { missing });
        }
    }

    let num_cases = case_timestamps.len();
    let total_case_duration: f64 = case_timestamps
        .values()
        .map(|times| time_range_hours(times.iter().copied()))
        .sum();
    Ok(EventLogMetrics {
        num_events,
        num_cases,
        num_activities: activity_counts.len(),
        num_resources: resource_counts.len(),
        num_event_attributes: event_attr_keys.len(),
        num_case_attributes: case_attr_keys.len(),
        avg_events_per_case: if num_cases > 0 {
            num_events as f64 / num_cases as f64
        } else {
            0.0
        },
        avg_case_duration_hours: if num_cases > 0 {
            total_case_duration / num_cases as f64
        } else {
            0.0
        },
        time_range_hours: time_range_hours(timestamps),
        most_frequent_activity: mode(activity_counts),
        most_active_resource: mode(resource_counts),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::table_to_log::{table_to_log, TableConversionOptions};
    use crate::table::csv_import::{import_table, CsvImportOptions};

    fn log(csv: &str) -> EventLog {
        let table = import_table(csv.as_bytes(), &CsvImportOptions::default()).unwrap();
        table_to_log(&table, &TableConversionOptions::default()).unwrap()
    }

    #[test]
    fn test_basic_metrics() {
        let l = log(
            "case_id,activity,timestamp,resource\n\
             c1,register,2023-10-06 09:00:00,alice\n\
             c1,approve,2023-10-06 12:00:00,bob\n\
             c2,register,2023-10-06 10:00:00,alice\n",
        );
        let m = log_metrics(&l).unwrap();
        assert_eq!(m.num_events, 3);
        assert_eq!(m.num_cases, 2);
        assert_eq!(m.num_activities, 2);
        assert_eq!(m.num_resources, 2);
        assert!((m.avg_events_per_case - 1.5).abs() < 1e-9);
        assert_eq!(m.most_frequent_activity, Some("register".to_string()));
        assert_eq!(m.most_active_resource, Some("alice".to_string()));
        assert!((m.time_range_hours - 3.0).abs() < 1e-9);
        // c1 spans 3h, c2 spans 0h
        assert!((m.avg_case_duration_hours - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_log_is_zero_valued() {
        let m = log_metrics(&EventLog::new()).unwrap();
        assert_eq!(m.num_events, 0);
        assert_eq!(m.num_cases, 0);
        assert_eq!(m.avg_events_per_case, 0.0);
        assert_eq!(m.most_frequent_activity, None);
    }

    #[test]
    fn test_duplicate_case_ids_count_as_one_case() {
        use crate::event_log::constants::TRACE_ID_NAME;
        use crate::event_log::event_log_struct::{Attribute, AttributeValue, Event, Trace};

        let mut l = EventLog::new();
        for _ in 0..2 {
            let mut t = Trace::new();
            t.attributes.push(Attribute::new(
                TRACE_ID_NAME.to_string(),
                AttributeValue::String("c1".to_string()),
            ));
            let mut e = Event::new("register".to_string());
            e.attributes.push(Attribute::new(
                TIMESTAMP_NAME.to_string(),
                AttributeValue::Date("2023-10-06T09:00:00+00:00".parse().unwrap()),
            ));
            t.events.push(e);
            l.traces.push(t);
        }
        let m = log_metrics(&l).unwrap();
        assert_eq!(m.num_cases, 1);
        assert!((m.avg_events_per_case - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_blank_case_ids_merge_into_system_case() {
        use crate::event_log::constants::TRACE_ID_NAME;
        use crate::event_log::event_log_struct::{Attribute, AttributeValue, Event, Trace};

        let mut l = EventLog::new();
        for id in ["", "   "] {
            let mut t = Trace::new();
            t.attributes.push(Attribute::new(
                TRACE_ID_NAME.to_string(),
                AttributeValue::String(id.to_string()),
            ));
            let mut e = Event::new("register".to_string());
            e.attributes.push(Attribute::new(
                TIMESTAMP_NAME.to_string(),
                AttributeValue::Date("2023-10-06T09:00:00+00:00".parse().unwrap()),
            ));
            t.events.push(e);
            l.traces.push(t);
        }
        let m = log_metrics(&l).unwrap();
        assert_eq!(m.num_cases, 1);
    }

    #[test]
    fn test_missing_required_fields() {
        use crate::event_log::event_log_struct::{Event, Trace};
        let mut l = EventLog::new();
        let mut t = Trace::new();
        t.events.push(Event::default());
        l.traces.push(t);
        let err = log_metrics(&l).unwrap_err();
        assert!(err.missing.contains(&ACTIVITY_NAME.to_string()));
        assert!(err.missing.contains(&TIMESTAMP_NAME.to_string()));
    }
}
