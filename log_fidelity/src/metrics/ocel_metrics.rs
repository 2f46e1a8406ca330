//! Metrics extractor for object-centric event logs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::util::time_range_hours;
use crate::ocel::ocel_struct::OCEL;

/// Descriptive statistics of one object-centric event log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OcelMetrics {
    /// Total number of events
    pub num_events: usize,
    /// Distinct event types observed on events
    pub num_event_types: usize,
    /// Distinct event attribute names
    pub num_event_attributes: usize,
    /// Total number of objects
    pub num_objects: usize,
    /// Distinct object types observed on objects
    pub num_object_types: usize,
    /// Distinct object attribute names
    pub num_object_attributes: usize,
    /// Object attribute values recorded more than once over time
    pub num_dynamic_changes: usize,
    /// Total E2O relationship count
    pub num_e2o_relationships: usize,
    /// Total O2O relationship count (log-level and per-object)
    pub num_o2o_relationships: usize,
    /// E2O relationships per object (0 for a log without objects)
    pub avg_events_per_object: f64,
    /// E2O relationships per event (0 for a log without events)
    pub avg_e2o_per_event: f64,
    /// O2O relationships per object (0 for a log without objects)
    pub avg_o2o_per_object: f64,
    /// Elapsed hours between the earliest and latest event timestamp
    pub time_range_hours: f64,
}

/// Compute [`OcelMetrics`] for an OCEL in a single pass
///
/// Degenerate logs (zero events or objects) yield zero-valued statistics;
/// every ratio has an explicit zero fallback. Events pinned to the Unix
/// epoch sentinel (the synthesizer's placeholder for an unparseable
/// timestamp) are excluded from the time range so one bad record cannot
/// stretch it back to 1970.
pub fn ocel_metrics(ocel: &OCEL) -> OcelMetrics {
    let mut event_types: HashSet<&str> = HashSet::new();
    let mut event_attributes: HashSet<&str> = HashSet::new();
    for event in &ocel.events {
        event_types.insert(event.event_type.as_str());
        for attr in &event.attributes {
            event_attributes.insert(attr.name.as_str());
        }
    }

    let mut object_types: HashSet<&str> = HashSet::new();
    let mut object_attributes: HashSet<&str> = HashSet::new();
    let mut num_dynamic_changes = 0;
    for object in &ocel.objects {
        object_types.insert(object.object_type.as_str());
        let mut seen: HashSet<&str> = HashSet::new();
        for attr in &object.attributes {
            object_attributes.insert(attr.name.as_str());
            if !seen.insert(attr.name.as_str()) {
                num_dynamic_changes += 1;
            }
        }
    }

    let num_events = ocel.events.len();
    let num_objects = ocel.objects.len();
    let num_e2o = ocel.num_e2o_relationships();
    let num_o2o = ocel.num_o2o_relationships();

    OcelMetrics {
        num_events,
        num_event_types: event_types.len(),
        num_event_attributes: event_attributes.len(),
        num_objects,
        num_object_types: object_types.len(),
        num_object_attributes: object_attributes.len(),
        num_dynamic_changes,
        num_e2o_relationships: num_e2o,
        num_o2o_relationships: num_o2o,
        avg_events_per_object: if num_objects > 0 {
            num_e2o as f64 / num_objects as f64
        } else {
            0.0
        },
        avg_e2o_per_event: if num_events > 0 {
            num_e2o as f64 / num_events as f64
        } else {
            0.0
        },
        avg_o2o_per_object: if num_objects > 0 {
            num_o2o as f64 / num_objects as f64
        } else {
            0.0
        },
        time_range_hours: time_range_hours(
            ocel.events
                .iter()
                .filter(|e| e.time != chrono::DateTime::<chrono::Utc>::UNIX_EPOCH)
                .map(|e| e.time.fixed_offset()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::synthesize::{log_to_ocel, SynthesisOptions};
    use crate::conversion::table_to_log::{table_to_log, TableConversionOptions};
    use crate::table::csv_import::{import_table, CsvImportOptions};

    fn sample_ocel() -> OCEL {
        let csv = "case_id,activity,timestamp,resource\n\
            c1,register,2023-10-06 09:00:00,alice\n\
            c1,approve,2023-10-06 12:00:00,bob\n\
            c2,register,2023-10-06 10:00:00,alice\n";
        let table = import_table(csv.as_bytes(), &CsvImportOptions::default()).unwrap();
        let log = table_to_log(&table, &TableConversionOptions::default()).unwrap();
        log_to_ocel(&log, &SynthesisOptions::default())
    }

    #[test]
    fn test_basic_metrics() {
        let m = ocel_metrics(&sample_ocel());
        assert_eq!(m.num_events, 3);
        assert_eq!(m.num_event_types, 2);
        // 2 case objects + 2 resource objects
        assert_eq!(m.num_objects, 4);
        assert_eq!(m.num_object_types, 2);
        // every event links to its case and its resource
        assert_eq!(m.num_e2o_relationships, 6);
        assert_eq!(m.num_o2o_relationships, 0);
        assert!((m.avg_e2o_per_event - 2.0).abs() < 1e-9);
        assert!((m.avg_events_per_object - 1.5).abs() < 1e-9);
        assert!((m.time_range_hours - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_ocel_is_zero_valued() {
        let m = ocel_metrics(&OCEL::new(Vec::new(), Vec::new()));
        assert_eq!(m.num_events, 0);
        assert_eq!(m.avg_e2o_per_event, 0.0);
        assert_eq!(m.avg_events_per_object, 0.0);
        assert_eq!(m.time_range_hours, 0.0);
    }

    #[test]
    fn test_time_range_skips_epoch_pinned_events() {
        use crate::ocel::ocel_struct::OCELEvent;
        use chrono::{DateTime, Utc};
        let mut ocel = sample_ocel();
        // A record whose timestamp failed to parse during synthesis
        ocel.events.push(OCELEvent {
            id: "e3".to_string(),
            event_type: "register".to_string(),
            time: DateTime::<Utc>::UNIX_EPOCH,
            attributes: Vec::new(),
            relationships: Vec::new(),
        });
        let m = ocel_metrics(&ocel);
        assert!((m.time_range_hours - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_dynamic_changes_counts_repeated_names() {
        use crate::ocel::ocel_struct::{OCELAttributeValue, OCELObject, OCELObjectAttribute};
        use chrono::{DateTime, Utc};
        let mut ocel = OCEL::new(Vec::new(), Vec::new());
        ocel.objects.push(OCELObject {
            id: "o1".to_string(),
            object_type: "case".to_string(),
            attributes: vec![
                OCELObjectAttribute {
                    name: "state".to_string(),
                    value: OCELAttributeValue::String("open".to_string()),
                    time: DateTime::<Utc>::UNIX_EPOCH,
                },
                OCELObjectAttribute {
                    name: "state".to_string(),
                    value: OCELAttributeValue::String("closed".to_string()),
                    time: DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::hours(1),
                },
            ],
            relationships: Vec::new(),
        });
        let m = ocel_metrics(&ocel);
        assert_eq!(m.num_object_attributes, 1);
        assert_eq!(m.num_dynamic_changes, 1);
    }
}
