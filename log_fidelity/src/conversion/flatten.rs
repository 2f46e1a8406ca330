//! Primary-Type Selector and OCEL Flattener
//!
//! Flattening is a lossy, one-directional projection: relationships to
//! objects of other types and all O2O relationships are dropped.

use std::collections::HashMap;

use crate::event_log::constants::{ACTIVITY_NAME, TIMESTAMP_NAME, TRACE_ID_NAME};
use crate::event_log::event_log_struct::{Attribute, AttributeValue, Event, Trace};
use crate::event_log::EditableAttributes;
use crate::ocel::ocel_struct::{OCELAttributeValue, OCELEvent, OCEL};
use crate::table::table_struct::{
    row_from_pairs, TableLog, ACTIVITY_COLUMN, CASE_COLUMN, TIMESTAMP_COLUMN,
};
use crate::EventLog;

/// Separator used when joining multiple case-notion object ids into one
/// case identifier (the inverse of the Multi-Value Expander's delimiter)
pub const CASE_ID_JOIN: &str = "; ";

/// Select the object type to use as case notion for flattening
///
/// The type with the highest E2O relationship count wins (frequency mode);
/// ties break deterministically to the lexicographically smallest type
/// name. Returns `None` for a log without any E2O relationships.
pub fn select_primary_type(ocel: &OCEL) -> Option<String> {
    let type_of_object: HashMap<&str, &str> = ocel
        .objects
        .iter()
        .map(|o| (o.id.as_str(), o.object_type.as_str()))
        .collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for event in &ocel.events {
        for rel in &event.relationships {
            if let Some(&object_type) = type_of_object.get(rel.object_id.as_str()) {
                *counts.entry(object_type).or_default() += 1;
            }
        }
    }
    counts
        .into_iter()
        .max_by(|(type_a, count_a), (type_b, count_b)| {
            count_a.cmp(count_b).then(type_b.cmp(type_a))
        })
        .map(|(object_type, _)| object_type.to_string())
}

fn to_log_value(value: &OCELAttributeValue) -> AttributeValue {
    match value {
        OCELAttributeValue::String(s) => AttributeValue::String(s.clone()),
        OCELAttributeValue::Time(t) => AttributeValue::Date(t.fixed_offset()),
        OCELAttributeValue::Integer(i) => AttributeValue::Int(*i),
        OCELAttributeValue::Float(f) => AttributeValue::Float(*f),
        OCELAttributeValue::Boolean(b) => AttributeValue::Boolean(*b),
        OCELAttributeValue::Null => AttributeValue::None(),
    }
}

/// Event indices per related object id
fn e2o_reverse_index(ocel: &OCEL) -> HashMap<&str, Vec<usize>> {
    let mut index: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, event) in ocel.events.iter().enumerate() {
        for rel in &event.relationships {
            index.entry(rel.object_id.as_str()).or_default().push(i);
        }
    }
    index
}

fn flatten_event(ev: &OCELEvent) -> Event {
    let mut event = Event {
        attributes: vec![
            Attribute::new(
                ACTIVITY_NAME.to_string(),
                AttributeValue::String(ev.event_type.clone()),
            ),
            Attribute::new(
                TIMESTAMP_NAME.to_string(),
                AttributeValue::Date(ev.time.fixed_offset()),
            ),
        ],
    };
    event.attributes.extend(
        ev.attributes
            .iter()
            .map(|at| Attribute::new(at.name.clone(), to_log_value(&at.value))),
    );
    event
}

/// Flatten an [`OCEL`] on a specific object type, resulting in a flat [`EventLog`]
///
/// For each object of the specified type, a trace is created containing all
/// events related to that object, ordered by their timestamp.
pub fn flatten_ocel_to_log(ocel: &OCEL, object_type: &str) -> EventLog {
    let index = e2o_reverse_index(ocel);
    let mut traces: Vec<Trace> = ocel
        .objects
        .iter()
        .filter(|ob| ob.object_type == object_type)
        .map(|ob| {
            let mut events: Vec<Event> = index
                .get(ob.id.as_str())
                .into_iter()
                .flatten()
                .map(|i| flatten_event(&ocel.events[*i]))
                .collect();
            events.sort_by_cached_key(|ev| {
                ev.attributes
                    .get_by_key(TIMESTAMP_NAME)
                    .and_then(|a| a.value.try_as_date().cloned())
            });
            let mut trace = Trace {
                attributes: vec![Attribute::new(
                    TRACE_ID_NAME.to_string(),
                    AttributeValue::String(ob.id.clone()),
                )],
                events,
            };
            trace.attributes.extend(
                ob.attributes
                    .iter()
                    .map(|at| Attribute::new(at.name.clone(), to_log_value(&at.value))),
            );
            trace
        })
        .collect();
    traces.sort_by_cached_key(|t| {
        t.events.first().map(|e| {
            e.attributes
                .get_by_key(TIMESTAMP_NAME)
                .and_then(|a| a.value.try_as_date())
                .cloned()
        })
    });
    let mut ret = EventLog::new();
    ret.traces = traces;
    ret
}

/// Flatten an [`OCEL`] to a flat [`TableLog`] with one row per event
///
/// The case identifier column is the [`CASE_ID_JOIN`]-joined set of related
/// object ids of the case-notion type; the attribute columns are the union
/// of event attribute names in first-seen order.
pub fn flatten_ocel_to_table(ocel: &OCEL, object_type: &str) -> TableLog {
    let type_of_object: HashMap<&str, &str> = ocel
        .objects
        .iter()
        .map(|o| (o.id.as_str(), o.object_type.as_str()))
        .collect();

    let mut columns: Vec<String> = vec![
        CASE_COLUMN.to_string(),
        ACTIVITY_COLUMN.to_string(),
        TIMESTAMP_COLUMN.to_string(),
    ];
    for event in &ocel.events {
        for at in &event.attributes {
            if !columns.contains(&at.name) {
                columns.push(at.name.clone());
            }
        }
    }

    let mut table = TableLog::new(columns);
    for event in &ocel.events {
        let case_ids: Vec<&str> = event
            .relationships
            .iter()
            .filter(|rel| {
                type_of_object.get(rel.object_id.as_str()) == Some(&object_type)
            })
            .map(|rel| rel.object_id.as_str())
            .collect();
        let row = row_from_pairs(table.columns.iter().map(|col| {
            let value = match col.as_str() {
                CASE_COLUMN => AttributeValue::String(case_ids.join(CASE_ID_JOIN)),
                ACTIVITY_COLUMN => AttributeValue::String(event.event_type.clone()),
                TIMESTAMP_COLUMN => AttributeValue::Date(event.time.fixed_offset()),
                name => event
                    .attributes
                    .iter()
                    .find(|at| at.name == name)
                    .map(|at| to_log_value(&at.value))
                    .unwrap_or(AttributeValue::None()),
            };
            (col.clone(), value)
        }));
        table.push_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::synthesize::{log_to_ocel, SynthesisOptions};
    use crate::event_log::event_log_struct::Attribute;
    use crate::ocel::ocel_struct::{OCELObject, OCELRelationship, OCELType};
    use chrono::{DateTime, Utc};

    fn ocel_with_relationship_counts(counts: &[(&str, usize)]) -> OCEL {
        let object_types = counts
            .iter()
            .map(|(name, _)| OCELType {
                name: name.to_string(),
                attributes: Vec::new(),
            })
            .collect();
        let mut ocel = OCEL::new(
            object_types,
            vec![OCELType {
                name: "act".to_string(),
                attributes: Vec::new(),
            }],
        );
        for (object_type, count) in counts {
            let id = format!("{object_type}_1");
            ocel.objects.push(OCELObject {
                id: id.clone(),
                object_type: object_type.to_string(),
                attributes: Vec::new(),
                relationships: Vec::new(),
            });
            for i in 0..*count {
                ocel.events.push(crate::ocel::ocel_struct::OCELEvent {
                    id: format!("e_{object_type}_{i}"),
                    event_type: "act".to_string(),
                    time: DateTime::<Utc>::UNIX_EPOCH,
                    attributes: Vec::new(),
                    relationships: vec![OCELRelationship::new(id.clone(), *object_type)],
                });
            }
        }
        ocel
    }

    #[test]
    fn test_primary_type_by_frequency() {
        let ocel = ocel_with_relationship_counts(&[("A", 10), ("B", 3)]);
        assert_eq!(select_primary_type(&ocel), Some("A".to_string()));
    }

    #[test]
    fn test_primary_type_tie_breaks_lexicographically() {
        let ocel = ocel_with_relationship_counts(&[("B", 5), ("A", 5)]);
        assert_eq!(select_primary_type(&ocel), Some("A".to_string()));
    }

    #[test]
    fn test_primary_type_empty_log() {
        let ocel = OCEL::new(Vec::new(), Vec::new());
        assert_eq!(select_primary_type(&ocel), None);
    }

    fn sample_flat_log() -> EventLog {
        use crate::event_log::event_log_struct::{Event, Trace};
        let date = |s: &str| {
            AttributeValue::Date(chrono::DateTime::parse_from_rfc3339(s).unwrap())
        };
        let mut log = EventLog::new();
        for (case, events) in [
            ("c1", vec![("register", "2023-10-06T09:30:21+00:00"), ("approve", "2023-10-06T11:00:00+00:00")]),
            ("c2", vec![("register", "2023-10-07T08:00:00+00:00")]),
        ] {
            let mut trace = Trace::new();
            trace.attributes.push(Attribute::new(
                TRACE_ID_NAME.to_string(),
                AttributeValue::String(case.to_string()),
            ));
            for (activity, time) in events {
                trace.events.push(Event {
                    attributes: vec![
                        Attribute::new(
                            ACTIVITY_NAME.to_string(),
                            AttributeValue::String(activity.to_string()),
                        ),
                        Attribute::new(TIMESTAMP_NAME.to_string(), date(time)),
                    ],
                });
            }
            log.traces.push(trace);
        }
        log
    }

    #[test]
    fn test_flattening_reproduces_synthesized_log() {
        // flat log -> OCEL -> flatten on the case type reproduces the
        // case/activity/timestamp triples (case ids gain the type prefix)
        let log = sample_flat_log();
        let ocel = log_to_ocel(&log, &SynthesisOptions::default());
        let flattened = flatten_ocel_to_log(&ocel, "case");
        assert_eq!(flattened.traces.len(), log.traces.len());
        for (orig, flat) in log.traces.iter().zip(&flattened.traces) {
            let orig_id = orig.attributes.get_by_key(TRACE_ID_NAME).unwrap();
            let flat_id = flat.attributes.get_by_key(TRACE_ID_NAME).unwrap();
            assert_eq!(
                flat_id.value.to_string(),
                format!("case_{}", orig_id.value)
            );
            assert_eq!(orig.events.len(), flat.events.len());
            for (oe, fe) in orig.events.iter().zip(&flat.events) {
                assert_eq!(
                    oe.attributes.get_by_key(ACTIVITY_NAME),
                    fe.attributes.get_by_key(ACTIVITY_NAME)
                );
                assert_eq!(
                    oe.attributes
                        .get_by_key(TIMESTAMP_NAME)
                        .and_then(|a| a.value.try_as_date()),
                    fe.attributes
                        .get_by_key(TIMESTAMP_NAME)
                        .and_then(|a| a.value.try_as_date())
                );
            }
        }
    }

    #[test]
    fn test_flatten_to_table_joins_case_ids() {
        let mut ocel = ocel_with_relationship_counts(&[("A", 1)]);
        ocel.objects.push(OCELObject {
            id: "A_2".to_string(),
            object_type: "A".to_string(),
            attributes: Vec::new(),
            relationships: Vec::new(),
        });
        ocel.events[0]
            .relationships
            .push(OCELRelationship::new("A_2", "A"));
        let table = flatten_ocel_to_table(&ocel, "A");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(
            table.cell(&table.rows[0], CASE_COLUMN),
            Some(&AttributeValue::String("A_1; A_2".to_string()))
        );
    }
}
