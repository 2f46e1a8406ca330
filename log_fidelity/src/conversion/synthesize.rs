//! Case/Object Synthesizer
//!
//! Builds an [`OCEL`] from a flat [`EventLog`]: one case-notion object per
//! distinct case identifier, one resource object per distinct non-null
//! resource value, and one event per input record linked to its case (and,
//! if present, resource) object.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversion::infer::AttributeTypeInferencer;
use crate::event_log::constants::{
    ACTIVITY_NAME, RESOURCE_NAME, SYSTEM_CASE_ID, TIMESTAMP_NAME, TRACE_ID_NAME, TRACE_PREFIX,
};
use crate::event_log::event_log_struct::{AttributeValue, Attributes};
use crate::event_log::EditableAttributes;
use crate::ocel::ocel_struct::{
    OCELAttributeValue, OCELEvent, OCELEventAttribute, OCELObject, OCELRelationship, OCELType,
    OCELTypeAttribute, OCEL,
};
use crate::EventLog;

/// Options for case/object synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisOptions {
    /// Name of the case-notion object type
    pub case_type: String,
    /// Name of the resource object type
    pub resource_type: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            case_type: "case".to_string(),
            resource_type: "resource".to_string(),
        }
    }
}

fn to_ocel_value(value: &AttributeValue) -> OCELAttributeValue {
    match value {
        AttributeValue::String(s) => OCELAttributeValue::String(s.clone()),
        // Timestamp attributes serialize as ISO 8601 strings in the target schema
        AttributeValue::Date(d) => OCELAttributeValue::String(d.to_rfc3339()),
        AttributeValue::Int(i) => OCELAttributeValue::Integer(*i),
        AttributeValue::Float(f) => OCELAttributeValue::Float(*f),
        AttributeValue::Boolean(b) => OCELAttributeValue::Boolean(*b),
        AttributeValue::None() => OCELAttributeValue::Null,
    }
}

/// Normalized case identifier of a trace: missing, blank, and null
/// identifiers collapse to [`SYSTEM_CASE_ID`].
pub(crate) fn case_id_of(trace_attributes: &Attributes) -> String {
    trace_attributes
        .get_by_key(TRACE_ID_NAME)
        .map(|a| a.value.to_string())
        .filter(|s| !s.trim().is_empty() && s != "None")
        .unwrap_or_else(|| SYSTEM_CASE_ID.to_string())
}

/// Synthesize an [`OCEL`] from a flat [`EventLog`]
///
/// Object ids are deterministic functions of the source values
/// (`case_<id>`, `resource_<value>`), so repeated synthesis from the same
/// input yields the same log. Event ids `e0..e(n-1)` follow strictly
/// increasing input order. Trace-level attributes other than the case
/// identifier are carried onto events with a `case:` key prefix. Events
/// without a parseable timestamp are pinned to the Unix epoch, the
/// schema's mandatory-time placeholder; metric extraction treats that
/// value as a sentinel and leaves it out of time-range statistics.
pub fn log_to_ocel(log: &EventLog, options: &SynthesisOptions) -> OCEL {
    let mut inferencer = AttributeTypeInferencer::new();
    // activity name -> attribute names observed for that event type
    let mut event_type_attrs: Vec<(String, HashSet<String>)> = Vec::new();
    let mut resources_seen: HashSet<String> = HashSet::new();
    let mut resource_objects: Vec<OCELObject> = Vec::new();
    let mut cases_seen: HashSet<String> = HashSet::new();
    let mut case_objects: Vec<OCELObject> = Vec::new();
    let mut events: Vec<OCELEvent> = Vec::new();

    for trace in &log.traces {
        let case_id = case_id_of(&trace.attributes);
        if cases_seen.insert(case_id.clone()) {
            case_objects.push(OCELObject {
                id: format!("{}_{}", options.case_type, case_id),
                object_type: options.case_type.clone(),
                attributes: Vec::new(),
                relationships: Vec::new(),
            });
        }
        let carried_trace_attrs: Vec<(String, &AttributeValue)> = trace
            .attributes
            .iter()
            .filter(|a| a.key != TRACE_ID_NAME && !a.value.is_none())
            .map(|a| (format!("{}{}", TRACE_PREFIX, a.key), &a.value))
            .collect();

        for event in &trace.events {
            let activity = event
                .attributes
                .get_by_key(ACTIVITY_NAME)
                .map(|a| a.value.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let time: DateTime<Utc> = event
                .attributes
                .get_by_key(TIMESTAMP_NAME)
                .and_then(|a| a.value.try_as_date())
                .map(|d| d.with_timezone(&Utc))
                // Events without a parseable timestamp pin to the epoch
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

            let mut relationships = vec![OCELRelationship::new(
                format!("{}_{}", options.case_type, case_id),
                options.case_type.clone(),
            )];
            let resource = event
                .attributes
                .get_by_key(RESOURCE_NAME)
                .filter(|a| !a.value.is_none())
                .map(|a| a.value.to_string());
            if let Some(resource) = resource {
                if resources_seen.insert(resource.clone()) {
                    resource_objects.push(OCELObject {
                        id: format!("{}_{}", options.resource_type, resource),
                        object_type: options.resource_type.clone(),
                        attributes: Vec::new(),
                        relationships: Vec::new(),
                    });
                }
                relationships.push(OCELRelationship::new(
                    format!("{}_{}", options.resource_type, resource),
                    options.resource_type.clone(),
                ));
            }

            let mut attributes: Vec<OCELEventAttribute> = event
                .attributes
                .iter()
                .filter(|a| {
                    a.key != ACTIVITY_NAME
                        && a.key != TIMESTAMP_NAME
                        && a.key != RESOURCE_NAME
                        && !a.value.is_none()
                })
                .map(|a| OCELEventAttribute {
                    name: a.key.clone(),
                    value: to_ocel_value(&a.value),
                })
                .collect();
            for (key, value) in &carried_trace_attrs {
                attributes.push(OCELEventAttribute {
                    name: key.clone(),
                    value: to_ocel_value(value),
                });
            }

            // record the event type schema for this activity
            let type_idx = match event_type_attrs.iter().position(|(a, _)| *a == activity) {
                Some(i) => i,
                None => {
                    event_type_attrs.push((activity.clone(), HashSet::new()));
                    event_type_attrs.len() - 1
                }
            };
            let type_attrs = &mut event_type_attrs[type_idx].1;
            for attr in &attributes {
                type_attrs.insert(attr.name.clone());
            }
            for attr in event
                .attributes
                .iter()
                .filter(|a| a.key != ACTIVITY_NAME && a.key != TIMESTAMP_NAME && a.key != RESOURCE_NAME)
            {
                inferencer.observe(&attr.key, &attr.value);
            }
            for (key, value) in &carried_trace_attrs {
                inferencer.observe(key, value);
            }

            events.push(OCELEvent {
                id: format!("e{}", events.len()),
                event_type: activity,
                time,
                attributes,
                relationships,
            });
        }
    }

    let event_types: Vec<OCELType> = event_type_attrs
        .into_iter()
        .map(|(name, attrs)| {
            let mut attr_names: Vec<String> = attrs.into_iter().collect();
            attr_names.sort();
            OCELType {
                name,
                attributes: attr_names
                    .into_iter()
                    .map(|a| {
                        let value_type = inferencer.get(&a);
                        OCELTypeAttribute::new(a, &value_type)
                    })
                    .collect(),
            }
        })
        .collect();

    let object_types = vec![
        OCELType {
            name: options.case_type.clone(),
            attributes: Vec::new(),
        },
        OCELType {
            name: options.resource_type.clone(),
            attributes: Vec::new(),
        },
    ];

    let mut objects = resource_objects;
    objects.append(&mut case_objects);

    let mut ocel = OCEL::new(object_types, event_types);
    ocel.objects = objects;
    ocel.events = events;
    ocel
}
