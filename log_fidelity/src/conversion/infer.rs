//! Attribute Type Inferencer
//!
//! Classifies each attribute name exactly once, by the first non-null value
//! observed during a single pass over the events.

use std::collections::HashMap;

use crate::event_log::event_log_struct::AttributeValue;
use crate::ocel::ocel_struct::OCELAttributeType;

/// First-observation attribute type classifier
///
/// The type of an attribute is fixed by the first non-null value observed;
/// later values never revise it. This is a documented limitation for
/// attributes with mixed value types across events, not a silent
/// correction. Timestamp values classify as `string` (ISO 8601
/// serialization) to remain representable in the OCEL type schema.
#[derive(Debug, Default)]
pub struct AttributeTypeInferencer {
    types: HashMap<String, OCELAttributeType>,
}

impl AttributeTypeInferencer {
    /// Create an inferencer with no observations
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one attribute value; null values never classify
    pub fn observe(&mut self, name: &str, value: &AttributeValue) {
        if value.is_none() {
            return;
        }
        if !self.types.contains_key(name) {
            self.types.insert(name.to_string(), classify(value));
        }
    }

    /// The inferred type of an attribute, defaulting to `string` if it was
    /// never observed with a non-null value
    pub fn get(&self, name: &str) -> OCELAttributeType {
        self.types
            .get(name)
            .copied()
            .unwrap_or(OCELAttributeType::String)
    }
}

fn classify(value: &AttributeValue) -> OCELAttributeType {
    match value {
        AttributeValue::Int(_) => OCELAttributeType::Integer,
        AttributeValue::Float(_) => OCELAttributeType::Float,
        AttributeValue::Boolean(_) => OCELAttributeType::Boolean,
        // Timestamps are carried as ISO 8601 strings in the target schema
        AttributeValue::Date(_) => OCELAttributeType::String,
        AttributeValue::String(_) | AttributeValue::None() => OCELAttributeType::String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let mut inf = AttributeTypeInferencer::new();
        inf.observe("amount", &AttributeValue::Int(42));
        inf.observe("ratio", &AttributeValue::Float(0.5));
        inf.observe("urgent", &AttributeValue::Boolean(true));
        inf.observe("note", &AttributeValue::String("hi".to_string()));
        assert_eq!(inf.get("amount"), OCELAttributeType::Integer);
        assert_eq!(inf.get("ratio"), OCELAttributeType::Float);
        assert_eq!(inf.get("urgent"), OCELAttributeType::Boolean);
        assert_eq!(inf.get("note"), OCELAttributeType::String);
    }

    #[test]
    fn test_first_observation_wins() {
        // "42" observed as integer first; a later float does not revise it
        let mut inf = AttributeTypeInferencer::new();
        inf.observe("x", &AttributeValue::Int(42));
        inf.observe("x", &AttributeValue::Float(3.14));
        assert_eq!(inf.get("x"), OCELAttributeType::Integer);
    }

    #[test]
    fn test_null_never_classifies() {
        let mut inf = AttributeTypeInferencer::new();
        inf.observe("x", &AttributeValue::None());
        inf.observe("x", &AttributeValue::Boolean(false));
        assert_eq!(inf.get("x"), OCELAttributeType::Boolean);
    }

    #[test]
    fn test_unobserved_defaults_to_string() {
        let inf = AttributeTypeInferencer::new();
        assert_eq!(inf.get("missing"), OCELAttributeType::String);
    }

    #[test]
    fn test_timestamp_coerces_to_string() {
        let mut inf = AttributeTypeInferencer::new();
        let dt = chrono::DateTime::parse_from_rfc3339("2023-10-06T09:30:21+00:00").unwrap();
        inf.observe("when", &AttributeValue::Date(dt));
        assert_eq!(inf.get("when"), OCELAttributeType::String);
    }
}
