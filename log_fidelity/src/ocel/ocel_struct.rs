use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

///
/// Object-centric Event Log
///
/// Consists of multiple [`OCELEvent`]s and [`OCELObject`]s with corresponding event and object [`OCELType`]s
///
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OCEL {
    /// Object Types in OCEL
    #[serde(rename = "objectTypes")]
    pub object_types: Vec<OCELType>,
    /// Event Types in OCEL
    #[serde(rename = "eventTypes")]
    pub event_types: Vec<OCELType>,
    /// Objects contained in OCEL
    #[serde(default)]
    pub objects: Vec<OCELObject>,
    /// Events contained in OCEL
    #[serde(default)]
    pub events: Vec<OCELEvent>,
    /// O2O (Object-to-Object) relationships declared at the log level
    #[serde(rename = "objectRelations", default)]
    pub object_relations: Vec<OCELObjectRelation>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// OCEL Event/Object Type
pub struct OCELType {
    /// Name
    pub name: String,
    /// Attributes (defining the _type_ of values)
    #[serde(default)]
    pub attributes: Vec<OCELTypeAttribute>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// OCEL Attribute types
pub struct OCELTypeAttribute {
    /// Name of attribute
    pub name: String,
    /// Type of attribute
    #[serde(rename = "type")]
    pub value_type: String,
}

impl OCELTypeAttribute {
    /// Helper to create a new type attribute
    pub fn new(name: impl Into<String>, value_type: &OCELAttributeType) -> Self {
        Self {
            name: name.into(),
            value_type: value_type.to_type_string().to_string(),
        }
    }
}

/// Semantic attribute types used in OCEL type declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OCELAttributeType {
    /// String
    String,
    /// Integer
    Integer,
    /// Float
    Float,
    /// Boolean
    Boolean,
}

impl OCELAttributeType {
    /// The serialized type name as it appears in OCEL JSON schemas
    pub fn to_type_string(self) -> &'static str {
        match self {
            OCELAttributeType::String => "string",
            OCELAttributeType::Integer => "integer",
            OCELAttributeType::Float => "float",
            OCELAttributeType::Boolean => "boolean",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// OCEL Event Attribute
pub struct OCELEventAttribute {
    /// Name of event attribute
    pub name: String,
    /// Value of attribute
    pub value: OCELAttributeValue,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// OCEL Event
pub struct OCELEvent {
    /// Event ID
    pub id: String,
    /// Event Type (referring back to the `name` of an [`OCELType`])
    #[serde(rename = "type")]
    pub event_type: String,
    /// DateTime when event occurred
    pub time: DateTime<Utc>,
    /// Event attributes
    #[serde(default)]
    pub attributes: Vec<OCELEventAttribute>,
    /// E2O (Event-to-Object) relationships
    #[serde(default)]
    pub relationships: Vec<OCELRelationship>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// OCEL Relationship (qualified; referring back to an [`OCELObject`])
pub struct OCELRelationship {
    /// ID of referenced [`OCELObject`]
    #[serde(rename = "objectId")]
    pub object_id: String,
    /// Qualifier of relationship
    pub qualifier: String,
}

impl OCELRelationship {
    /// Helper to create a new relationship
    pub fn new(object_id: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            qualifier: qualifier.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// OCEL Object
pub struct OCELObject {
    /// Object ID
    pub id: String,
    /// Object Type (referring back to the `name` of an [`OCELType`])
    #[serde(rename = "type")]
    pub object_type: String,
    /// Object attributes
    #[serde(default)]
    pub attributes: Vec<OCELObjectAttribute>,
    /// O2O (Object-to-Object) relationships
    #[serde(default)]
    pub relationships: Vec<OCELRelationship>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// OCEL Object Attribute
///
/// Describing a named value _at a certain point in time_
pub struct OCELObjectAttribute {
    /// Name of attribute
    pub name: String,
    /// Value of attribute
    pub value: OCELAttributeValue,
    /// Time of attribute value
    pub time: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// O2O relationship declared at the log level
pub struct OCELObjectRelation {
    /// ID of the source [`OCELObject`]
    #[serde(rename = "sourceObjectId")]
    pub source_object_id: String,
    /// ID of the target [`OCELObject`]
    #[serde(rename = "targetObjectId")]
    pub target_object_id: String,
    /// Qualifier of relationship
    pub qualifier: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
/// OCEL Attribute Values
///
/// Serializes to plain JSON-native string/number/boolean values.
pub enum OCELAttributeValue {
    /// Boolean
    Boolean(bool),
    /// Integer
    Integer(i64),
    /// Float
    Float(f64),
    /// DateTime
    Time(DateTime<Utc>),
    /// String
    String(String),
    /// Placeholder for invalid values
    Null,
}

impl OCEL {
    /// Initializes an OCEL with the given object and event types and no instance data
    pub fn new(object_types: Vec<OCELType>, event_types: Vec<OCELType>) -> Self {
        Self {
            object_types,
            event_types,
            objects: Vec::new(),
            events: Vec::new(),
            object_relations: Vec::new(),
        }
    }

    /// Total number of E2O relationships over all events
    pub fn num_e2o_relationships(&self) -> usize {
        self.events.iter().map(|e| e.relationships.len()).sum()
    }

    /// Total number of O2O relationships (log-level and per-object)
    pub fn num_o2o_relationships(&self) -> usize {
        self.object_relations.len()
            + self
                .objects
                .iter()
                .map(|o| o.relationships.len())
                .sum::<usize>()
    }
}
