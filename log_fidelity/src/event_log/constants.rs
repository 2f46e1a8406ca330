/// Common identifying field for event identities (i.e., activities)
pub const ACTIVITY_NAME: &str = "concept:name";

/// Common identifying field for trace identities (i.e., case IDs)
pub const TRACE_ID_NAME: &str = "concept:name";

/// Field for event timestamps (time XES extension)
pub const TIMESTAMP_NAME: &str = "time:timestamp";

/// Field for event resources (organizational XES extension)
pub const RESOURCE_NAME: &str = "org:resource";

/// Prefix prepended to trace-level attribute keys when flattening a log to events only
///
/// Primarily used for interoperability with tabular views of a log
pub const TRACE_PREFIX: &str = "case:";

/// Reserved case identifier assigned to records with a missing, empty or
/// whitespace-only case value
///
/// After normalization every record belongs to exactly one case.
pub const SYSTEM_CASE_ID: &str = "SYSTEM";

/// Delimiter marking multi-value attribute cells in tabular input
///
/// The Multi-Value Expander splits on this, the OCEL flattener joins case
/// object ids with it (followed by a space) as its inverse.
pub const MULTI_VALUE_DELIMITER: char = ';';
