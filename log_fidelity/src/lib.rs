#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]

#![doc = include_str!("../README.md")]

///
/// Flat tagged event logs ([`EventLog`]) and XES import/export
///
pub mod event_log {
    /// Constants (XES field keys, sentinel case identifier)
    pub mod constants;
    /// [`EventLog`] struct and sub-structs
    pub mod event_log_struct;
    /// XES Export
    pub mod export_xes;
    /// XES Import
    pub mod import_xes;
    pub use event_log_struct::{
        Attribute, AttributeValue, Attributes, EditableAttributes, Event, EventLog, Trace,
    };
}

///
/// Flat tabular event logs ([`TableLog`]) and CSV import/export
///
pub mod table {
    /// CSV Export
    pub mod csv_export;
    /// CSV Import
    pub mod csv_import;
    /// [`TableLog`] struct
    pub mod table_struct;
    pub use table_struct::TableLog;
}

///
/// OCEL 2.0 (Object-Centric Event Logs)
///
pub mod ocel {
    /// OCEL 2.0 JSON import/export
    pub mod ocel_json;
    /// OCEL 2.0 struct and sub-structs
    pub mod ocel_struct;
    pub use ocel_struct::OCEL;
}

///
/// Conversion engine: multi-value expansion, case/object synthesis,
/// attribute type inference, primary-type selection and OCEL flattening
///
pub mod conversion {
    /// Multi-Value Expander
    pub mod expand;
    /// Primary-Type Selector and OCEL Flattener
    pub mod flatten;
    /// Attribute Type Inferencer
    pub mod infer;
    /// Case/Object Synthesizer (flat log to OCEL)
    pub mod synthesize;
    /// Flat table to [`crate::EventLog`] pipeline
    pub mod table_to_log;
    #[cfg(test)]
    mod tests;
}

///
/// Metrics extractors, one per representation
///
pub mod metrics {
    /// Metrics for flat tagged event logs
    pub mod log_metrics;
    /// Metrics for object-centric event logs
    pub mod ocel_metrics;
    /// Metrics for flat tabular logs
    pub mod table_metrics;
    mod util;
}

///
/// Fidelity quantification: round-trip and cross-format scoring
///
pub mod fidelity {
    /// Cross-format conversion quality quantifiers
    pub mod cross;
    /// Report rendering (stateless presenter over score structs)
    pub mod report;
    /// Same-format round-trip quantifier
    pub mod roundtrip;
}

/// Shared timestamp parsing for all importers
pub mod timestamp;

#[doc(inline)]
pub use event_log::event_log_struct::EventLog;
#[doc(inline)]
pub use ocel::ocel_struct::OCEL;
#[doc(inline)]
pub use table::table_struct::TableLog;

pub use conversion::flatten::{flatten_ocel_to_log, flatten_ocel_to_table, select_primary_type};
pub use conversion::synthesize::log_to_ocel;
pub use conversion::table_to_log::table_to_log;
pub use fidelity::cross::{quantify_log_to_ocel, quantify_ocel_to_log};
pub use fidelity::roundtrip::quantify_roundtrip;
