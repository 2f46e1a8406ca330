//! Report structs and rendering
//!
//! Quantifiers return structured reports; rendering lives here as plain
//! [`std::fmt::Display`] impls so that score computation stays testable
//! without capturing console output.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::roundtrip::RoundTripReport;

/// Structured result of a cross-format quantification
///
/// `dimension_scores` hold the weighted dimensions as fractions (rendered
/// as percentages); `detailed_metrics` hold every sub-metric. Loss-count
/// metrics are unbounded; everything else lies in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreReport {
    /// Human-readable name of the quantified conversion direction
    pub title: String,
    /// Aggregate weighted score
    pub total_score: f64,
    /// Dimension name to weighted-dimension fraction
    pub dimension_scores: Vec<(String, f64)>,
    /// Sub-metric name to raw value
    pub detailed_metrics: Vec<(String, f64)>,
}

fn format_name(name: &str) -> String {
    name.replace('_', " ")
}

fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

impl Display for ScoreReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f)?;
        writeln!(f, "DIMENSIONS:")?;
        for (name, score) in &self.dimension_scores {
            writeln!(f, "  {}: {}", format_name(name), format_percent(*score))?;
        }
        writeln!(f)?;
        writeln!(f, "DETAILED METRICS:")?;
        for (name, value) in &self.detailed_metrics {
            writeln!(f, "  {}: {}", format_name(name), format_percent(*value))?;
        }
        writeln!(f)?;
        write!(f, "OVERALL SCORE: {:.3}", self.total_score)
    }
}

impl Display for RoundTripReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ROUND-TRIP ANALYSIS")?;
        writeln!(f)?;
        writeln!(f, "BASIC COMPARISON:")?;
        let orig = &self.original_metrics;
        let round = &self.roundtrip_metrics;
        writeln!(f, "  cases: {} -> {}", orig.num_cases, round.num_cases)?;
        writeln!(f, "  events: {} -> {}", orig.num_events, round.num_events)?;
        writeln!(
            f,
            "  activities: {} -> {}",
            orig.num_activities, round.num_activities
        )?;
        writeln!(
            f,
            "  event attributes: {} -> {}",
            orig.num_event_attributes, round.num_event_attributes
        )?;
        writeln!(f)?;
        writeln!(f, "PRESERVATION:")?;
        let p = &self.preservation;
        writeln!(f, "  cases: {}", format_percent(p.case_preservation))?;
        writeln!(f, "  events: {}", format_percent(p.event_preservation))?;
        writeln!(f, "  activities: {}", format_percent(p.activity_preservation))?;
        writeln!(f, "  attributes: {}", format_percent(p.attribute_preservation))?;
        writeln!(
            f,
            "  avg events per case: {}",
            format_percent(p.avg_events_per_case_preservation)
        )?;
        writeln!(
            f,
            "  multi-value attributes: {}",
            format_percent(p.multi_attribute_preservation)
        )?;
        writeln!(f, "  time range: {}", format_percent(p.time_range_preservation))?;
        writeln!(f)?;
        writeln!(f, "STRUCTURE:")?;
        let s = &self.structural;
        writeln!(
            f,
            "  schema preservation: {}",
            format_percent(s.schema_preservation_ratio)
        )?;
        writeln!(
            f,
            "  datatype preservation: {}",
            format_percent(s.dtype_preservation_ratio)
        )?;
        writeln!(f, "  removed columns: {}", s.removed_columns.len())?;
        writeln!(f, "  added columns: {}", s.added_columns.len())?;
        writeln!(f)?;
        writeln!(f, "DATA QUALITY:")?;
        let q = &self.quality;
        writeln!(
            f,
            "  null preservation: {}",
            format_percent(q.null_preservation_ratio)
        )?;
        writeln!(
            f,
            "  unique case/activity retention: {}",
            format_percent(q.unique_value_retention)
        )?;
        if !self.insights.is_empty() {
            writeln!(f)?;
            writeln!(f, "INSIGHTS:")?;
            for insight in &self.insights {
                writeln!(f, "  {}", insight)?;
            }
        }
        writeln!(f)?;
        write!(f, "OVERALL SCORE: {:.3}", self.overall_score)
    }
}
