//! Same-format round-trip quantifier
//!
//! Compares a flat tabular log with the result of converting it through the
//! object-centric representation and back, and scores how much of the
//! original survived the trip.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::event_log::event_log_struct::AttributeValue;
use crate::metrics::table_metrics::{table_metrics, TableMetrics};
use crate::table::table_struct::{SchemaError, TableLog, ACTIVITY_COLUMN, CASE_COLUMN};

/// Similarity of a round-trip count to its original
///
/// `1.0` for an exact match, linearly decreasing towards `0.0` as the
/// round-trip value drifts away in either direction; an original value of
/// zero yields `zero_fallback`. Clamped to `[0, 1]`.
pub fn preservation_ratio(original: f64, roundtrip: f64, zero_fallback: f64) -> f64 {
    if original > 0.0 {
        (1.0 - (1.0 - roundtrip / original).abs()).clamp(0.0, 1.0)
    } else {
        zero_fallback
    }
}

/// The seven per-metric preservation ratios, each in `[0, 1]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreservationRatios {
    /// Case count similarity
    pub case_preservation: f64,
    /// Event count similarity
    pub event_preservation: f64,
    /// Distinct activity count similarity
    pub activity_preservation: f64,
    /// Event attribute column count similarity
    pub attribute_preservation: f64,
    /// Events-per-case similarity
    pub avg_events_per_case_preservation: f64,
    /// Multi-value attribute column count similarity
    pub multi_attribute_preservation: f64,
    /// Time range similarity
    pub time_range_preservation: f64,
}

impl PreservationRatios {
    fn compute(original: &TableMetrics, roundtrip: &TableMetrics) -> Self {
        Self {
            case_preservation: preservation_ratio(
                original.num_cases as f64,
                roundtrip.num_cases as f64,
                0.0,
            ),
            event_preservation: preservation_ratio(
                original.num_events as f64,
                roundtrip.num_events as f64,
                0.0,
            ),
            activity_preservation: preservation_ratio(
                original.num_activities as f64,
                roundtrip.num_activities as f64,
                0.0,
            ),
            attribute_preservation: preservation_ratio(
                original.num_event_attributes as f64,
                roundtrip.num_event_attributes as f64,
                0.0,
            ),
            avg_events_per_case_preservation: preservation_ratio(
                original.avg_events_per_case,
                roundtrip.avg_events_per_case,
                0.0,
            ),
            // Logs without multi-value columns or with a single instant of
            // time trivially preserve those aspects.
            multi_attribute_preservation: preservation_ratio(
                original.num_multi_attributes as f64,
                roundtrip.num_multi_attributes as f64,
                1.0,
            ),
            time_range_preservation: preservation_ratio(
                original.time_range_hours,
                roundtrip.time_range_hours,
                1.0,
            ),
        }
    }

    /// Unweighted mean over all seven ratios
    pub fn mean(&self) -> f64 {
        (self.case_preservation
            + self.event_preservation
            + self.activity_preservation
            + self.attribute_preservation
            + self.avg_events_per_case_preservation
            + self.multi_attribute_preservation
            + self.time_range_preservation)
            / 7.0
    }
}

/// Column-level schema comparison between original and round-trip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuralAnalysis {
    /// Columns present only in the round-trip table
    pub added_columns: Vec<String>,
    /// Columns present only in the original table
    pub removed_columns: Vec<String>,
    /// Columns present in both tables
    pub preserved_columns: Vec<String>,
    /// Preserved columns whose inferred value type changed, with both types
    pub dtype_changes: Vec<(String, String, String)>,
    /// Fraction of preserved columns with an unchanged value type
    pub dtype_preservation_ratio: f64,
    /// Fraction of original columns that survived
    pub schema_preservation_ratio: f64,
}

/// Inferred value type of a column: the variant of its first non-absent cell
fn column_dtype(table: &TableLog, column: &str) -> &'static str {
    for row in &table.rows {
        match table.cell(row, column) {
            Some(AttributeValue::String(_)) => return "string",
            Some(AttributeValue::Date(_)) => return "date",
            Some(AttributeValue::Int(_)) => return "integer",
            Some(AttributeValue::Float(_)) => return "float",
            Some(AttributeValue::Boolean(_)) => return "boolean",
            Some(AttributeValue::None()) | None => {}
        }
    }
    "empty"
}

impl StructuralAnalysis {
    fn compute(original: &TableLog, roundtrip: &TableLog) -> Self {
        let original_cols: HashSet<&str> = original.columns.iter().map(String::as_str).collect();
        let roundtrip_cols: HashSet<&str> = roundtrip.columns.iter().map(String::as_str).collect();

        let added_columns: Vec<String> = roundtrip
            .columns
            .iter()
            .filter(|c| !original_cols.contains(c.as_str()))
            .cloned()
            .collect();
        let removed_columns: Vec<String> = original
            .columns
            .iter()
            .filter(|c| !roundtrip_cols.contains(c.as_str()))
            .cloned()
            .collect();
        let preserved_columns: Vec<String> = original
            .columns
            .iter()
            .filter(|c| roundtrip_cols.contains(c.as_str()))
            .cloned()
            .collect();

        let mut dtype_changes = Vec::new();
        for column in &preserved_columns {
            let before = column_dtype(original, column);
            let after = column_dtype(roundtrip, column);
            if before != after {
                dtype_changes.push((column.clone(), before.to_string(), after.to_string()));
            }
        }

        let dtype_preservation_ratio = if preserved_columns.is_empty() {
            0.0
        } else {
            1.0 - dtype_changes.len() as f64 / preserved_columns.len() as f64
        };
        let schema_preservation_ratio = if original.columns.is_empty() {
            0.0
        } else {
            preserved_columns.len() as f64 / original.columns.len() as f64
        };

        Self {
            added_columns,
            removed_columns,
            preserved_columns,
            dtype_changes,
            dtype_preservation_ratio,
            schema_preservation_ratio,
        }
    }

    /// Unweighted mean of schema and datatype preservation
    pub fn mean(&self) -> f64 {
        (self.schema_preservation_ratio + self.dtype_preservation_ratio) / 2.0
    }
}

/// Value-level comparison between original and round-trip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityAnalysis {
    /// Mean null-count similarity over the preserved columns
    pub null_preservation_ratio: f64,
    /// Fraction of distinct case/activity values that survived
    pub unique_value_retention: f64,
}

fn null_count(table: &TableLog, column: &str) -> usize {
    table
        .rows
        .iter()
        .filter(|row| table.cell(row, column).is_none())
        .count()
}

fn unique_values(table: &TableLog, column: &str) -> HashSet<String> {
    table
        .rows
        .iter()
        .filter_map(|row| table.cell(row, column))
        .map(|v| v.to_string())
        .collect()
}

impl QualityAnalysis {
    fn compute(original: &TableLog, roundtrip: &TableLog, preserved: &[String]) -> Self {
        let mut null_ratios = Vec::with_capacity(preserved.len());
        for column in preserved {
            let before = null_count(original, column);
            let after = null_count(roundtrip, column);
            let ratio = if before == 0 && after == 0 {
                1.0
            } else {
                1.0 - (before as f64 - after as f64).abs() / before.max(after) as f64
            };
            null_ratios.push(ratio);
        }
        let null_preservation_ratio = if null_ratios.is_empty() {
            1.0
        } else {
            null_ratios.iter().sum::<f64>() / null_ratios.len() as f64
        };

        let mut retained = 0;
        let mut total = 0;
        for column in [CASE_COLUMN, ACTIVITY_COLUMN] {
            let before = unique_values(original, column);
            let after = unique_values(roundtrip, column);
            retained += before.intersection(&after).count();
            total += before.len();
        }
        let unique_value_retention = if total == 0 {
            1.0
        } else {
            retained as f64 / total as f64
        };

        Self {
            null_preservation_ratio,
            unique_value_retention,
        }
    }

    /// Unweighted mean of the two quality ratios
    pub fn mean(&self) -> f64 {
        (self.null_preservation_ratio + self.unique_value_retention) / 2.0
    }
}

/// Weights of the three round-trip scoring components
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RoundTripWeights {
    /// Weight of the seven preservation ratios
    pub preservation: f64,
    /// Weight of the structural analysis
    pub structural: f64,
    /// Weight of the quality analysis
    pub quality: f64,
}

impl Default for RoundTripWeights {
    fn default() -> Self {
        Self {
            preservation: 0.6,
            structural: 0.3,
            quality: 0.1,
        }
    }
}

impl RoundTripWeights {
    /// Whether the weights are non-negative and sum to one
    pub fn is_valid(&self) -> bool {
        self.preservation >= 0.0
            && self.structural >= 0.0
            && self.quality >= 0.0
            && ((self.preservation + self.structural + self.quality) - 1.0).abs() < 1e-9
    }
}

/// Weights do not describe a convex combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidWeightsError;

impl std::fmt::Display for InvalidWeightsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "weights must be non-negative and sum to 1.0")
    }
}

impl std::error::Error for InvalidWeightsError {}

/// Quantification failed on an input log or on the weights
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundTripError {
    /// One of the tables misses required columns
    Schema(SchemaError),
    /// The weights are not a convex combination
    InvalidWeights(InvalidWeightsError),
}

impl std::fmt::Display for RoundTripError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundTripError::Schema(e) => write!(f, "Round-trip quantification failed: {}", e),
            RoundTripError::InvalidWeights(e) => {
                write!(f, "Round-trip quantification failed: {}", e)
            }
        }
    }
}

impl std::error::Error for RoundTripError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoundTripError::Schema(e) => Some(e),
            RoundTripError::InvalidWeights(e) => Some(e),
        }
    }
}

impl From<SchemaError> for RoundTripError {
    fn from(e: SchemaError) -> Self {
        RoundTripError::Schema(e)
    }
}

impl From<InvalidWeightsError> for RoundTripError {
    fn from(e: InvalidWeightsError) -> Self {
        RoundTripError::InvalidWeights(e)
    }
}

/// Full result of a round-trip quantification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundTripReport {
    /// Metrics snapshot of the original table
    pub original_metrics: TableMetrics,
    /// Metrics snapshot of the round-trip table
    pub roundtrip_metrics: TableMetrics,
    /// Per-metric preservation ratios
    pub preservation: PreservationRatios,
    /// Column-level schema comparison
    pub structural: StructuralAnalysis,
    /// Value-level comparison
    pub quality: QualityAnalysis,
    /// Mean of the preservation ratios
    pub preservation_score: f64,
    /// Mean of the structural ratios
    pub structural_score: f64,
    /// Mean of the quality ratios
    pub quality_score: f64,
    /// Weighted overall score in `[0, 1]`
    pub overall_score: f64,
    /// Short human-readable notes on schema changes
    pub insights: Vec<String>,
}

/// Quantify a table-to-OCEL-to-table round trip
///
/// Both tables must carry the `case_id`, `activity` and `timestamp`
/// columns. An unchanged table scores exactly `1.0`.
pub fn quantify_roundtrip(
    original: &TableLog,
    roundtrip: &TableLog,
    date_format: Option<&str>,
    weights: RoundTripWeights,
) -> Result<RoundTripReport, RoundTripError> {
    if !weights.is_valid() {
        return Err(InvalidWeightsError.into());
    }
    let original_metrics = table_metrics(original, date_format)?;
    let roundtrip_metrics = table_metrics(roundtrip, date_format)?;

    let preservation = PreservationRatios::compute(&original_metrics, &roundtrip_metrics);
    let structural = StructuralAnalysis::compute(original, roundtrip);
    let quality = QualityAnalysis::compute(original, roundtrip, &structural.preserved_columns);

    let preservation_score = preservation.mean();
    let structural_score = structural.mean();
    let quality_score = quality.mean();
    let overall_score = preservation_score * weights.preservation
        + structural_score * weights.structural
        + quality_score * weights.quality;

    let mut insights = Vec::new();
    if !structural.removed_columns.is_empty() {
        insights.push(format!(
            "Columns lost in the round trip: {}",
            structural.removed_columns.join(", ")
        ));
    }
    if !structural.added_columns.is_empty() {
        insights.push(format!(
            "Columns introduced by the round trip: {}",
            structural.added_columns.join(", ")
        ));
    }
    for (column, before, after) in &structural.dtype_changes {
        insights.push(format!(
            "Column '{}' changed type from {} to {}",
            column, before, after
        ));
    }

    Ok(RoundTripReport {
        original_metrics,
        roundtrip_metrics,
        preservation,
        structural,
        quality,
        preservation_score,
        structural_score,
        quality_score,
        overall_score,
        insights,
    })
}
