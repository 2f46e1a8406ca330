//! Cross-format conversion quality quantifiers
//!
//! Scores a flat-to-object-centric conversion (and its reverse) from the
//! metrics snapshots of both sides. All sub-metrics except the raw loss
//! counts lie in `[0, 1]`; dimensions are unweighted means of their
//! sub-metrics, and the total is a weighted sum of the dimensions.

use serde::{Deserialize, Serialize};

use super::report::ScoreReport;
use super::roundtrip::InvalidWeightsError;
use crate::metrics::log_metrics::EventLogMetrics;
use crate::metrics::ocel_metrics::OcelMetrics;

/// Similarity of an actual count to its expected counterpart, per
/// `1 - |1 - actual / expected|`; an expected value of zero yields
/// `zero_fallback`. Clamped to `[0, 1]`.
fn ratio_similarity(actual: f64, expected: f64, zero_fallback: f64) -> f64 {
    if expected > 0.0 {
        (1.0 - (1.0 - actual / expected).abs()).clamp(0.0, 1.0)
    } else {
        zero_fallback
    }
}

/// Similarity of two magnitudes, per `1 - |a - b| / max(a, b)`; two zero
/// magnitudes are trivially identical and yield `1.0`.
fn magnitude_similarity(a: f64, b: f64) -> f64 {
    let max = a.max(b);
    if max > 0.0 {
        1.0 - (a - b).abs() / max
    } else {
        1.0
    }
}

/// `actual / expected` capped at `1.0`; an expected value of zero yields
/// `zero_fallback`.
fn capped_ratio(actual: f64, expected: f64, zero_fallback: f64) -> f64 {
    if expected > 0.0 {
        (actual / expected).min(1.0)
    } else {
        zero_fallback
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Dimension weights of the flat-to-object-centric quantifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ForwardWeights {
    /// Weight of the information preservation dimension
    pub information_preservation: f64,
    /// Weight of the object enrichment dimension
    pub object_enrichment: f64,
    /// Weight of the structural integrity dimension
    pub structural_integrity: f64,
}

impl Default for ForwardWeights {
    fn default() -> Self {
        Self {
            information_preservation: 0.30,
            object_enrichment: 0.40,
            structural_integrity: 0.30,
        }
    }
}

impl ForwardWeights {
    /// Whether the weights are non-negative and sum to one
    pub fn is_valid(&self) -> bool {
        self.information_preservation >= 0.0
            && self.object_enrichment >= 0.0
            && self.structural_integrity >= 0.0
            && ((self.information_preservation
                + self.object_enrichment
                + self.structural_integrity)
                - 1.0)
                .abs()
                < 1e-9
    }
}

/// Dimension weights of the object-centric-to-flat quantifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReverseWeights {
    /// Weight of the basic preservation dimension
    pub basic_preservation: f64,
    /// Weight of the information retention dimension
    pub information_retention: f64,
    /// Weight of the complexity handling dimension
    pub complexity_handling: f64,
}

impl Default for ReverseWeights {
    fn default() -> Self {
        Self {
            basic_preservation: 0.30,
            information_retention: 0.50,
            complexity_handling: 0.20,
        }
    }
}

impl ReverseWeights {
    /// Whether the weights are non-negative and sum to one
    pub fn is_valid(&self) -> bool {
        self.basic_preservation >= 0.0
            && self.information_retention >= 0.0
            && self.complexity_handling >= 0.0
            && ((self.basic_preservation + self.information_retention + self.complexity_handling)
                - 1.0)
                .abs()
                < 1e-9
    }
}

/// Score a flat-tagged-log to OCEL conversion from both metrics snapshots
///
/// Rewards faithful event/activity/attribute carry-over, discovered object
/// structure (objects, relationships, type diversity) and consistent case
/// coverage. A conversion of an empty log scores on fallbacks only.
pub fn quantify_log_to_ocel(
    log: &EventLogMetrics,
    ocel: &OcelMetrics,
    weights: ForwardWeights,
) -> Result<ScoreReport, InvalidWeightsError> {
    if !weights.is_valid() {
        return Err(InvalidWeightsError);
    }

    let event_preservation =
        ratio_similarity(ocel.num_events as f64, log.num_events as f64, 0.0);
    let activity_preservation =
        ratio_similarity(ocel.num_event_types as f64, log.num_activities as f64, 0.0);
    let temporal_consistency = magnitude_similarity(log.time_range_hours, ocel.time_range_hours);
    let flat_attributes = (log.num_event_attributes + log.num_case_attributes) as f64;
    let ocel_attributes = (ocel.num_event_attributes + ocel.num_object_attributes) as f64;
    let attribute_preservation = ratio_similarity(ocel_attributes, flat_attributes, 1.0);
    let information_preservation = mean(&[
        event_preservation,
        activity_preservation,
        temporal_consistency,
        attribute_preservation,
    ]);

    // One object per case plus one per resource is the expected yield of
    // the synthesizer; discovering more than that is not rewarded further.
    let expected_objects = (log.num_cases + log.num_resources) as f64;
    let object_discovery_rate = capped_ratio(ocel.num_objects as f64, expected_objects, 0.0);
    let e2o_density = (ocel.avg_e2o_per_event / 2.0).min(1.0);
    let object_type_diversity = (ocel.num_object_types as f64 / 2.0).min(1.0);
    let o2o_discovery = capped_ratio(
        ocel.num_o2o_relationships as f64,
        ocel.num_objects as f64,
        0.0,
    );
    let total_attributes = ocel_attributes;
    let dynamic_utilization = if total_attributes > 0.0 {
        (ocel.num_dynamic_changes as f64 / total_attributes).min(0.1) * 10.0
    } else {
        1.0
    };
    let object_enrichment = mean(&[
        object_discovery_rate,
        e2o_density,
        object_type_diversity,
        o2o_discovery,
        dynamic_utilization,
    ]);

    let case_objects = ocel.num_objects as f64 - log.num_resources as f64;
    let case_coverage = ratio_similarity(case_objects, log.num_cases as f64, 0.0);
    let distribution_consistency =
        magnitude_similarity(log.avg_events_per_case, ocel.avg_events_per_object);
    let structural_integrity = mean(&[case_coverage, distribution_consistency]);

    let total_score = information_preservation * weights.information_preservation
        + object_enrichment * weights.object_enrichment
        + structural_integrity * weights.structural_integrity;

    Ok(ScoreReport {
        title: "Flat-to-object-centric conversion quality".to_string(),
        total_score,
        dimension_scores: vec![
            ("information_preservation".to_string(), information_preservation),
            ("object_enrichment".to_string(), object_enrichment),
            ("structural_integrity".to_string(), structural_integrity),
        ],
        detailed_metrics: vec![
            ("event_preservation".to_string(), event_preservation),
            ("activity_preservation".to_string(), activity_preservation),
            ("temporal_consistency".to_string(), temporal_consistency),
            ("attribute_preservation".to_string(), attribute_preservation),
            ("object_discovery_rate".to_string(), object_discovery_rate),
            ("e2o_density".to_string(), e2o_density),
            ("object_type_diversity".to_string(), object_type_diversity),
            ("o2o_discovery".to_string(), o2o_discovery),
            ("dynamic_utilization".to_string(), dynamic_utilization),
            ("case_coverage".to_string(), case_coverage),
            ("distribution_consistency".to_string(), distribution_consistency),
        ],
    })
}

/// Score an OCEL to flat-tagged-log conversion from both metrics snapshots
///
/// Flattening is inherently lossy; the loss sub-metrics measure what the
/// flat side structurally cannot express (O2O relationships, events shared
/// by several objects, dynamic object attributes, extra object types) and
/// enter the total inverted, so that a lossless flattening scores `1.0`.
pub fn quantify_ocel_to_log(
    ocel: &OcelMetrics,
    log: &EventLogMetrics,
    weights: ReverseWeights,
) -> Result<ScoreReport, InvalidWeightsError> {
    if !weights.is_valid() {
        return Err(InvalidWeightsError);
    }

    let case_selection_preservation =
        capped_ratio(log.num_cases as f64, ocel.num_objects as f64, 1.0);
    let activity_type_preservation =
        capped_ratio(log.num_activities as f64, ocel.num_event_types as f64, 1.0);
    let ocel_attributes = (ocel.num_event_attributes + ocel.num_object_attributes) as f64;
    let flat_attributes = (log.num_event_attributes + log.num_case_attributes) as f64;
    let attribute_mapping_preservation = ratio_similarity(flat_attributes, ocel_attributes, 1.0);
    let temporal_preservation = magnitude_similarity(ocel.time_range_hours, log.time_range_hours);
    let basic_preservation = mean(&[
        case_selection_preservation,
        activity_type_preservation,
        attribute_mapping_preservation,
        temporal_preservation,
    ]);

    let o2o_relationship_loss = ocel.num_o2o_relationships as f64;
    let e2o_relationship_loss = if ocel.avg_e2o_per_event > 0.0 {
        (1.0 - 1.0 / ocel.avg_e2o_per_event).max(0.0)
    } else {
        0.0
    };
    // Events related to several objects collapse onto the primary type only
    let multi_object_event_loss = e2o_relationship_loss;
    let dynamic_attribute_loss = if ocel.num_dynamic_changes > 0 { 1.0 } else { 0.0 };
    let object_type_loss = if ocel.num_object_types > 0 {
        1.0 - 1.0 / ocel.num_object_types as f64
    } else {
        0.0
    };
    let loss_fraction = mean(&[
        o2o_relationship_loss.min(1.0),
        e2o_relationship_loss,
        multi_object_event_loss,
        dynamic_attribute_loss,
        object_type_loss,
    ]);
    let information_retention = 1.0 - loss_fraction;

    let event_distribution_distortion = if ocel.avg_events_per_object > 0.0 {
        (log.avg_events_per_case - ocel.avg_events_per_object).abs() / ocel.avg_events_per_object
    } else {
        0.0
    };
    let event_count_inflation = if ocel.num_events > 0 {
        (log.num_events as f64 - ocel.num_events as f64).abs() / ocel.num_events as f64
    } else {
        0.0
    };
    let complexity_handling =
        1.0 - mean(&[event_distribution_distortion.min(1.0), event_count_inflation.min(1.0)]);

    let total_score = basic_preservation * weights.basic_preservation
        + information_retention * weights.information_retention
        + complexity_handling * weights.complexity_handling;

    Ok(ScoreReport {
        title: "Object-centric-to-flat conversion quality".to_string(),
        total_score,
        dimension_scores: vec![
            ("basic_preservation".to_string(), basic_preservation),
            ("information_retention".to_string(), information_retention),
            ("complexity_handling".to_string(), complexity_handling),
        ],
        detailed_metrics: vec![
            (
                "case_selection_preservation".to_string(),
                case_selection_preservation,
            ),
            (
                "activity_type_preservation".to_string(),
                activity_type_preservation,
            ),
            (
                "attribute_mapping_preservation".to_string(),
                attribute_mapping_preservation,
            ),
            ("temporal_preservation".to_string(), temporal_preservation),
            ("o2o_relationship_loss".to_string(), o2o_relationship_loss),
            ("e2o_relationship_loss".to_string(), e2o_relationship_loss),
            ("multi_object_event_loss".to_string(), multi_object_event_loss),
            ("dynamic_attribute_loss".to_string(), dynamic_attribute_loss),
            ("object_type_loss".to_string(), object_type_loss),
            (
                "event_distribution_distortion".to_string(),
                event_distribution_distortion,
            ),
            ("event_count_inflation".to_string(), event_count_inflation),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_metrics(
        num_events: usize,
        num_cases: usize,
        num_activities: usize,
        num_resources: usize,
    ) -> EventLogMetrics {
        EventLogMetrics {
            num_events,
            num_cases,
            num_activities,
            num_resources,
            num_event_attributes: 2,
            num_case_attributes: 0,
            avg_events_per_case: if num_cases > 0 {
                num_events as f64 / num_cases as f64
            } else {
                0.0
            },
            avg_case_duration_hours: 24.0,
            time_range_hours: 48.0,
            most_frequent_activity: Some("register".to_string()),
            most_active_resource: None,
        }
    }

    fn ocel_metrics_for(log: &EventLogMetrics) -> OcelMetrics {
        OcelMetrics {
            num_events: log.num_events,
            num_event_types: log.num_activities,
            num_event_attributes: log.num_event_attributes,
            num_objects: log.num_cases + log.num_resources,
            num_object_types: 2,
            num_object_attributes: 0,
            num_dynamic_changes: 0,
            num_e2o_relationships: log.num_events * 2,
            num_o2o_relationships: 0,
            avg_events_per_object: if log.num_cases + log.num_resources > 0 {
                (log.num_events * 2) as f64 / (log.num_cases + log.num_resources) as f64
            } else {
                0.0
            },
            avg_e2o_per_event: 2.0,
            avg_o2o_per_object: 0.0,
            time_range_hours: log.time_range_hours,
        }
    }

    #[test]
    fn test_forward_faithful_conversion_scores_high() {
        let log = log_metrics(100, 10, 5, 3);
        let ocel = ocel_metrics_for(&log);
        let report = quantify_log_to_ocel(&log, &ocel, ForwardWeights::default()).unwrap();
        assert!(report.total_score > 0.7, "score was {}", report.total_score);
        for (name, score) in &report.dimension_scores {
            assert!((0.0..=1.0).contains(score), "{} out of range", name);
        }
        let lookup = |key: &str| {
            report
                .detailed_metrics
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, v)| *v)
                .unwrap()
        };
        assert_eq!(lookup("event_preservation"), 1.0);
        assert_eq!(lookup("activity_preservation"), 1.0);
        assert_eq!(lookup("temporal_consistency"), 1.0);
        assert_eq!(lookup("object_discovery_rate"), 1.0);
        assert_eq!(lookup("e2o_density"), 1.0);
    }

    #[test]
    fn test_forward_event_loss_penalized() {
        let log = log_metrics(100, 10, 5, 3);
        let mut ocel = ocel_metrics_for(&log);
        ocel.num_events = 50;
        let full = quantify_log_to_ocel(&log, &ocel_metrics_for(&log), ForwardWeights::default())
            .unwrap();
        let lossy = quantify_log_to_ocel(&log, &ocel, ForwardWeights::default()).unwrap();
        assert!(lossy.total_score < full.total_score);
    }

    #[test]
    fn test_forward_empty_log_uses_fallbacks() {
        let log = log_metrics(0, 0, 0, 0);
        let mut ocel = ocel_metrics_for(&log);
        ocel.num_object_types = 0;
        ocel.avg_e2o_per_event = 0.0;
        let report = quantify_log_to_ocel(&log, &ocel, ForwardWeights::default()).unwrap();
        assert!(report.total_score.is_finite());
        for (name, value) in &report.detailed_metrics {
            assert!(value.is_finite(), "{} not finite", name);
        }
    }

    #[test]
    fn test_reverse_loss_metrics() {
        let log = log_metrics(100, 10, 5, 3);
        let mut ocel = ocel_metrics_for(&log);
        ocel.num_o2o_relationships = 4;
        ocel.num_dynamic_changes = 2;
        let report = quantify_ocel_to_log(&ocel, &log, ReverseWeights::default()).unwrap();
        let lookup = |key: &str| {
            report
                .detailed_metrics
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, v)| *v)
                .unwrap()
        };
        assert_eq!(lookup("o2o_relationship_loss"), 4.0);
        assert_eq!(lookup("dynamic_attribute_loss"), 1.0);
        // avg 2 E2O per event: half the relationships cannot survive
        assert!((lookup("e2o_relationship_loss") - 0.5).abs() < 1e-12);
        assert!((lookup("object_type_loss") - 0.5).abs() < 1e-12);
        assert!(report.total_score < 1.0);
        assert!(report.total_score >= 0.0);
    }

    #[test]
    fn test_reverse_single_type_no_relationships_scores_high() {
        let log = log_metrics(100, 10, 5, 0);
        let ocel = OcelMetrics {
            num_events: 100,
            num_event_types: 5,
            num_event_attributes: 2,
            num_objects: 10,
            num_object_types: 1,
            num_object_attributes: 0,
            num_dynamic_changes: 0,
            num_e2o_relationships: 100,
            num_o2o_relationships: 0,
            avg_events_per_object: 10.0,
            avg_e2o_per_event: 1.0,
            avg_o2o_per_object: 0.0,
            time_range_hours: 48.0,
        };
        let report = quantify_ocel_to_log(&ocel, &log, ReverseWeights::default()).unwrap();
        assert!((report.total_score - 1.0).abs() < 1e-9, "score was {}", report.total_score);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let log = log_metrics(1, 1, 1, 0);
        let ocel = ocel_metrics_for(&log);
        let weights = ForwardWeights {
            information_preservation: 1.0,
            object_enrichment: 1.0,
            structural_integrity: 1.0,
        };
        assert!(quantify_log_to_ocel(&log, &ocel, weights).is_err());
        let rweights = ReverseWeights {
            basic_preservation: 0.0,
            information_retention: 0.0,
            complexity_handling: 0.0,
        };
        assert!(quantify_ocel_to_log(&ocel, &log, rweights).is_err());
    }
}
