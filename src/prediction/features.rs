//! Fixed-order feature vectors built from metrics records.

use crate::models::MetricsRecord;

/// Number of model inputs.
pub const FEATURE_COUNT: usize = 10;

/// One model input row.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Metrics-record keys, in the column order the model is fit with.
pub const METRIC_KEYS: [&str; FEATURE_COUNT] = [
    // academic performance
    "previous_grade",
    "attendance_percentage",
    "assignment_completion_rate",
    "class_participation_score",
    // study patterns
    "study_hours_per_week",
    "self_study_score",
    "group_study_score",
    // engagement
    "submission_timeliness",
    "extra_curricular_participation",
    "project_scores",
];

/// Display names for the same columns, used for importance factors.
pub const FACTOR_LABELS: [&str; FEATURE_COUNT] = [
    "previous_grade",
    "attendance",
    "assignment_completion",
    "class_participation",
    "study_hours",
    "self_study",
    "group_study",
    "submission_timeliness",
    "extra_curricular",
    "project_scores",
];

/// Build the feature vector for a record. Missing or malformed values are 0.
pub fn build_features(metrics: &MetricsRecord) -> FeatureVector {
    METRIC_KEYS.map(|key| metrics.value_or_zero(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_record_is_all_zero() {
        assert_eq!(build_features(&MetricsRecord::new()), [0.0; FEATURE_COUNT]);
    }

    #[test]
    fn test_column_order() {
        let record: MetricsRecord = serde_json::from_value(json!({
            "project_scores": 10,
            "previous_grade": 1,
            "submission_timeliness": "8",
            "attendance_percentage": 2.5,
            "unrelated": 99,
        }))
        .unwrap();

        let features = build_features(&record);
        assert_eq!(features[0], 1.0);
        assert_eq!(features[1], 2.5);
        assert_eq!(features[7], 8.0);
        assert_eq!(features[9], 10.0);
        assert_eq!(features.iter().filter(|v| **v == 0.0).count(), 6);
    }
}
