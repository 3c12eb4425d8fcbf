//! Prediction output models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grading::Grade;

/// A learned feature weight paired with the student's current value for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceFactor {
    pub factor: String,
    pub importance: f64,
    pub current_value: f64,
}

/// Result of a single performance prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Raw model output, not clamped to 0..=100.
    pub predicted_score: f64,
    pub predicted_grade: Grade,
    /// Distance-from-midpoint heuristic in `[0.1, 0.95]`, not a calibrated probability.
    pub confidence_score: f64,
    /// Sorted by importance, highest first.
    pub importance_factors: Vec<ImportanceFactor>,
    pub prediction_date: DateTime<Utc>,
    pub model_version: String,
}
