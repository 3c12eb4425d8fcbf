//! Course-level aggregation over stored predictions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grading::Grade;
use crate::models::PredictionResult;
use crate::utils::round_to;

/// How often a factor appeared and its mean importance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorSummary {
    pub count: usize,
    pub avg_importance: f64,
}

/// Summary of all predictions made for one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseAnalytics {
    /// Every grade is present, zero counts included.
    pub grade_distribution: BTreeMap<Grade, usize>,
    pub average_confidence: f64,
    pub common_factors: BTreeMap<String, FactorSummary>,
    pub total_predictions: usize,
    pub last_updated: DateTime<Utc>,
}

impl CourseAnalytics {
    pub fn from_predictions(predictions: &[PredictionResult]) -> Self {
        let mut grade_distribution: BTreeMap<Grade, usize> =
            Grade::ALL.iter().map(|g| (*g, 0)).collect();
        let mut totals: BTreeMap<String, (usize, f64)> = BTreeMap::new();

        for prediction in predictions {
            *grade_distribution
                .entry(prediction.predicted_grade)
                .or_default() += 1;

            for factor in &prediction.importance_factors {
                let entry = totals.entry(factor.factor.clone()).or_default();
                entry.0 += 1;
                entry.1 += factor.importance;
            }
        }

        let average_confidence = if predictions.is_empty() {
            0.0
        } else {
            let sum: f64 = predictions.iter().map(|p| p.confidence_score).sum();
            round_to(sum / predictions.len() as f64, 2)
        };

        let common_factors = totals
            .into_iter()
            .map(|(name, (count, sum))| {
                let summary = FactorSummary {
                    count,
                    avg_importance: sum / count as f64,
                };
                (name, summary)
            })
            .collect();

        Self {
            grade_distribution,
            average_confidence,
            common_factors,
            total_predictions: predictions.len(),
            last_updated: Utc::now(),
        }
    }
}
