//! Course-performance prediction engine.

use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::features::{build_features, FeatureVector, FACTOR_LABELS};
use super::forest::{ForestParams, RandomForest};
use super::scaler::StandardScaler;
use crate::config::ModelSettings;
use crate::grading::Grade;
use crate::models::{ImportanceFactor, MetricsRecord, PredictionResult};
use crate::utils::round_to;

/// Score at which confidence bottoms out at 0.5.
const CONFIDENCE_MIDPOINT: f64 = 70.0;
const MIN_CONFIDENCE: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.95;

/// Errors that can occur while training or querying the engine.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Model not trained yet")]
    NotTrained,

    #[error("Invalid training data: {0}")]
    InvalidTrainingData(String),

    #[error("Invalid model parameters: {0}")]
    InvalidParameters(String),

    #[error("Model persistence failed: {0}")]
    Persistence(String),

    #[error("Engine lock poisoned")]
    LockPoisoned,
}

/// Everything produced by one successful `train` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FittedModel {
    model_version: String,
    scaler: StandardScaler,
    forest: RandomForest,
}

impl FittedModel {
    /// Fit scaler and forest together. Leaves no state behind on failure.
    pub(crate) fn fit(
        settings: &ModelSettings,
        records: &[MetricsRecord],
        labels: &[f64],
    ) -> Result<Self, PredictionError> {
        if records.is_empty() {
            return Err(PredictionError::InvalidTrainingData(
                "no training records".to_string(),
            ));
        }
        if records.len() != labels.len() {
            return Err(PredictionError::InvalidTrainingData(format!(
                "{} records but {} labels",
                records.len(),
                labels.len()
            )));
        }
        if let Some(pos) = labels.iter().position(|l| !l.is_finite()) {
            return Err(PredictionError::InvalidTrainingData(format!(
                "label {} is not a finite number",
                pos
            )));
        }
        if settings.n_estimators == 0 || settings.max_depth == 0 {
            return Err(PredictionError::InvalidParameters(
                "n_estimators and max_depth must be at least 1".to_string(),
            ));
        }

        let rows: Vec<FeatureVector> = records.iter().map(build_features).collect();
        let scaler = StandardScaler::fit(&rows);
        let scaled = scaler.transform_all(&rows);

        let params = ForestParams {
            n_estimators: settings.n_estimators,
            max_depth: settings.max_depth,
            seed: settings.random_seed,
        };
        let forest = RandomForest::fit(&scaled, labels, &params);

        Ok(Self {
            model_version: settings.model_version.clone(),
            scaler,
            forest,
        })
    }
}

/// Caller-owned prediction engine: a random forest plus its feature scaler.
///
/// `train` replaces any previous fit; `predict` before the first successful
/// `train` fails with [`PredictionError::NotTrained`]. Concurrent use of one
/// instance needs external serialization; see [`super::SharedEngine`].
#[derive(Debug, Clone, Default)]
pub struct PredictionEngine {
    settings: ModelSettings,
    fitted: Option<FittedModel>,
}

impl PredictionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ModelSettings) -> Self {
        Self {
            settings,
            fitted: None,
        }
    }

    /// Engine fit on [`reference_training_set`].
    ///
    /// A stand-in for a real trained model, useful for demos and smoke tests.
    pub fn with_reference_fit(settings: ModelSettings) -> Result<Self, PredictionError> {
        let (records, labels) = reference_training_set();
        let mut engine = Self::with_settings(settings);
        engine.train(&records, &labels)?;
        Ok(engine)
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    pub fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }

    /// Fit the scaler and forest on `records` with numeric `labels`.
    ///
    /// On error the previous fit, if any, is kept.
    pub fn train(&mut self, records: &[MetricsRecord], labels: &[f64]) -> Result<(), PredictionError> {
        let fitted = FittedModel::fit(&self.settings, records, labels)?;
        self.install(fitted);
        tracing::info!(
            "Model training completed on {} records ({} trees)",
            records.len(),
            self.settings.n_estimators
        );
        Ok(())
    }

    pub(crate) fn install(&mut self, fitted: FittedModel) {
        self.fitted = Some(fitted);
    }

    /// Predict a course score, grade, confidence and ranked importance factors.
    pub fn predict(&self, metrics: &MetricsRecord) -> Result<PredictionResult, PredictionError> {
        let fitted = self.fitted.as_ref().ok_or(PredictionError::NotTrained)?;

        let features = fitted.scaler.transform(&build_features(metrics));
        // Banding and confidence use the raw score; only reported numbers are rounded.
        let raw_score = fitted.forest.predict(&features);

        Ok(PredictionResult {
            predicted_score: round_to(raw_score, 2),
            predicted_grade: Grade::from_score(raw_score),
            confidence_score: round_to(confidence_score(raw_score), 2),
            importance_factors: importance_factors(
                fitted.forest.feature_importances(),
                metrics,
                self.settings.importance_threshold,
            ),
            prediction_date: Utc::now(),
            model_version: fitted.model_version.clone(),
        })
    }

    /// Learned per-feature importances, in feature-vector order.
    pub fn feature_importances(&self) -> Result<FeatureVector, PredictionError> {
        self.fitted
            .as_ref()
            .map(|f| *f.forest.feature_importances())
            .ok_or(PredictionError::NotTrained)
    }

    /// Write the fitted model as JSON.
    pub fn save(&self, path: &Path) -> Result<(), PredictionError> {
        let fitted = self.fitted.as_ref().ok_or(PredictionError::NotTrained)?;
        let json = serde_json::to_string(fitted)
            .map_err(|e| PredictionError::Persistence(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| {
            PredictionError::Persistence(format!("failed to write {}: {}", path.display(), e))
        })
    }

    /// Load a model written by [`PredictionEngine::save`]. The result is trained.
    pub fn load(path: &Path, settings: ModelSettings) -> Result<Self, PredictionError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            PredictionError::Persistence(format!("failed to read {}: {}", path.display(), e))
        })?;
        let fitted: FittedModel = serde_json::from_str(&json).map_err(|e| {
            PredictionError::Persistence(format!("invalid model file {}: {}", path.display(), e))
        })?;
        tracing::debug!(
            "Loaded model version {} from {}",
            fitted.model_version,
            path.display()
        );

        Ok(Self {
            settings,
            fitted: Some(fitted),
        })
    }
}

/// Heuristic confidence: 0.5 at a score of 70, growing with distance, clamped to [0.1, 0.95].
pub fn confidence_score(predicted_score: f64) -> f64 {
    (0.5 + (predicted_score - CONFIDENCE_MIDPOINT).abs() / 100.0).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Pair importances with current values, keep those above `threshold`, highest first.
///
/// Values are looked up by factor label, not metric key; absent labels read as 0.
fn importance_factors(
    importances: &FeatureVector,
    metrics: &MetricsRecord,
    threshold: f64,
) -> Vec<ImportanceFactor> {
    let mut factors: Vec<ImportanceFactor> = FACTOR_LABELS
        .iter()
        .zip(importances)
        .map(|(label, importance)| ImportanceFactor {
            factor: label.to_string(),
            importance: round_to(*importance, 3),
            current_value: metrics.value_or_zero(label),
        })
        .filter(|f| f.importance > threshold)
        .collect();

    factors.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    factors
}

/// Three fixed records and labels the engine can be fit on when no trained
/// model is available.
pub fn reference_training_set() -> (Vec<MetricsRecord>, Vec<f64>) {
    let rows = [(85.0, 90.0, 95.0), (75.0, 80.0, 85.0), (65.0, 70.0, 75.0)];
    let records = rows
        .iter()
        .map(|&(grade, attendance, completion)| {
            MetricsRecord::new()
                .with("previous_grade", grade)
                .with("attendance_percentage", attendance)
                .with("assignment_completion_rate", completion)
        })
        .collect();
    (records, vec![87.0, 78.0, 68.0])
}
