//! Course-performance prediction.
//!
//! A metrics record becomes a fixed-order feature vector, is standardized with
//! the fitted scaler and scored by a seeded random forest. The score is banded
//! into a letter grade and reported with a distance-from-midpoint confidence
//! heuristic and the forest's learned feature importances.

mod derived;
mod engine;
mod features;
mod forest;
mod scaler;
mod shared;

pub use derived::{
    assignment_completion_rate, attendance_percentage, submission_timeliness, Submission,
};
pub use engine::{confidence_score, reference_training_set, PredictionEngine, PredictionError};
pub use features::{build_features, FeatureVector, FACTOR_LABELS, FEATURE_COUNT, METRIC_KEYS};
pub use forest::{ForestParams, RandomForest, RegressionTree};
pub use scaler::StandardScaler;
pub use shared::SharedEngine;
