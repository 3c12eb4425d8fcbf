//! Thread-safe handle around a single prediction engine.

use std::sync::{Arc, RwLock};

use super::engine::{FittedModel, PredictionEngine, PredictionError};
use crate::models::{MetricsRecord, PredictionResult};

/// Cloneable single-writer/multi-reader handle.
///
/// Predictions share a read lock. Training fits outside the lock and only
/// takes the write lock to swap the new model in.
#[derive(Debug, Clone, Default)]
pub struct SharedEngine {
    inner: Arc<RwLock<PredictionEngine>>,
}

impl SharedEngine {
    pub fn new(engine: PredictionEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn train(&self, records: &[MetricsRecord], labels: &[f64]) -> Result<(), PredictionError> {
        let settings = self
            .inner
            .read()
            .map_err(|_| PredictionError::LockPoisoned)?
            .settings()
            .clone();

        let fitted = FittedModel::fit(&settings, records, labels)?;

        self.inner
            .write()
            .map_err(|_| PredictionError::LockPoisoned)?
            .install(fitted);
        tracing::info!("Shared engine retrained on {} records", records.len());
        Ok(())
    }

    pub fn predict(&self, metrics: &MetricsRecord) -> Result<PredictionResult, PredictionError> {
        self.inner
            .read()
            .map_err(|_| PredictionError::LockPoisoned)?
            .predict(metrics)
    }

    pub fn is_trained(&self) -> bool {
        self.inner
            .read()
            .map(|engine| engine.is_trained())
            .unwrap_or(false)
    }
}
