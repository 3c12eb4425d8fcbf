//! Training, prediction and course analytics commands.

use std::path::Path;

use console::style;
use serde::Deserialize;

use marklens::services::CourseAnalytics;
use marklens::{Config, MetricsRecord, PredictionEngine, PredictionResult};

use super::super::helpers::{print_json, read_json};

/// One labelled row of a training file.
#[derive(Debug, Deserialize)]
struct TrainingRow {
    metrics: MetricsRecord,
    label: f64,
}

/// Fit a model on a JSON training file and save it to `out`.
pub fn cmd_train(config: &Config, data: &Path, out: &Path) -> anyhow::Result<()> {
    let rows: Vec<TrainingRow> = read_json(data)?;
    let (records, labels): (Vec<MetricsRecord>, Vec<f64>) =
        rows.into_iter().map(|row| (row.metrics, row.label)).unzip();

    let mut engine = PredictionEngine::with_settings(config.model.clone());
    engine.train(&records, &labels)?;
    engine.save(out)?;

    println!(
        "{} Trained on {} records, saved to {}",
        style("✓").green(),
        records.len(),
        out.display()
    );
    Ok(())
}

/// Predict from one metrics record using a saved model or the reference fit.
pub fn cmd_predict(config: &Config, metrics: &Path, model: Option<&Path>) -> anyhow::Result<()> {
    let record: MetricsRecord = read_json(metrics)?;

    let engine = match model {
        Some(path) => PredictionEngine::load(path, config.model.clone())?,
        None => {
            tracing::warn!("No model given, using the built-in reference fit");
            PredictionEngine::with_reference_fit(config.model.clone())?
        }
    };

    let result = engine.predict(&record)?;
    print_json(&result)
}

/// Summarize a JSON array of stored predictions.
pub fn cmd_analytics(predictions: &Path) -> anyhow::Result<()> {
    let results: Vec<PredictionResult> = read_json(predictions)?;
    if results.is_empty() {
        eprintln!("{} No predictions to summarize", style("!").yellow());
    }
    print_json(&CourseAnalytics::from_predictions(&results))
}
