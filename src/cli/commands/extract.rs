//! Marksheet extraction commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::sync::Semaphore;

use marklens::marksheet::process_text;
use marklens::services::validate_upload;
use marklens::{Config, MarksheetProcessor, MarksheetResult};

use super::super::helpers::{print_json, read_input, truncate};

#[derive(Serialize)]
struct ExtractedSheet {
    file: PathBuf,
    #[serde(flatten)]
    result: MarksheetResult,
}

/// Extract every marksheet in `paths`, printing the results as JSON.
pub async fn cmd_extract(config: &Config, paths: Vec<PathBuf>, workers: usize) -> anyhow::Result<()> {
    let processor = Arc::new(MarksheetProcessor::from_settings(&config.ocr));
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));

    let pb = if paths.len() > 1 {
        let pb = ProgressBar::new(paths.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")?
                .progress_chars("█▓░"),
        );
        pb.set_message("Extracting...");
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut handles = Vec::with_capacity(paths.len());
    for path in paths {
        if let Err(e) = validate_upload(&path, &config.upload) {
            handles.push((path, None, Some(e.to_string())));
            continue;
        }

        let permit = semaphore.clone().acquire_owned().await?;
        let processor = processor.clone();
        let task_path = path.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            processor.process(&task_path)
        });
        handles.push((path, Some(handle), None));
    }

    let mut sheets = Vec::new();
    let mut failed = 0usize;
    for (path, handle, rejected) in handles {
        pb.set_message(truncate(&path.display().to_string(), 48));
        let outcome = match (handle, rejected) {
            (Some(handle), _) => handle.await?.map_err(|e| e.to_string()),
            (None, Some(reason)) => Err(reason),
            (None, None) => continue,
        };

        match outcome {
            Ok(result) => {
                tracing::info!(
                    "{}: {} subjects, {:.2}%",
                    path.display(),
                    result.marks_data.len(),
                    result.total_marks.percentage
                );
                sheets.push(ExtractedSheet { file: path, result });
            }
            Err(reason) => {
                failed += 1;
                pb.println(format!("{} {}: {}", style("✗").red(), path.display(), reason));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    print_json(&sheets)?;

    if failed > 0 {
        anyhow::bail!("{} of {} marksheets failed", failed, failed + sheets.len());
    }
    Ok(())
}

/// Parse already-extracted text without running OCR.
pub fn cmd_parse(input: &Path) -> anyhow::Result<()> {
    let text = read_input(input)?;
    let result = process_text(&text);
    if result.is_empty() {
        eprintln!("{} No student details or marks found", style("!").yellow());
    }
    print_json(&result)
}
