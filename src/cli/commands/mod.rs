//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod extract;
mod predict;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use marklens::Config;

#[derive(Parser)]
#[command(name = "marklens")]
#[command(about = "Marksheet OCR extraction and course-performance prediction")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Extract student fields and subject marks from marksheet images
    Extract {
        /// Image files (png, jpg, jpeg, pdf)
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Number of extraction workers
        #[arg(short, long, default_value = "4")]
        workers: usize,
    },

    /// Parse already-extracted marksheet text ("-" reads stdin)
    Parse {
        /// Text file to parse
        input: PathBuf,
    },

    /// Train a prediction model and save it
    Train {
        /// JSON array of {"metrics": {...}, "label": number}
        #[arg(short, long)]
        data: PathBuf,
        /// Where to write the trained model
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Predict course performance from a metrics record
    Predict {
        /// JSON metrics record ("-" reads stdin)
        #[arg(short, long)]
        metrics: PathBuf,
        /// Trained model file (falls back to the built-in reference fit)
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Summarize stored predictions for a course
    Analytics {
        /// JSON array of prediction results
        predictions: PathBuf,
    },

    /// Check OCR tool availability
    Check,
}

/// Parse arguments, load configuration and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_discover(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    if let Some(path) = &config.source_path {
        tracing::info!("Using config {}", path.display());
    }

    match cli.command {
        Commands::Extract { paths, workers } => extract::cmd_extract(&config, paths, workers).await,
        Commands::Parse { input } => extract::cmd_parse(&input),
        Commands::Train { data, out } => predict::cmd_train(&config, &data, &out),
        Commands::Predict { metrics, model } => {
            predict::cmd_predict(&config, &metrics, model.as_deref())
        }
        Commands::Analytics { predictions } => predict::cmd_analytics(&predictions),
        Commands::Check => check::cmd_check(&config),
    }
}
