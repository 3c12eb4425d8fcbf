//! Configuration management for marklens.
//!
//! Every field has a default, so a missing config file is never an error.
//! A file that exists but does not parse is.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name prefer searches for (`marklens.toml`, `marklens.yaml`, ...).
pub const APP_NAME: &str = "marklens";

/// Default maximum accepted upload size (16 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

/// OCR engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Tesseract language pack.
    pub language: String,
    /// Tesseract `--oem` value. 1 selects the LSTM (neural net only) engine.
    pub engine_mode: u8,
    /// Tesseract `--psm` value. 6 assumes a single uniform block of text.
    pub page_segmentation: u8,
    /// Tesseract binary name or path.
    pub tesseract_bin: String,
    /// Resolution used when rasterizing PDF input.
    pub pdf_dpi: u32,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            engine_mode: 1,
            page_segmentation: 6,
            tesseract_bin: "tesseract".to_string(),
            pdf_dpi: 300,
        }
    }
}

impl OcrSettings {
    /// Apply `MARKLENS_OCR_LANG` / `MARKLENS_TESSERACT` overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(lang) = std::env::var("MARKLENS_OCR_LANG") {
            if !lang.trim().is_empty() {
                self.language = lang.trim().to_string();
            }
        }
        if let Ok(bin) = std::env::var("MARKLENS_TESSERACT") {
            if !bin.trim().is_empty() {
                self.tesseract_bin = bin.trim().to_string();
            }
        }
        self
    }
}

/// Upload intake limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Lower-case file extensions accepted for extraction.
    pub allowed_extensions: Vec<String>,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            allowed_extensions: ["png", "jpg", "jpeg", "pdf"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Prediction model hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub random_seed: u64,
    /// Importance factors at or below this value are dropped from predictions.
    pub importance_threshold: f64,
    /// Tag reported as `model_version` on every prediction.
    pub model_version: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 10,
            random_seed: 42,
            importance_threshold: 0.05,
            model_version: "1.0".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ocr: OcrSettings,
    pub upload: UploadSettings,
    pub model: ModelSettings,
    /// Path the config was loaded from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer for discovery.
    ///
    /// Falls back to defaults (with env overrides) when no file is found. A
    /// discovered file that does not parse is an error.
    pub async fn load() -> Result<Self, ConfigError> {
        match prefer::load(APP_NAME).await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => Self::load_from_path(path),
                None => Ok(Self::default_with_env()),
            },
            Err(e) => {
                tracing::debug!("No config file discovered: {}", e);
                Ok(Self::default_with_env())
            }
        }
    }

    /// Load from an explicit path when given, otherwise discover.
    pub async fn load_or_discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load().await,
        }
    }

    /// Defaults with environment variable overrides applied.
    pub fn default_with_env() -> Self {
        let mut config = Self::default();
        config.ocr = config.ocr.with_env_overrides();
        config
    }

    /// Load configuration from a specific file path.
    /// The format is picked from the extension: TOML, YAML, otherwise JSON.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        config.ocr = config.ocr.with_env_overrides();
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_err = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        match ext {
            "toml" => toml::from_str(contents).map_err(|e| parse_err("TOML", e.to_string())),
            "yaml" | "yml" => {
                serde_yaml::from_str(contents).map_err(|e| parse_err("YAML", e.to_string()))
            }
            _ => serde_json::from_str(contents).map_err(|e| parse_err("JSON", e.to_string())),
        }
    }
}
