//! OCR backend abstraction and extraction errors.

use std::path::PathBuf;

use image::GrayImage;
use thiserror::Error;

/// Errors that can occur while turning a marksheet image into text.
///
/// An empty recognition result is not an error.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Could not read image at {path}: {reason}")]
    ImageRead { path: PathBuf, reason: String },

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An engine that recognizes text in a preprocessed bitmap.
pub trait OcrBackend: Send + Sync {
    /// Short engine name for logs and tool reports.
    fn name(&self) -> &'static str;

    /// Check if this backend can run on this system.
    fn is_available(&self) -> bool;

    /// Human-readable hint about availability (install instructions, etc.).
    fn availability_hint(&self) -> String;

    /// Recognize text in a single-channel image. Output is untrimmed.
    fn recognize(&self, image: &GrayImage) -> Result<String, ExtractionError>;
}
