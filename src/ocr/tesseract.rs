//! Tesseract OCR backend implementation.
//!
//! Runs the tesseract binary on a temporary PNG of the preprocessed bitmap.

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use image::{GrayImage, ImageFormat};

use super::backend::{ExtractionError, OcrBackend};
use super::tools::{check_binary, handle_cmd_output};
use crate::config::OcrSettings;

/// Tesseract OCR backend.
pub struct TesseractBackend {
    settings: OcrSettings,
}

impl TesseractBackend {
    /// Create a new Tesseract backend with default settings.
    pub fn new() -> Self {
        Self {
            settings: OcrSettings::default(),
        }
    }

    /// Create a new Tesseract backend with custom settings.
    pub fn with_settings(settings: OcrSettings) -> Self {
        Self { settings }
    }

    /// Arguments following the input path.
    fn command_args(&self) -> Vec<String> {
        vec![
            "stdout".to_string(),
            "-l".to_string(),
            self.settings.language.clone(),
            "--oem".to_string(),
            self.settings.engine_mode.to_string(),
            "--psm".to_string(),
            self.settings.page_segmentation.to_string(),
        ]
    }

    /// Run Tesseract on an image file.
    fn run_tesseract(&self, image_path: &Path) -> Result<String, ExtractionError> {
        let output = Command::new(&self.settings.tesseract_bin)
            .arg(image_path)
            .args(self.command_args())
            .output();

        handle_cmd_output(
            output,
            "tesseract (install tesseract-ocr)",
            "tesseract failed",
        )
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        check_binary(&self.settings.tesseract_bin)
    }

    fn availability_hint(&self) -> String {
        if self.is_available() {
            "Tesseract is available".to_string()
        } else {
            "Tesseract not installed. Install with: apt install tesseract-ocr".to_string()
        }
    }

    fn recognize(&self, image: &GrayImage) -> Result<String, ExtractionError> {
        let start = Instant::now();

        let temp = tempfile::Builder::new()
            .prefix("marklens-")
            .suffix(".png")
            .tempfile()?;
        image
            .save_with_format(temp.path(), ImageFormat::Png)
            .map_err(|e| ExtractionError::ImageProcessing(format!("failed to write PNG: {}", e)))?;

        let text = self.run_tesseract(temp.path())?;
        tracing::debug!(
            "tesseract recognized {} chars in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args_follow_settings() {
        let backend = TesseractBackend::new();
        assert_eq!(
            backend.command_args(),
            vec!["stdout", "-l", "eng", "--oem", "1", "--psm", "6"]
        );

        let backend = TesseractBackend::with_settings(OcrSettings {
            language: "hin".to_string(),
            page_segmentation: 4,
            ..OcrSettings::default()
        });
        assert_eq!(backend.command_args()[2], "hin");
        assert_eq!(backend.command_args()[6], "4");
    }

    #[test]
    fn test_missing_binary_is_tool_not_found() {
        let backend = TesseractBackend::with_settings(OcrSettings {
            tesseract_bin: "marklens-missing-tesseract".to_string(),
            ..OcrSettings::default()
        });
        assert!(!backend.is_available());

        let image = GrayImage::new(4, 4);
        assert!(matches!(
            backend.recognize(&image),
            Err(ExtractionError::ToolNotFound(_))
        ));
    }
}
