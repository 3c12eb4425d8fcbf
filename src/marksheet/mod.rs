//! Marksheet pipeline: OCR text → student fields and subject marks → totals.

mod aggregate;
mod fields;

use std::path::Path;

pub use aggregate::{aggregate, build_result};
pub use fields::{parse_marks, parse_student_info, StudentField};

use crate::config::OcrSettings;
use crate::models::MarksheetResult;
use crate::ocr::{ExtractionError, OcrBackend, TesseractBackend, TextExtractor};

/// Runs the full extraction pipeline for one marksheet at a time.
pub struct MarksheetProcessor<B = TesseractBackend> {
    extractor: TextExtractor<B>,
}

impl MarksheetProcessor<TesseractBackend> {
    /// Tesseract-backed processor configured from OCR settings.
    pub fn from_settings(settings: &OcrSettings) -> Self {
        Self::new(TextExtractor::from_settings(settings))
    }
}

impl<B: OcrBackend> MarksheetProcessor<B> {
    pub fn new(extractor: TextExtractor<B>) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &TextExtractor<B> {
        &self.extractor
    }

    /// Extract, parse and total the marksheet image at `path`.
    ///
    /// Fails only when the image cannot be read or processed; a sheet with no
    /// recognizable content yields an empty result.
    pub fn process(&self, path: &Path) -> Result<MarksheetResult, ExtractionError> {
        let text = self.extractor.extract(path)?;
        if text.is_empty() {
            tracing::warn!("No text recognized in {}", path.display());
        }
        Ok(process_text(&text))
    }
}

/// Parse and total already-extracted marksheet text.
pub fn process_text(text: &str) -> MarksheetResult {
    build_result(parse_student_info(text), parse_marks(text))
}
