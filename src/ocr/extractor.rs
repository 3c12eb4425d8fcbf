//! Text extraction from marksheet images.

use std::path::Path;

use image::DynamicImage;
use tempfile::TempDir;

use super::backend::{ExtractionError, OcrBackend};
use super::preprocess::preprocess;
use super::tesseract::TesseractBackend;
use super::tools::rasterize_pdf_page;
use crate::config::OcrSettings;

/// Loads an image, cleans it up and runs OCR over it.
///
/// Stateless between calls; concurrent extractions only need separate threads.
pub struct TextExtractor<B = TesseractBackend> {
    backend: B,
    pdf_dpi: u32,
}

impl Default for TextExtractor<TesseractBackend> {
    fn default() -> Self {
        Self::with_backend(TesseractBackend::new())
    }
}

impl TextExtractor<TesseractBackend> {
    /// Create a Tesseract-backed extractor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Tesseract-backed extractor from OCR settings.
    pub fn from_settings(settings: &OcrSettings) -> Self {
        Self::with_backend(TesseractBackend::with_settings(settings.clone()))
            .with_pdf_dpi(settings.pdf_dpi)
    }
}

impl<B: OcrBackend> TextExtractor<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            pdf_dpi: OcrSettings::default().pdf_dpi,
        }
    }

    /// Set the resolution used when rasterizing PDFs.
    pub fn with_pdf_dpi(mut self, dpi: u32) -> Self {
        self.pdf_dpi = dpi;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Extract trimmed text from the image at `path`.
    ///
    /// An empty string means no recognizable text was found.
    pub fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let image = self.load_image(path)?;
        let text = self.extract_image(&image)?;
        tracing::info!(
            "Extracted {} chars from {} using {}",
            text.len(),
            path.display(),
            self.backend.name()
        );
        Ok(text)
    }

    /// Preprocess an in-memory bitmap and run OCR on it.
    pub fn extract_image(&self, image: &DynamicImage) -> Result<String, ExtractionError> {
        let processed = preprocess(image)?;
        let text = self.backend.recognize(&processed)?;
        Ok(text.trim().to_string())
    }

    /// Decode an image file, rasterizing the first page of PDFs.
    pub fn load_image(&self, path: &Path) -> Result<DynamicImage, ExtractionError> {
        if !path.is_file() {
            return Err(ExtractionError::ImageRead {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        if is_pdf(path) {
            let temp_dir = TempDir::new()?;
            let page_path = rasterize_pdf_page(path, 1, self.pdf_dpi, temp_dir.path())?;
            return open_image(&page_path).map_err(|e| match e {
                ExtractionError::ImageRead { reason, .. } => ExtractionError::ImageRead {
                    path: path.to_path_buf(),
                    reason,
                },
                other => other,
            });
        }

        open_image(path)
    }
}

fn open_image(path: &Path) -> Result<DynamicImage, ExtractionError> {
    image::open(path).map_err(|e| ExtractionError::ImageRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use std::sync::Mutex;

    /// Backend that returns canned text and records what it was given.
    struct CannedBackend {
        text: String,
        seen: Mutex<Vec<(u32, u32)>>,
    }

    impl CannedBackend {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl OcrBackend for CannedBackend {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn availability_hint(&self) -> String {
            String::new()
        }

        fn recognize(&self, image: &GrayImage) -> Result<String, ExtractionError> {
            self.seen.lock().unwrap().push(image.dimensions());
            assert!(image.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
            Ok(self.text.clone())
        }
    }

    fn write_png(dir: &Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        GrayImage::from_fn(12, 8, |x, _| Luma([if x < 6 { 20 } else { 230 }]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_extract_trims_and_preprocesses() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "sheet.png");

        let extractor = TextExtractor::with_backend(CannedBackend::new("\n  Math: 80/100 \n\n"));
        let text = extractor.extract(&path).unwrap();

        assert_eq!(text, "Math: 80/100");
        assert_eq!(*extractor.backend().seen.lock().unwrap(), vec![(12, 8)]);
    }

    #[test]
    fn test_empty_text_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "blank.png");

        let extractor = TextExtractor::with_backend(CannedBackend::new("   \n"));
        assert_eq!(extractor.extract(&path).unwrap(), "");
    }

    #[test]
    fn test_missing_file_is_image_read_error() {
        let extractor = TextExtractor::with_backend(CannedBackend::new("x"));
        let err = extractor.extract(Path::new("/nonexistent/sheet.png")).unwrap_err();
        assert!(matches!(err, ExtractionError::ImageRead { .. }));
    }

    #[test]
    fn test_undecodable_file_is_image_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let extractor = TextExtractor::with_backend(CannedBackend::new("x"));
        let err = extractor.extract(&path).unwrap_err();
        assert!(matches!(err, ExtractionError::ImageRead { .. }));
        assert!(extractor.backend().seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_pdf_detection() {
        assert!(is_pdf(Path::new("scan.PDF")));
        assert!(is_pdf(Path::new("dir/scan.pdf")));
        assert!(!is_pdf(Path::new("scan.png")));
        assert!(!is_pdf(Path::new("pdf")));
    }
}
