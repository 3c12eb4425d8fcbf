//! End-to-end marksheet pipeline tests.
//!
//! OCR runs against a scripted backend so these pass without tesseract installed.

use std::sync::Mutex;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};

use marklens::marksheet::process_text;
use marklens::ocr::{ExtractionError, OcrBackend, TextExtractor};
use marklens::{Grade, MarksheetProcessor};

const REFERENCE_SHEET: &str = "Roll No: 45\nName: Jane Doe\nMath: 80/100\nScience: 45/50";

/// Returns fixed text and remembers the dimensions and pixel values it saw.
struct ScriptedBackend {
    text: String,
    seen: Mutex<Option<GrayImage>>,
}

impl ScriptedBackend {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            seen: Mutex::new(None),
        }
    }
}

impl OcrBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn availability_hint(&self) -> String {
        "always available".to_string()
    }

    fn recognize(&self, image: &GrayImage) -> Result<String, ExtractionError> {
        *self.seen.lock().unwrap() = Some(image.clone());
        Ok(format!("\n  {}  \n", self.text))
    }
}

/// Dark text-like block on a light background.
fn synthetic_scan() -> RgbImage {
    RgbImage::from_fn(64, 32, |x, y| {
        if (16..48).contains(&x) && (8..24).contains(&y) {
            Rgb([20, 25, 30])
        } else {
            Rgb([235, 230, 225])
        }
    })
}

#[test]
fn reference_sheet_text_parses_end_to_end() {
    let result = process_text(REFERENCE_SHEET);

    assert_eq!(result.student_info.roll_number.as_deref(), Some("45"));
    assert_eq!(result.student_info.name.as_deref(), Some("Jane Doe"));
    assert_eq!(result.student_info.class, None);
    assert_eq!(result.student_info.term, None);

    let subjects: Vec<_> = result.marks_data.iter().map(|m| m.subject.as_str()).collect();
    assert_eq!(subjects, ["Math", "Science"]);
    assert_eq!(result.total_marks.obtained, 125.0);
    assert_eq!(result.total_marks.maximum, 150.0);
    assert_eq!(result.total_marks.percentage, 83.33);
    assert_eq!(result.grade(), Grade::A);
}

#[test]
fn text_without_fields_yields_empty_result() {
    let result = process_text("smudged scan, nothing legible");
    assert!(result.is_empty());
    assert_eq!(result.total_marks.percentage, 0.0);
}

#[test]
fn processor_runs_preprocessing_and_parses_backend_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.png");
    synthetic_scan().save_with_format(&path, ImageFormat::Png).unwrap();

    let processor =
        MarksheetProcessor::new(TextExtractor::with_backend(ScriptedBackend::new(REFERENCE_SHEET)));
    let result = processor.process(&path).unwrap();

    assert_eq!(result.student_info.roll_number.as_deref(), Some("45"));
    assert_eq!(result.total_marks.percentage, 83.33);

    let seen = processor.extractor().backend().seen.lock().unwrap().clone().unwrap();
    assert_eq!(seen.dimensions(), (64, 32));
    assert!(seen.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    assert_eq!(seen.get_pixel(32, 16), &Luma([0]));
    assert_eq!(seen.get_pixel(2, 2), &Luma([255]));
}

#[test]
fn extracted_text_is_trimmed() {
    let extractor = TextExtractor::with_backend(ScriptedBackend::new("Math: 10/20"));
    let text = extractor
        .extract_image(&DynamicImage::ImageRgb8(synthetic_scan()))
        .unwrap();
    assert_eq!(text, "Math: 10/20");
}

#[test]
fn missing_file_is_an_image_read_error() {
    let processor = MarksheetProcessor::new(TextExtractor::with_backend(ScriptedBackend::new("")));
    let err = processor
        .process(std::path::Path::new("/nonexistent/sheet.png"))
        .unwrap_err();
    assert!(matches!(err, ExtractionError::ImageRead { .. }));
}

#[test]
fn undecodable_file_is_an_image_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let processor = MarksheetProcessor::new(TextExtractor::with_backend(ScriptedBackend::new("")));
    let err = processor.process(&path).unwrap_err();
    assert!(matches!(err, ExtractionError::ImageRead { .. }));
}

#[test]
fn zero_area_image_is_a_processing_error() {
    let extractor = TextExtractor::with_backend(ScriptedBackend::new("ignored"));
    let err = extractor
        .extract_image(&DynamicImage::new_luma8(0, 0))
        .unwrap_err();
    assert!(matches!(err, ExtractionError::ImageProcessing(_)));
    assert!(extractor.backend().seen.lock().unwrap().is_none());
}

#[test]
fn blank_recognition_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.png");
    synthetic_scan().save_with_format(&path, ImageFormat::Png).unwrap();

    let processor = MarksheetProcessor::new(TextExtractor::with_backend(ScriptedBackend::new("")));
    let result = processor.process(&path).unwrap();
    assert!(result.is_empty());
}
