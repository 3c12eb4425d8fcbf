//! Image preprocessing and OCR text extraction.
//!
//! Marksheet scans go through a fixed cleanup pass (grayscale, Otsu
//! binarization, one 3x3 dilation, one 3x3 erosion) before being handed to
//! an OCR backend. Tesseract is the production backend; the `OcrBackend`
//! trait lets callers and tests substitute another engine.
//!
//! PDF input is rasterized (first page) with pdftoppm before preprocessing.

mod backend;
mod extractor;
mod preprocess;
mod tesseract;
mod tools;

pub use backend::{ExtractionError, OcrBackend};
pub use extractor::TextExtractor;
pub use preprocess::{binarize, preprocess, to_grayscale};
pub use tesseract::TesseractBackend;
pub use tools::{check_binary, check_tools};
