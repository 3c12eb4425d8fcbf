//! marklens - marksheet extraction and course-performance prediction.
//!
//! Two independent pipelines:
//! - Document extraction: image → preprocessing → OCR → field parsing → totals
//! - Performance scoring: metrics record → feature vector → random forest → graded prediction
//!
//! Persistence, authentication and HTTP hosting live outside this crate; callers
//! hand in an image path or a metrics record and receive a serializable result.

pub mod config;
pub mod grading;
pub mod marksheet;
pub mod models;
pub mod ocr;
pub mod prediction;
pub mod services;
pub mod utils;

pub use config::Config;
pub use grading::Grade;
pub use marksheet::MarksheetProcessor;
pub use models::{MarksheetResult, MetricsRecord, PredictionResult};
pub use prediction::{PredictionEngine, PredictionError, SharedEngine};
