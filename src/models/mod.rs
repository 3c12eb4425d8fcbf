//! Data models for marklens.

mod marksheet;
mod metrics;
mod prediction;

pub use marksheet::{MarksheetResult, StudentInfo, SubjectMark, TotalMarks};
pub use metrics::MetricsRecord;
pub use prediction::{ImportanceFactor, PredictionResult};
