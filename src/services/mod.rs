//! Services layered over the two core pipelines.
//!
//! - `intake`: upload checks before extraction
//! - `analytics`: course-level summaries of stored predictions

pub mod analytics;
pub mod intake;

pub use analytics::{CourseAnalytics, FactorSummary};
pub use intake::{validate_upload, IntakeError};
