//! Metrics derived from enrollment bookkeeping.
//!
//! The hosting service owns attendance and submission records; these helpers
//! turn raw counts into the percentages a [`MetricsRecord`] expects.
//!
//! [`MetricsRecord`]: crate::models::MetricsRecord

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One assignment submission and the deadline it was due by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub submitted_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

impl Submission {
    pub fn is_on_time(&self) -> bool {
        self.submitted_at <= self.due_at
    }
}

/// Share of attended sessions, as a percentage.
pub fn attendance_percentage(present: usize, total: usize) -> f64 {
    ratio_percentage(present, total)
}

/// Share of assignments with a submission, as a percentage.
pub fn assignment_completion_rate(completed: usize, total: usize) -> f64 {
    ratio_percentage(completed, total)
}

/// Share of submissions made on or before their deadline, as a percentage.
pub fn submission_timeliness(submissions: &[Submission]) -> f64 {
    let on_time = submissions.iter().filter(|s| s.is_on_time()).count();
    ratio_percentage(on_time, submissions.len())
}

fn ratio_percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
