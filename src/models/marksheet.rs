//! Marksheet extraction models.
//!
//! These are produced fresh per extraction and never mutated afterwards;
//! identity and storage belong to the caller.

use serde::{Deserialize, Serialize};

use crate::grading::Grade;

/// Student identity fields recovered from a marksheet.
///
/// Any field may be absent when its pattern did not match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInfo {
    pub roll_number: Option<String>,
    pub name: Option<String>,
    pub class: Option<String>,
    pub term: Option<String>,
}

/// One `Subject: obtained/max` line.
///
/// `marks_obtained` is not checked against `max_marks`; it may exceed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectMark {
    pub subject: String,
    pub marks_obtained: f64,
    pub max_marks: f64,
}

impl SubjectMark {
    pub fn new(subject: impl Into<String>, marks_obtained: f64, max_marks: f64) -> Self {
        Self {
            subject: subject.into(),
            marks_obtained,
            max_marks,
        }
    }

    /// Unrounded subject percentage, 0 when `max_marks` is 0.
    pub fn percentage(&self) -> f64 {
        if self.max_marks > 0.0 {
            self.marks_obtained / self.max_marks * 100.0
        } else {
            0.0
        }
    }
}

/// Summed marks across all subjects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalMarks {
    pub obtained: f64,
    pub maximum: f64,
    /// Rounded to 2 decimals; exactly 0 when `maximum` is 0.
    pub percentage: f64,
}

/// Structured result of processing one marksheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksheetResult {
    pub student_info: StudentInfo,
    pub marks_data: Vec<SubjectMark>,
    pub total_marks: TotalMarks,
}

impl MarksheetResult {
    /// Letter grade for the overall percentage.
    pub fn grade(&self) -> Grade {
        Grade::from_score(self.total_marks.percentage)
    }

    /// True when neither identity fields nor marks were recovered.
    pub fn is_empty(&self) -> bool {
        self.marks_data.is_empty() && self.student_info == StudentInfo::default()
    }
}
