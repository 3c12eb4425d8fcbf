//! Totals and final packaging of a parsed marksheet.

use crate::models::{MarksheetResult, StudentInfo, SubjectMark, TotalMarks};
use crate::utils::round_to;

/// Sum obtained and maximum marks and derive the overall percentage.
///
/// The percentage is rounded to 2 places and is exactly 0 when the maximum is 0.
/// Individual entries are not validated, so a percentage above 100 is possible.
pub fn aggregate(marks: &[SubjectMark]) -> TotalMarks {
    let obtained: f64 = marks.iter().map(|m| m.marks_obtained).sum();
    let maximum: f64 = marks.iter().map(|m| m.max_marks).sum();
    let percentage = if maximum > 0.0 {
        round_to(obtained / maximum * 100.0, 2)
    } else {
        0.0
    };

    TotalMarks {
        obtained,
        maximum,
        percentage,
    }
}

/// Combine parsed fields and marks into the final result.
pub fn build_result(student_info: StudentInfo, marks_data: Vec<SubjectMark>) -> MarksheetResult {
    let total_marks = aggregate(&marks_data);
    MarksheetResult {
        student_info,
        marks_data,
        total_marks,
    }
}
