//! Pattern-table parsing of OCR text into student fields and subject marks.
//!
//! Parsing is best effort: a rule that does not match yields `None` (or no
//! entry) rather than an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{StudentInfo, SubjectMark};

/// Separator between a label and its value: a run of `:`, `.` or `-` (with
/// optional surrounding blanks, so `No.:` works), or plain blanks. Never
/// crosses a line break.
const SEPARATOR: &str = r"(?:[ \t]*(?:[:.\-][ \t]*)+|[ \t]+)";

/// Words of the roll label that must never be read back as its value.
const ROLL_LABEL_WORDS: &[&str] = &["No", "Number"];

/// Student identity fields a rule can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentField {
    RollNumber,
    Name,
    Class,
    Term,
}

impl StudentField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RollNumber => "roll_number",
            Self::Name => "name",
            Self::Class => "class",
            Self::Term => "term",
        }
    }
}

/// Post-processing applied to a rule's capture group.
#[derive(Debug, Clone, Copy)]
enum Capture {
    /// A single word token, used verbatim.
    Token,
    /// A single word token that is not one of the given label words.
    TokenExcept(&'static [&'static str]),
    /// Free text, trimmed; blank captures count as no match.
    Trimmed,
}

struct FieldRule {
    field: StudentField,
    pattern: Regex,
    capture: Capture,
}

impl FieldRule {
    fn new(field: StudentField, label: &str, value: &str, capture: Capture) -> Self {
        let pattern = Regex::new(&format!(r"\b{}{}{}", label, SEPARATOR, value)).unwrap();
        Self {
            field,
            pattern,
            capture,
        }
    }

    /// First match in document order.
    fn apply(&self, text: &str) -> Option<String> {
        let raw = self.pattern.captures(text)?.get(1)?.as_str();
        match self.capture {
            Capture::Token => Some(raw.to_string()),
            Capture::TokenExcept(words) => (!words.contains(&raw)).then(|| raw.to_string()),
            Capture::Trimmed => {
                let trimmed = raw.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }
}

/// Independent, case-sensitive student-info rules.
static FIELD_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![
        // Roll, Roll No, Roll Number, Roll#
        FieldRule::new(
            StudentField::RollNumber,
            r"Roll(?:[ \t]*(?:Number|No|#))?",
            r"(\w+)",
            Capture::TokenExcept(ROLL_LABEL_WORDS),
        ),
        FieldRule::new(StudentField::Name, "Name", r"([A-Za-z \t]+)", Capture::Trimmed),
        FieldRule::new(StudentField::Class, "Class", r"(\w+)", Capture::Token),
        FieldRule::new(
            StudentField::Term,
            "(?:Term|Semester)",
            r"(\w+)",
            Capture::Token,
        ),
    ]
});

/// `Subject: obtained/max`, matched globally.
static MARK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\s*:\s*([0-9]+(?:\.[0-9]+)?)\s*/\s*([0-9]+(?:\.[0-9]+)?)").unwrap()
});

/// Apply every student-info rule to `text`.
pub fn parse_student_info(text: &str) -> StudentInfo {
    let mut info = StudentInfo::default();
    for rule in FIELD_RULES.iter() {
        let value = rule.apply(text);
        let slot = match rule.field {
            StudentField::RollNumber => &mut info.roll_number,
            StudentField::Name => &mut info.name,
            StudentField::Class => &mut info.class,
            StudentField::Term => &mut info.term,
        };
        *slot = value;
    }
    info
}

/// Extract every subject mark pair in document order.
///
/// Repeated subjects produce repeated entries.
pub fn parse_marks(text: &str) -> Vec<SubjectMark> {
    let marks: Vec<SubjectMark> = MARK_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let obtained = caps.get(2)?.as_str().parse::<f64>().ok()?;
            let max = caps.get(3)?.as_str().parse::<f64>().ok()?;
            Some(SubjectMark::new(caps.get(1)?.as_str(), obtained, max))
        })
        .collect();

    tracing::debug!("Parsed {} subject marks", marks.len());
    marks
}
