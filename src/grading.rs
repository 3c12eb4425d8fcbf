//! Letter-grade banding shared by marksheet totals and predictions.

use serde::{Deserialize, Serialize};

/// Letter grade, ordered best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

/// Inclusive lower bounds, checked highest first. Anything below the last band is F.
const GRADE_BANDS: [(f64, Grade); 5] = [
    (90.0, Grade::APlus),
    (80.0, Grade::A),
    (70.0, Grade::B),
    (60.0, Grade::C),
    (50.0, Grade::D),
];

impl Grade {
    /// All grades, best first.
    pub const ALL: [Grade; 6] = [
        Grade::APlus,
        Grade::A,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::F,
    ];

    /// Band a percentage or score. NaN falls through to F.
    pub fn from_score(score: f64) -> Self {
        GRADE_BANDS
            .iter()
            .find(|(floor, _)| score >= *floor)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::F)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl std::str::FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("Invalid grade '{}'. Valid options: A+, A, B, C, D, F", s))
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries_are_inclusive() {
        assert_eq!(Grade::from_score(90.0), Grade::APlus);
        assert_eq!(Grade::from_score(89.999), Grade::A);
        assert_eq!(Grade::from_score(80.0), Grade::A);
        assert_eq!(Grade::from_score(70.0), Grade::B);
        assert_eq!(Grade::from_score(60.0), Grade::C);
        assert_eq!(Grade::from_score(50.0), Grade::D);
        assert_eq!(Grade::from_score(49.999), Grade::F);
    }

    #[test]
    fn test_out_of_range_scores() {
        assert_eq!(Grade::from_score(1000.0), Grade::APlus);
        assert_eq!(Grade::from_score(-5.0), Grade::F);
        assert_eq!(Grade::from_score(f64::NAN), Grade::F);
    }

    #[test]
    fn test_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Grade::APlus).unwrap(), "\"A+\"");
        assert_eq!(serde_json::from_str::<Grade>("\"C\"").unwrap(), Grade::C);
    }

    #[test]
    fn test_parses_from_letter() {
        assert_eq!("A+".parse::<Grade>(), Ok(Grade::APlus));
        assert_eq!("F".parse::<Grade>(), Ok(Grade::F));
        for grade in Grade::ALL {
            assert_eq!(grade.to_string().parse::<Grade>(), Ok(grade));
        }
        assert!("E".parse::<Grade>().is_err());
        assert!("a".parse::<Grade>().is_err());
    }
}
