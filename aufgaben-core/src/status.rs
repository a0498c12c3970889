//! Processing and correctness status of a task
//!
//! Both scales are closed enumerations whose position doubles as a rank, so
//! "at least this far along" is a plain integer comparison. Values outside
//! the scale are kept verbatim in an `Invalid` variant: the task is still
//! usable and the problem is reported as a [`StatusIssue`].

use std::fmt;

/// Processing stages in ascending order
pub const PROCESSING_STATES: [&str; 5] = ["unbekannt", "OCR", "TeX-Fehler", "nur Angabe", "mit Lösung"];

/// Correctness levels in ascending order
pub const CORRECTNESS_STATES: [&str; 4] =
    ["wahrscheinlich falsch", "unbekannt", "korrekt", "korrekt und überprüft"];

/// How far the task has been typeset.
///
/// - `unbekannt`: freshly generated metadata
/// - `OCR`: the text recognition output was pasted in, nothing is typeset yet
/// - `TeX-Fehler`: the file does not compile
/// - `nur Angabe`: the task statement is typeset
/// - `mit Lösung`: the solution is typeset as well
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ProcessingStatus {
    #[default]
    Unknown,
    Ocr,
    TexError,
    StatementOnly,
    WithSolution,
    Invalid(String),
}

impl ProcessingStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "unbekannt" => Self::Unknown,
            "OCR" => Self::Ocr,
            "TeX-Fehler" => Self::TexError,
            "nur Angabe" => Self::StatementOnly,
            "mit Lösung" => Self::WithSolution,
            other => Self::Invalid(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown => PROCESSING_STATES[0],
            Self::Ocr => PROCESSING_STATES[1],
            Self::TexError => PROCESSING_STATES[2],
            Self::StatementOnly => PROCESSING_STATES[3],
            Self::WithSolution => PROCESSING_STATES[4],
            Self::Invalid(value) => value,
        }
    }

    /// Position in [`PROCESSING_STATES`], `None` for invalid values
    pub fn rank(&self) -> Option<usize> {
        PROCESSING_STATES.iter().position(|state| *state == self.as_str())
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correctness of the solution.
///
/// - `wahrscheinlich falsch`: probably wrong
/// - `unbekannt`: nobody checked
/// - `korrekt`: correct
/// - `korrekt und überprüft`: correct and verified, e.g. with an online tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Correctness {
    ProbablyWrong,
    #[default]
    Unknown,
    Correct,
    Verified,
    Invalid(String),
}

impl Correctness {
    pub fn parse(value: &str) -> Self {
        match value {
            "wahrscheinlich falsch" => Self::ProbablyWrong,
            "unbekannt" => Self::Unknown,
            "korrekt" => Self::Correct,
            "korrekt und überprüft" => Self::Verified,
            other => Self::Invalid(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ProbablyWrong => CORRECTNESS_STATES[0],
            Self::Unknown => CORRECTNESS_STATES[1],
            Self::Correct => CORRECTNESS_STATES[2],
            Self::Verified => CORRECTNESS_STATES[3],
            Self::Invalid(value) => value,
        }
    }

    /// Position in [`CORRECTNESS_STATES`], `None` for invalid values
    pub fn rank(&self) -> Option<usize> {
        CORRECTNESS_STATES.iter().position(|state| *state == self.as_str())
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct | Self::Verified)
    }
}

impl fmt::Display for Correctness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `0: unbekannt, 1: OCR, ...` for command line help texts
pub fn describe_scale(states: &[&str]) -> String {
    states
        .iter()
        .enumerate()
        .map(|(index, state)| format!("{index}: {state}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusField {
    Processing,
    Correctness,
    /// An `\index{...}` keyword, checked against the keyword vocabulary
    Keyword,
}

impl StatusField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Processing => "BearbeitungsStand",
            Self::Correctness => "Korrektheit",
            Self::Keyword => "Stichwort",
        }
    }

    /// Empty for keywords, whose vocabulary is read at runtime
    pub fn valid_values(self) -> &'static [&'static str] {
        match self {
            Self::Processing => &PROCESSING_STATES,
            Self::Correctness => &CORRECTNESS_STATES,
            Self::Keyword => &[],
        }
    }
}

/// A status value outside its scale, or a keyword missing from the vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIssue {
    pub field: StatusField,
    pub value: String,
    /// Closest valid value, if one is known
    pub suggestion: Option<String>,
}

impl StatusIssue {
    pub fn invalid(field: StatusField, value: impl Into<String>) -> Self {
        Self { field, value: value.into(), suggestion: None }
    }

    pub fn unknown_keyword(keyword: impl Into<String>, suggestion: Option<String>) -> Self {
        Self { field: StatusField::Keyword, value: keyword.into(), suggestion }
    }
}

impl fmt::Display for StatusIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            StatusField::Keyword => {
                write!(f, "Das Stichwort „{}“ gibt es nicht.", self.value)?;
                if let Some(suggestion) = &self.suggestion {
                    write!(f, " Möglicherweise war dieses Stichwort gemeint: {suggestion}")?;
                }
                Ok(())
            }
            field => write!(
                f,
                "Der Wert ist nicht gültig: {} = {} (gültige Werte: {})",
                field.key(),
                self.value,
                field.valid_values().join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_rank_is_monotonic() {
        let unknown = ProcessingStatus::parse("unbekannt").rank().unwrap();
        let statement = ProcessingStatus::parse("nur Angabe").rank().unwrap();
        let solution = ProcessingStatus::parse("mit Lösung").rank().unwrap();
        assert!(unknown < statement);
        assert!(statement < solution);
        assert_eq!(solution, 4);
    }

    #[test]
    fn test_invalid_values_are_kept() {
        let status = ProcessingStatus::parse("fertig");
        assert_eq!(status, ProcessingStatus::Invalid("fertig".to_string()));
        assert_eq!(status.as_str(), "fertig");
        assert_eq!(status.rank(), None);
        assert!(!status.is_valid());

        let correctness = Correctness::parse("vielleicht");
        assert!(!correctness.is_valid());
        assert!(!correctness.is_correct());
    }

    #[test]
    fn test_correctness() {
        assert_eq!(Correctness::parse("wahrscheinlich falsch").rank(), Some(0));
        assert!(Correctness::parse("korrekt und überprüft").is_correct());
        assert!(!Correctness::default().is_correct());
        assert_eq!(Correctness::default().as_str(), "unbekannt");
    }

    #[test]
    fn test_describe_scale() {
        assert_eq!(
            describe_scale(&CORRECTNESS_STATES),
            "0: wahrscheinlich falsch, 1: unbekannt, 2: korrekt, 3: korrekt und überprüft"
        );
    }

    #[test]
    fn test_issue_message() {
        let issue = StatusIssue::invalid(StatusField::Correctness, "jein");
        assert!(issue.to_string().starts_with("Der Wert ist nicht gültig: Korrektheit = jein"));
    }

    #[test]
    fn test_unknown_keyword_message() {
        let issue = StatusIssue::unknown_keyword("Mastertheorem", Some("Master-Theorem".to_string()));
        assert_eq!(
            issue.to_string(),
            "Das Stichwort „Mastertheorem“ gibt es nicht. Möglicherweise war dieses Stichwort gemeint: Master-Theorem"
        );
        assert_eq!(StatusIssue::unknown_keyword("X", None).to_string(), "Das Stichwort „X“ gibt es nicht.");
    }
}
