//! Field parsers: recognized text → structured record.
//!
//! OCR output is noisy, so every pattern here is case-insensitive and
//! tolerant of whitespace and `:`/`-` variation around labels. A label that
//! cannot be found leaves its field empty; parsing never fails.

mod diagnosis;
mod patient;
mod prescription;

pub use diagnosis::{extract_provisional_diagnosis, DiagnosisExtractor};
pub use patient::PatientDetailsParser;
pub use prescription::PrescriptionParser;

use crate::model::{DocumentKind, StructuredRecord};
use regex::Regex;

/// Converts recognized text into a record for one document kind.
pub trait FieldParser: Send + Sync {
    /// The kind this parser produces records for.
    fn kind(&self) -> DocumentKind;

    /// Parse recognized text. Fields without a match are left empty.
    fn parse(&self, text: &str) -> StructuredRecord;
}

/// One compiled parser per document kind.
pub struct ParserSet {
    prescription: PrescriptionParser,
    patient_details: PatientDetailsParser,
}

impl ParserSet {
    /// Compile the parsers for every supported kind.
    pub fn new() -> Self {
        Self {
            prescription: PrescriptionParser::new(),
            patient_details: PatientDetailsParser::new(),
        }
    }

    /// Get the parser for a kind.
    pub fn get(&self, kind: DocumentKind) -> &dyn FieldParser {
        match kind {
            DocumentKind::Prescription => &self.prescription,
            DocumentKind::PatientDetails => &self.patient_details,
        }
    }
}

impl Default for ParserSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile one of the built-in patterns.
pub(crate) fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("built-in field pattern must compile")
}

/// First capture group of the first match, trimmed; empty if there is none.
pub(crate) fn capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Collapse runs of whitespace (including line breaks) into single spaces.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_set_dispatch() {
        let parsers = ParserSet::new();
        for kind in DocumentKind::ALL {
            assert_eq!(parsers.get(kind).kind(), kind);
        }
    }

    #[test]
    fn test_capture_missing_is_empty() {
        let re = pattern(r"(?i)refill:(.*)");
        assert_eq!(capture(&re, "nothing here"), "");
        assert_eq!(capture(&re, "REFILL:  2 "), "2");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Kathy \n\n Crawford\t"), "Kathy Crawford");
    }
}
