//! Provisional-diagnosis heuristic.
//!
//! Prescriptions rarely follow a fixed layout, so instead of expecting a
//! sentence this captures a liberal run of text after the label: word
//! characters, spaces, commas, periods and hyphens. The run may continue on
//! following lines as long as each whole line stays inside that class; blank
//! lines count as inside it and are kept.

use super::pattern;
use regex::Regex;

/// Label, separator, first line, then whole-line (possibly blank) continuations.
const DIAGNOSIS_PATTERN: &str =
    r"(?im)provisional\s*diagnosis\s*[:\-\s]*([\w \t,.\-]+(?:\n[\w \t,.\-]*$)*)";

/// Compiled provisional-diagnosis matcher.
#[derive(Debug, Clone)]
pub struct DiagnosisExtractor {
    regex: Regex,
}

impl DiagnosisExtractor {
    /// Compile the matcher.
    pub fn new() -> Self {
        Self {
            regex: pattern(DIAGNOSIS_PATTERN),
        }
    }

    /// Extract the provisional diagnosis, or an empty string if the label is
    /// absent.
    pub fn extract(&self, text: &str) -> String {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    }
}

impl Default for DiagnosisExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the provisional diagnosis from `text`.
///
/// Compiles the pattern on every call; hold a [`DiagnosisExtractor`] when
/// processing many documents.
pub fn extract_provisional_diagnosis(text: &str) -> String {
    DiagnosisExtractor::new().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_label() {
        assert_eq!(extract_provisional_diagnosis("PROVISIONAL DIAGNOSIS: Flu"), "Flu");
        assert_eq!(extract_provisional_diagnosis("provisional diagnosis - Flu"), "Flu");
        assert_eq!(extract_provisional_diagnosis("Provisional   Diagnosis:Flu"), "Flu");
    }

    #[test]
    fn test_missing_label() {
        assert_eq!(extract_provisional_diagnosis("Refill: 3 times"), "");
        assert_eq!(extract_provisional_diagnosis(""), "");
    }

    #[test]
    fn test_multi_line_capture() {
        assert_eq!(
            extract_provisional_diagnosis("Provisional Diagnosis: Acute\nbronchitis"),
            "Acute\nbronchitis"
        );
    }

    #[test]
    fn test_stops_at_non_matching_line() {
        let text = "Provisional Diagnosis: Acute\nbronchitis\nRefill: 3 times\nfollow up";
        assert_eq!(extract_provisional_diagnosis(text), "Acute\nbronchitis");
    }

    #[test]
    fn test_blank_line_inside_diagnosis_is_kept() {
        assert_eq!(
            extract_provisional_diagnosis("Provisional Diagnosis: Acute\n\nbronchitis"),
            "Acute\n\nbronchitis"
        );
        // Trailing blank lines before an unrelated line are trimmed away.
        let text = "Provisional Diagnosis: Acute\n\n\nRefill: 3 times";
        assert_eq!(extract_provisional_diagnosis(text), "Acute");
    }

    #[test]
    fn test_stops_at_punctuation_on_first_line() {
        let text = "Provisional diagnosis: Viral fever (suspected)\nmore";
        assert_eq!(extract_provisional_diagnosis(text), "Viral fever");
    }

    #[test]
    fn test_label_on_its_own_line() {
        let text = "Provisional Diagnosis:\n\nType 2 diabetes, mild.\n";
        assert_eq!(extract_provisional_diagnosis(text), "Type 2 diabetes, mild.");
    }

    #[test]
    fn test_idempotent() {
        let extractor = DiagnosisExtractor::new();
        let text = "Name: A\nProvisional Diagnosis - Migraine\nwith aura";
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }
}
