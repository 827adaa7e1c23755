//! Patient details form parser.

use super::{capture, collapse_whitespace, pattern, FieldParser};
use crate::model::{DocumentKind, StructuredRecord};
use regex::Regex;

/// Parses patient intake forms.
///
/// The name and phone number sit in the "Patient Information" block, the
/// vaccination answer follows its question, and the medical problems are
/// the paragraph that follows the prompt's colon.
#[derive(Debug, Clone)]
pub struct PatientDetailsParser {
    name_block: Regex,
    birth_date_label: Regex,
    month_date: Regex,
    phone: Regex,
    hepatitis_b: Regex,
    medical_problems: Regex,
}

impl PatientDetailsParser {
    /// Compile the patient details patterns.
    pub fn new() -> Self {
        Self {
            name_block: pattern(r"(?is)patient\s*information(.*?)\(\d{3}\)"),
            birth_date_label: pattern(r"(?i)birth\s*date"),
            month_date: pattern(
                r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2}(?:st|nd|rd|th)?,?(?:\s+\d{4})?",
            ),
            phone: pattern(r"(?is)patient\s*information.*?(\(\d{3}\)\s*\d{3}\s*-\s*\d{4})"),
            hepatitis_b: pattern(r"(?is)hepatitis\s*b\s*vaccination\s*\??.*?\b(yes|no)\b"),
            // The answer runs to the next blank line or the end of the text.
            medical_problems: pattern(
                r"(?is)list\s*any\s*medical\s*problems[^:]*:\s*(.*?)(?:\n[^\S\n]*\n|\z)",
            ),
        }
    }

    /// The name block also carries the birth date; strip it.
    fn patient_name(&self, text: &str) -> String {
        let block = capture(&self.name_block, text);
        let without_label = self.birth_date_label.replace_all(&block, " ");
        let without_date = self.month_date.replace_all(&without_label, " ");
        collapse_whitespace(&without_date)
    }

    fn hepatitis_b_vaccination(&self, text: &str) -> String {
        match capture(&self.hepatitis_b, text).to_lowercase().as_str() {
            "yes" => "Yes".to_string(),
            "no" => "No".to_string(),
            _ => String::new(),
        }
    }
}

impl Default for PatientDetailsParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldParser for PatientDetailsParser {
    fn kind(&self) -> DocumentKind {
        DocumentKind::PatientDetails
    }

    fn parse(&self, text: &str) -> StructuredRecord {
        let mut record = StructuredRecord::new(DocumentKind::PatientDetails);
        record.set("patient_name", self.patient_name(text));
        record.set(
            "patient_phone_number",
            collapse_whitespace(&capture(&self.phone, text)),
        );
        record.set("hepatitis_b_vaccination", self.hepatitis_b_vaccination(text));
        record.set("medical_problems", capture(&self.medical_problems, text));
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "17/12/2020

Patient Medical Record

Patient Information

Birth Date

Kathy Crawford May 6 1972

(737) 988-0851 Weight:

9264 Ash Dr 95

New York City, 10005 '

United States Height:
190

In Case of Emergency

Simeone Crawford

Have you had the Hepatitis B vaccination?

No

List any Medical Problems (asthma, seizures, headaches):

Migraine
";

    #[test]
    fn test_parse_sample_form() {
        let record = PatientDetailsParser::new().parse(SAMPLE);

        assert_eq!(record.get("patient_name"), Some("Kathy Crawford"));
        assert_eq!(record.get("patient_phone_number"), Some("(737) 988-0851"));
        assert_eq!(record.get("hepatitis_b_vaccination"), Some("No"));
        assert_eq!(record.get("medical_problems"), Some("Migraine"));
    }

    #[test]
    fn test_medical_problems_end_at_blank_line() {
        let text = "List any Medical Problems (asthma):\nMigraine\nAsthma\n\nPage 2\nSignature: ______\n";
        let record = PatientDetailsParser::new().parse(text);
        assert_eq!(record.get("medical_problems"), Some("Migraine\nAsthma"));
    }

    #[test]
    fn test_medical_problems_on_prompt_line() {
        let record = PatientDetailsParser::new().parse("List any medical problems: none");
        assert_eq!(record.get("medical_problems"), Some("none"));
    }

    #[test]
    fn test_vaccination_answer_is_normalized() {
        let text = "have you had the hepatitis b vaccination ?\nYES\n";
        let record = PatientDetailsParser::new().parse(text);
        assert_eq!(record.get("hepatitis_b_vaccination"), Some("Yes"));
    }

    #[test]
    fn test_name_keeps_names_that_start_like_months() {
        let text = "Patient Information\nMayer Junewood Jan 12, 1990\n(111) 222-3333";
        let record = PatientDetailsParser::new().parse(text);
        assert_eq!(record.get("patient_name"), Some("Mayer Junewood"));
    }

    #[test]
    fn test_missing_block_yields_empty_fields() {
        let record = PatientDetailsParser::new().parse("completely unrelated text");
        assert_eq!(record.len(), DocumentKind::PatientDetails.fields().len());
        assert_eq!(record.filled_count(), 0);
    }
}
