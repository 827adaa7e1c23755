//! Prescription field parser.

use super::{capture, pattern, FieldParser};
use crate::model::{DocumentKind, StructuredRecord};
use regex::Regex;

/// Parses prescriptions laid out as
///
/// ```text
/// Name: <patient> Date: <date>
/// Address: <address>
/// <medicines, one per line>
/// Directions: <directions>
/// Refill: <n> times
/// ```
#[derive(Debug, Clone)]
pub struct PrescriptionParser {
    name: Regex,
    address: Regex,
    medicines: Regex,
    directions: Regex,
    refill: Regex,
    diagnosis: Regex,
}

impl PrescriptionParser {
    /// Compile the prescription patterns.
    pub fn new() -> Self {
        Self {
            // Name runs until the date label or the end of its line.
            name: pattern(r"(?im)\bname[^\S\n]*[:\-]?[^\S\n]*(.*?)[^\S\n]*(?:\bdate\b|$)"),
            address: pattern(r"(?im)\baddress[^\S\n]*[:\-]?[^\S\n]*(.*?)[^\S\n]*$"),
            // Everything between the address line and the directions label.
            medicines: pattern(r"(?is)\baddress[^\n]*\n(.*?)\bdirections\b"),
            directions: pattern(r"(?is)\bdirections[^\S\n]*[:\-]?(.*?)\brefill\b"),
            refill: pattern(r"(?i)\brefill[^\S\n]*[:\-]?[^\S\n]*(.*?)[^\S\n]*\btimes\b"),
            diagnosis: pattern(
                r"(?im)\bprovisional\s*diagnosis[^\S\n]*[:\-]?[^\S\n]*(.*?)[^\S\n]*$",
            ),
        }
    }
}

impl Default for PrescriptionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldParser for PrescriptionParser {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Prescription
    }

    fn parse(&self, text: &str) -> StructuredRecord {
        let mut record = StructuredRecord::new(DocumentKind::Prescription);
        record.set("patient_name", capture(&self.name, text));
        record.set("patient_address", capture(&self.address, text));
        record.set("medicines", capture(&self.medicines, text));
        record.set("directions", capture(&self.directions, text));
        record.set("refill", capture(&self.refill, text));
        record.set("provisional_diagnosis", capture(&self.diagnosis, text));
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Dr John Smith, M.D
2 Non-Important Street,
New York, Phone (000)-111-2222

Name: Marta Sharapova Date: 5/11/2022

Address: 9 tennis court, new Russia, DC

Prednisone 20 mg
Lialda 2.4 gram

Directions:

Prednisone, Taper 5 mig every 3 days,
Finish in 2.5 weeks -
Lialda - take 2 pill everyday for 1 month

Refill: 3 times
";

    #[test]
    fn test_parse_sample_prescription() {
        let record = PrescriptionParser::new().parse(SAMPLE);

        assert_eq!(record.get("patient_name"), Some("Marta Sharapova"));
        assert_eq!(record.get("patient_address"), Some("9 tennis court, new Russia, DC"));
        assert_eq!(record.get("medicines"), Some("Prednisone 20 mg\nLialda 2.4 gram"));
        assert_eq!(
            record.get("directions"),
            Some(
                "Prednisone, Taper 5 mig every 3 days,\nFinish in 2.5 weeks -\nLialda - take 2 pill everyday for 1 month"
            )
        );
        assert_eq!(record.get("refill"), Some("3"));
        assert_eq!(record.get("provisional_diagnosis"), Some(""));
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let text = "NAME - Virat Kohli DATE: 2/05/2022\nADDRESS: 2 cricket blvd, New Delhi\n";
        let record = PrescriptionParser::new().parse(text);
        assert_eq!(record.get("patient_name"), Some("Virat Kohli"));
        assert_eq!(record.get("patient_address"), Some("2 cricket blvd, New Delhi"));
    }

    #[test]
    fn test_name_without_date() {
        let record = PrescriptionParser::new().parse("Name: Jerry Lucas\nAddress: 1 Main St");
        assert_eq!(record.get("patient_name"), Some("Jerry Lucas"));
    }

    #[test]
    fn test_unrecognized_text_yields_empty_fields() {
        let record = PrescriptionParser::new().parse("@@@ noise ###");
        assert_eq!(record.len(), DocumentKind::Prescription.fields().len());
        assert_eq!(record.filled_count(), 0);
    }
}
