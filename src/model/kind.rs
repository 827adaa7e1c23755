//! Document kinds and their field sets.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fields extracted from a prescription, in output column order.
pub const PRESCRIPTION_FIELDS: &[&str] = &[
    "patient_name",
    "patient_address",
    "medicines",
    "directions",
    "refill",
    "provisional_diagnosis",
];

/// Fields extracted from a patient details form, in output column order.
pub const PATIENT_DETAILS_FIELDS: &[&str] = &[
    "patient_name",
    "patient_phone_number",
    "hepatitis_b_vaccination",
    "medical_problems",
];

/// The declared kind of a submitted document.
///
/// Selects the field parser and the field set of the resulting record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A doctor's prescription
    Prescription,
    /// A patient intake / details form
    PatientDetails,
}

impl DocumentKind {
    /// Every supported kind.
    pub const ALL: [DocumentKind; 2] = [DocumentKind::Prescription, DocumentKind::PatientDetails];

    /// The canonical name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Prescription => "prescription",
            DocumentKind::PatientDetails => "patient_details",
        }
    }

    /// The fixed field set for this kind.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            DocumentKind::Prescription => PRESCRIPTION_FIELDS,
            DocumentKind::PatientDetails => PATIENT_DETAILS_FIELDS,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = Error;

    /// Parse a kind name. Case and `-`/space in place of `_` are tolerated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "prescription" => Ok(DocumentKind::Prescription),
            "patient_details" => Ok(DocumentKind::PatientDetails),
            _ => Err(Error::UnsupportedKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds() {
        assert_eq!(
            "prescription".parse::<DocumentKind>().unwrap(),
            DocumentKind::Prescription
        );
        assert_eq!(
            " Patient-Details ".parse::<DocumentKind>().unwrap(),
            DocumentKind::PatientDetails
        );
    }

    #[test]
    fn test_parse_unsupported_kind() {
        let err = "invoice".parse::<DocumentKind>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedKind(ref k) if k == "invoice"));
        assert!("".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for kind in DocumentKind::ALL {
            assert_eq!(kind.to_string().parse::<DocumentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_prescription_fields_include_diagnosis() {
        assert!(DocumentKind::Prescription
            .fields()
            .contains(&"provisional_diagnosis"));
        assert!(!DocumentKind::PatientDetails
            .fields()
            .contains(&"provisional_diagnosis"));
    }
}
