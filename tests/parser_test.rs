//! Integration tests for field parsing on recognized text.

use medscan::{extract_provisional_diagnosis, parse_text, DocumentKind};

const PATIENT_FORM: &str = "
17/12/2020
Patient Medical Record
Patient Information
Birth Date
Jerry Lucas May 2 1998
(279) 920-8204 Weight:
4218 Wheeler Ridge Dr 57
Buffalo, New York, 14201 Height:
United States 170
In Case of Emergency
Joe Lucas 4218 Wheeler Ridge Dr
Buffalo, New York, 14201
Home phone United States
General Medical History
Chicken Pox (Varicella): Measels:
IMMUNE NOT IMMUNE
Have you had the Hepatitis B vaccination?
Yes
List any Medical Problems (asthma, seizures, headaches):
N/A
";

#[test]
fn test_every_kind_yields_full_key_set() {
    for kind in DocumentKind::ALL {
        for text in ["", "noise", PATIENT_FORM] {
            let record = parse_text(kind, text);
            let keys: Vec<_> = record.iter().map(|(k, _)| k).collect();
            assert_eq!(keys, kind.fields());
        }
    }
}

#[test]
fn test_patient_form() {
    let record = parse_text(DocumentKind::PatientDetails, PATIENT_FORM);
    assert_eq!(record.get("patient_name"), Some("Jerry Lucas"));
    assert_eq!(record.get("patient_phone_number"), Some("(279) 920-8204"));
    assert_eq!(record.get("hepatitis_b_vaccination"), Some("Yes"));
    assert_eq!(record.get("medical_problems"), Some("N/A"));
}

#[test]
fn test_unknown_kind_names() {
    for name in ["invoice", "", "prescriptions", "patient"] {
        assert!(name.parse::<DocumentKind>().is_err(), "{:?} parsed", name);
    }
    assert_eq!(
        " PRESCRIPTION ".parse::<DocumentKind>().unwrap(),
        DocumentKind::Prescription
    );
}

#[test]
fn test_diagnosis_is_pure() {
    let text = "Provisional Diagnosis: Chronic sinusitis\nRefill: 2 times";
    let first = extract_provisional_diagnosis(text);
    assert_eq!(first, extract_provisional_diagnosis(text));
    // The next line carries a colon, so it is not a continuation.
    assert_eq!(first, "Chronic sinusitis");
}

#[test]
fn test_prescription_diagnosis_comes_from_heuristic() {
    let text = "Name: Jerry Lucas\nProvisional diagnosis - Acute\nbronchitis\n";
    let record = parse_text(DocumentKind::Prescription, text);
    assert_eq!(record.get("provisional_diagnosis"), Some("Acute\nbronchitis"));
}
