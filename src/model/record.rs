//! Structured records.

use super::DocumentKind;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Field name → extracted value mapping for one document.
///
/// The key set is fixed by the record's kind: every field is present from
/// construction (empty until set) and unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredRecord {
    kind: DocumentKind,
    values: Vec<String>,
}

impl StructuredRecord {
    /// Create a record with every field of `kind` set to the empty string.
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            values: vec![String::new(); kind.fields().len()],
        }
    }

    /// The kind this record was extracted as.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Field names in column order.
    pub fn fields(&self) -> &'static [&'static str] {
        self.kind.fields()
    }

    fn index_of(&self, field: &str) -> Option<usize> {
        self.fields().iter().position(|f| *f == field)
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.index_of(field).map(|i| self.values[i].as_str())
    }

    /// Set a field value. Returns `false` if the field is not part of this
    /// record's kind, in which case the record is left unchanged.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self.index_of(field) {
            Some(i) => {
                self.values[i] = value.into();
                true
            }
            None => false,
        }
    }

    /// Iterate over `(field, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.fields()
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }

    /// Values in column order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of fields that have a non-empty value.
    pub fn filled_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_empty()).count()
    }
}

impl Serialize for StructuredRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_has_all_keys() {
        let record = StructuredRecord::new(DocumentKind::PatientDetails);
        assert_eq!(record.len(), 4);
        for field in DocumentKind::PatientDetails.fields() {
            assert_eq!(record.get(field), Some(""));
        }
        assert_eq!(record.filled_count(), 0);
    }

    #[test]
    fn test_set_rejects_unknown_field() {
        let mut record = StructuredRecord::new(DocumentKind::PatientDetails);
        assert!(!record.set("refill", "3"));
        assert_eq!(record.get("refill"), None);
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_iter_preserves_column_order() {
        let mut record = StructuredRecord::new(DocumentKind::Prescription);
        record.set("refill", "3");
        let keys: Vec<_> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, DocumentKind::Prescription.fields());
        assert_eq!(record.get("refill"), Some("3"));
    }

    #[test]
    fn test_serialize_as_map() {
        let mut record = StructuredRecord::new(DocumentKind::PatientDetails);
        record.set("patient_name", "Kathy Crawford");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.starts_with("{\"patient_name\":\"Kathy Crawford\""));
        assert!(json.contains("\"medical_problems\":\"\""));
    }
}
