//! Submitted documents.

use super::DocumentKind;
use crate::error::Result;
use std::path::Path;

/// A PDF submitted for extraction together with its declared kind.
#[derive(Debug, Clone)]
pub struct Document {
    /// Raw PDF bytes
    pub bytes: Vec<u8>,

    /// Declared document kind
    pub kind: DocumentKind,

    /// Display name (usually the source file name)
    pub name: Option<String>,
}

impl Document {
    /// Create a document from bytes.
    pub fn new(bytes: impl Into<Vec<u8>>, kind: DocumentKind) -> Self {
        Self {
            bytes: bytes.into(),
            kind,
            name: None,
        }
    }

    /// Read a document from a file; the file name becomes the display name.
    pub fn from_file<P: AsRef<Path>>(path: P, kind: DocumentKind) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        Ok(Self { bytes, kind, name })
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Size of the payload in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file_sets_name() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4\n").unwrap();

        let doc = Document::from_file(file.path(), DocumentKind::Prescription).unwrap();
        assert_eq!(doc.len(), 9);
        assert!(doc.name.unwrap().ends_with(".pdf"));
    }

    #[test]
    fn test_from_missing_file() {
        let result = Document::from_file("/nonexistent/scan.pdf", DocumentKind::Prescription);
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
