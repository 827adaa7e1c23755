//! # medscan
//!
//! Structured data extraction from scanned medical documents.
//!
//! A scanned PDF is rendered to page images, each page is binarized and run
//! through OCR, and the recognized text is parsed into a fixed set of named
//! fields according to the document's declared kind (a prescription or a
//! patient details form).
//!
//! ## Quick Start
//!
//! ```no_run
//! use medscan::{export, Extractor, ExtractOptions};
//!
//! fn main() -> medscan::Result<()> {
//!     let extractor = Extractor::new(ExtractOptions::from_env()?)?;
//!     let extraction = extractor.extract_file("prescription.pdf", "prescription")?;
//!
//!     println!("{}", extraction.record.get("patient_name").unwrap_or(""));
//!     export::write_xlsx(&extraction.record, "prescription.xlsx")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Render**: `pdftoppm` turns each page into an image
//! - **Preprocess**: grayscale, upscale, adaptive threshold
//! - **Recognize**: `tesseract` reads each page image
//! - **Parse**: per-kind regular expressions fill the record
//!
//! Every stage sits behind a trait in [`engine`], so the external programs
//! can be swapped out (tests use in-memory fakes).
//!
//! ## Parsing only
//!
//! Text that was recognized elsewhere can be parsed directly:
//!
//! ```
//! use medscan::{parse_text, DocumentKind};
//!
//! let record = parse_text(DocumentKind::Prescription, "Refill: 3 times");
//! assert_eq!(record.get("refill"), Some("3"));
//! ```

pub mod cleanup;
pub mod dataset;
pub mod detect;
pub mod engine;
pub mod error;
pub mod export;
pub mod extract;
pub mod model;
pub mod parser;
pub mod workspace;

#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "async")]
pub mod nonblocking;

// Re-export commonly used types
pub use cleanup::{CleanupOptions, CleanupPipeline, CleanupPreset};
pub use dataset::{DatasetOptions, LabelStrategy};
pub use detect::{is_pdf_bytes, sniff_pdf, PdfHeader};
pub use engine::{EngineConfig, ImagePreprocessor, PageRenderer, TextRecognizer};
pub use error::{Error, Result};
pub use export::JsonFormat;
pub use extract::{parse_text, ExtractOptions, Extraction, Extractor, RecognizedText};
pub use model::{Document, DocumentKind, PageImage, StructuredRecord};
pub use parser::{extract_provisional_diagnosis, FieldParser};

use std::path::Path;

/// Extract a record from a PDF file with engines configured from the
/// environment.
///
/// # Arguments
///
/// * `path` - Path to the PDF file
/// * `kind` - `"prescription"` or `"patient_details"`
///
/// # Example
///
/// ```no_run
/// use medscan::extract_file;
///
/// let extraction = extract_file("patient.pdf", "patient_details").unwrap();
/// println!("{:?}", extraction.record.get("patient_phone_number"));
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P, kind: &str) -> Result<Extraction> {
    Extractor::from_env()?.extract_file(path, kind)
}

/// Extract a record from PDF bytes with engines configured from the
/// environment.
///
/// An unsupported `kind` fails before any external program is started.
pub fn extract_bytes(data: &[u8], kind: &str) -> Result<Extraction> {
    Extractor::from_env()?.extract_bytes(data, kind)
}

/// Extract a record and render it as an xlsx workbook.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("prescription.pdf").unwrap();
/// let xlsx = medscan::extract_to_xlsx(&data, "prescription").unwrap();
/// std::fs::write("prescription.xlsx", xlsx).unwrap();
/// ```
pub fn extract_to_xlsx(data: &[u8], kind: &str) -> Result<Vec<u8>> {
    let extraction = extract_bytes(data, kind)?;
    export::to_xlsx(&extraction.record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bytes_unsupported_kind() {
        let result = extract_bytes(b"%PDF-1.4\n", "invoice");
        assert!(matches!(result, Err(Error::UnsupportedKind(ref k)) if k == "invoice"));
    }

    #[test]
    fn test_extract_file_unsupported_kind_before_io() {
        // The kind is checked before the file is read.
        let result = extract_file("/nonexistent/file.pdf", "lab_report");
        assert!(matches!(result, Err(Error::UnsupportedKind(_))));
    }

    #[test]
    fn test_extract_file_missing() {
        let result = extract_file("/nonexistent/file.pdf", "prescription");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_parse_text_reexport() {
        let record = parse_text(DocumentKind::PatientDetails, "");
        assert_eq!(record.kind(), DocumentKind::PatientDetails);
        assert_eq!(record.filled_count(), 0);
    }
}
