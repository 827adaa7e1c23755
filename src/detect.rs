//! PDF header sniffing.
//!
//! The renderer would reject a non-PDF blob eventually, but checking the
//! header first gives a clear error without spawning an external process.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF header information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Read the PDF header from the start of a byte slice.
///
/// Returns `Error::Render` when the data does not start with a PDF header.
pub fn sniff_pdf(data: &[u8]) -> Result<PdfHeader> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::Render("input is not a PDF document".into()));
    }

    let version_bytes = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::Render(format!(
            "unsupported PDF version header: {}",
            version
        )));
    }

    Ok(PdfHeader { version })
}

/// Read the PDF header from a file.
pub fn sniff_pdf_file<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let mut header = Vec::with_capacity(16);
    File::open(path)?.take(16).read_to_end(&mut header)?;
    sniff_pdf(&header)
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    sniff_pdf(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_valid_pdf() {
        let header = sniff_pdf(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(header.version, "1.7");
        assert_eq!(header.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_sniff_rejects_png() {
        let result = sniff_pdf(b"\x89PNG\r\n\x1a\n0000");
        assert!(matches!(result, Err(Error::Render(_))));
    }

    #[test]
    fn test_sniff_too_short() {
        assert!(matches!(sniff_pdf(b"%PDF"), Err(Error::Render(_))));
        assert!(matches!(sniff_pdf(b""), Err(Error::Render(_))));
    }

    #[test]
    fn test_sniff_bad_version() {
        assert!(matches!(sniff_pdf(b"%PDF-abc\n"), Err(Error::Render(_))));
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
    }
}
