//! Error types for the medscan library.

use std::io;
use thiserror::Error;

/// Result type alias for medscan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting a document.
///
/// Field misses are never errors: a parser that finds nothing for a label
/// leaves the value empty.
#[derive(Error, Debug)]
pub enum Error {
    /// The declared document kind is not one of the supported kinds.
    #[error("Unsupported document kind: {0:?} (expected one of: prescription, patient_details)")]
    UnsupportedKind(String),

    /// The input could not be decoded as a PDF or could not be rendered.
    #[error("Render error: {0}")]
    Render(String),

    /// Preprocessing or text recognition failed on a page.
    #[error("Recognition failed on page {page}: {message}")]
    Recognition {
        /// 1-based page number
        page: u32,
        /// What went wrong
        message: String,
    },

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error writing the spreadsheet or JSON output.
    #[error("Export error: {0}")]
    Export(String),

    /// Invalid engine or extraction configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error loading a handwriting dataset.
    #[error("Dataset error: {0}")]
    Dataset(String),
}

impl Error {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnsupportedKind(_) => "unsupported_kind",
            Error::Render(_) => "render",
            Error::Recognition { .. } => "recognition",
            Error::Io(_) => "io",
            Error::Export(_) => "export",
            Error::Config(_) => "config",
            Error::Dataset(_) => "dataset",
        }
    }

    /// Build a recognition error for the given page.
    pub fn recognition(page: u32, message: impl Into<String>) -> Self {
        Error::Recognition {
            page,
            message: message.into(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Export(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Export(format!("JSON serialization error: {}", err))
    }
}
