//! Data model for document extraction.
//!
//! A [`Document`] is a PDF blob tagged with a [`DocumentKind`]. Rendering
//! turns it into [`PageImage`]s, and parsing the recognized text produces a
//! [`StructuredRecord`] whose key set is fixed by the kind.

mod document;
mod kind;
mod page;
mod record;

pub use document::Document;
pub use kind::{DocumentKind, PATIENT_DETAILS_FIELDS, PRESCRIPTION_FIELDS};
pub use page::PageImage;
pub use record::StructuredRecord;
