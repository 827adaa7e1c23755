//! Extraction orchestrator.
//!
//! Sequences renderer → preprocessor → recognizer → field parser for one
//! document at a time:
//!
//! 1. render the PDF into ordered page images;
//! 2. preprocess and recognize each page in order, appending a line break
//!    and the page text to the accumulated text;
//! 3. parse the accumulated text with the parser for the declared kind;
//! 4. for prescriptions, overwrite `provisional_diagnosis` with the result
//!    of the diagnosis heuristic run over the full text.
//!
//! Any failure aborts the call; no partial record is returned. The
//! extractor itself holds no per-call state and can be shared across
//! threads.

mod options;

pub use options::{ExtractOptions, ENV_SCRATCH_DIR};

use crate::cleanup::CleanupPipeline;
use crate::engine::{
    AdaptiveThreshold, ImagePreprocessor, PageRenderer, Passthrough, PopplerRenderer,
    TesseractRecognizer, TextRecognizer,
};
use crate::error::{Error, Result};
use crate::model::{Document, DocumentKind, StructuredRecord};
use crate::parser::{DiagnosisExtractor, ParserSet};
use crate::workspace::Scratch;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of extracting one document.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// Display name of the source document, if known
    pub source: Option<String>,

    /// Kind the document was parsed as
    pub kind: DocumentKind,

    /// Extracted fields
    pub record: StructuredRecord,

    /// Recognized text the record was parsed from
    pub text: String,

    /// Number of pages processed
    pub page_count: u32,

    /// When the extraction finished
    pub extracted_at: DateTime<Utc>,
}

/// Recognized text of a whole document.
///
/// Each page's recognizer output goes through the extractor's cleanup
/// pipeline before it is appended, so with the default `Minimal` preset this
/// is not byte-identical to the raw engine output (line endings, Unicode
/// form, ligatures, form feeds and trailing spaces are normalized). Use
/// `CleanupPreset::None` to keep the raw per-page strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedText {
    /// Page texts joined in page order, each preceded by a line break
    pub text: String,

    /// Number of pages recognized
    pub page_count: u32,
}

/// Document extraction pipeline.
pub struct Extractor {
    renderer: Arc<dyn PageRenderer>,
    preprocessor: Arc<dyn ImagePreprocessor>,
    recognizer: Arc<dyn TextRecognizer>,
    parsers: ParserSet,
    diagnosis: DiagnosisExtractor,
    cleanup: CleanupPipeline,
    scratch_root: Option<PathBuf>,
}

impl Extractor {
    /// Build an extractor backed by `pdftoppm` and `tesseract`.
    pub fn new(options: ExtractOptions) -> Result<Self> {
        options.engine.validate()?;

        let preprocessor: Arc<dyn ImagePreprocessor> = if options.skip_preprocessing {
            Arc::new(Passthrough)
        } else {
            Arc::new(AdaptiveThreshold::default())
        };

        Ok(Self {
            renderer: Arc::new(PopplerRenderer::new(&options.engine)),
            preprocessor,
            recognizer: Arc::new(TesseractRecognizer::new(&options.engine)),
            parsers: ParserSet::new(),
            diagnosis: DiagnosisExtractor::new(),
            cleanup: CleanupPipeline::new(options.cleanup),
            scratch_root: options.scratch_root,
        })
    }

    /// Build an extractor configured from `MEDSCAN_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ExtractOptions::from_env()?)
    }

    /// Replace the page renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn PageRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Replace the image preprocessor.
    pub fn with_preprocessor(mut self, preprocessor: Arc<dyn ImagePreprocessor>) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Replace the text recognizer.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    /// Extract a structured record from a document.
    pub fn extract(&self, doc: &Document) -> Result<Extraction> {
        let label = doc.name.as_deref().unwrap_or("<bytes>");
        log::debug!("extracting {} as {}", label, doc.kind);

        let recognized = self.recognize(&doc.bytes).map_err(|e| {
            log::warn!("extraction of {} failed: {}", label, e);
            e
        })?;
        let record = self.parse_text(doc.kind, &recognized.text);

        log::debug!(
            "{}: {} of {} fields filled from {} page(s)",
            label,
            record.filled_count(),
            record.len(),
            recognized.page_count
        );

        Ok(Extraction {
            source: doc.name.clone(),
            kind: doc.kind,
            record,
            text: recognized.text,
            page_count: recognized.page_count,
            extracted_at: Utc::now(),
        })
    }

    /// Extract from raw bytes with a declared kind name.
    ///
    /// An unknown kind fails with `Error::UnsupportedKind` before any
    /// rendering work is done.
    pub fn extract_bytes(&self, bytes: &[u8], kind: &str) -> Result<Extraction> {
        let kind: DocumentKind = kind.parse()?;
        self.extract(&Document::new(bytes, kind))
    }

    /// Extract from a PDF file with a declared kind name.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P, kind: &str) -> Result<Extraction> {
        let kind: DocumentKind = kind.parse()?;
        self.extract(&Document::from_file(path, kind)?)
    }

    /// Extract several documents in parallel.
    ///
    /// Documents are independent: each gets its own scratch directory and
    /// its own result, in input order. Pages within a document are still
    /// processed sequentially.
    pub fn extract_batch(&self, docs: &[Document]) -> Vec<Result<Extraction>> {
        let results: Vec<Result<Extraction>> = docs.par_iter().map(|doc| self.extract(doc)).collect();
        let failed = results.iter().filter(|r| r.is_err()).count();
        log::info!(
            "batch finished: {} succeeded, {} failed",
            results.len() - failed,
            failed
        );
        results
    }

    /// Render and recognize a PDF without parsing fields.
    pub fn recognize(&self, pdf: &[u8]) -> Result<RecognizedText> {
        let scratch = Scratch::create(self.scratch_root.as_deref())?;
        log::debug!("request {}: rendering with {}", scratch.id(), self.renderer.name());

        let pages = self.renderer.render(pdf, &scratch)?;
        let mut text = String::new();

        for page in &pages {
            log::debug!("page {}: {}x{} px", page.number, page.width(), page.height());
            let image = self
                .preprocessor
                .preprocess(page)
                .map_err(|e| into_recognition(page.number, e))?;
            let page_text = self
                .recognizer
                .recognize(&image, page.number, &scratch)
                .map_err(|e| into_recognition(page.number, e))?;

            text.push('\n');
            text.push_str(&self.cleanup.process(&page_text));
        }

        Ok(RecognizedText {
            text,
            page_count: pages.len() as u32,
        })
    }

    /// Parse already recognized text as `kind`.
    pub fn parse_text(&self, kind: DocumentKind, text: &str) -> StructuredRecord {
        parse_with(&self.parsers, &self.diagnosis, kind, text)
    }
}

/// Run the kind's parser, then for prescriptions overwrite
/// `provisional_diagnosis` with the heuristic over the full text.
///
/// CRLF and lone CR line endings are normalized first, since text parsed
/// directly may not have gone through page cleanup.
fn parse_with(
    parsers: &ParserSet,
    diagnosis: &DiagnosisExtractor,
    kind: DocumentKind,
    text: &str,
) -> StructuredRecord {
    let text = if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    };

    let mut record = parsers.get(kind).parse(&text);
    if kind == DocumentKind::Prescription {
        record.set("provisional_diagnosis", diagnosis.extract(&text));
    }
    record
}

/// Attribute a stage failure to the page it happened on.
fn into_recognition(page: u32, err: Error) -> Error {
    match err {
        Error::Recognition { .. } => err,
        other => Error::recognition(page, other.to_string()),
    }
}

/// Parse already recognized text as `kind` with freshly compiled parsers.
pub fn parse_text(kind: DocumentKind, text: &str) -> StructuredRecord {
    parse_with(&ParserSet::new(), &DiagnosisExtractor::new(), kind, text)
}
