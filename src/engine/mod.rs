//! External capabilities used by the extraction pipeline.
//!
//! Rendering PDF pages, preprocessing page images and recognizing text are
//! treated as opaque services behind three traits. The default
//! implementations drive Poppler's `pdftoppm` and the `tesseract` command
//! line through [`EngineConfig`]; tests and embedders can inject their own.

mod config;
mod preprocess;
mod probe;
mod recognize;
mod render;

pub use config::EngineConfig;
pub use preprocess::{AdaptiveThreshold, Passthrough};
pub use probe::{probe_engines, EngineStatus};
pub use recognize::TesseractRecognizer;
pub use render::PopplerRenderer;

use crate::error::Result;
use crate::model::PageImage;
use crate::workspace::Scratch;
use image::DynamicImage;

/// Renders a PDF into page images, in page order.
pub trait PageRenderer: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Render every page. Fails with `Error::Render` if the input cannot be
    /// decoded. `scratch` is private to the current extraction.
    fn render(&self, pdf: &[u8], scratch: &Scratch) -> Result<Vec<PageImage>>;
}

/// Prepares a rendered page for text recognition.
pub trait ImagePreprocessor: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Produce the image handed to the recognizer.
    fn preprocess(&self, page: &PageImage) -> Result<DynamicImage>;
}

/// Converts a preprocessed page image into raw text.
pub trait TextRecognizer: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Recognize the text of page `page` (1-based).
    fn recognize(&self, image: &DynamicImage, page: u32, scratch: &Scratch) -> Result<String>;
}
