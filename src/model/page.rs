//! Rendered page images.

use image::DynamicImage;

/// One rendered page of a document.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Rendered raster
    pub image: DynamicImage,
}

impl PageImage {
    /// Create a page image.
    pub fn new(number: u32, image: DynamicImage) -> Self {
        Self { number, image }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
