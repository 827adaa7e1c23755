//! Page image preprocessing.

use super::ImagePreprocessor;
use crate::error::{Error, Result};
use crate::model::PageImage;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};

/// Grayscale, upscale and binarize with a local mean threshold.
///
/// Scanned forms often have uneven lighting; comparing each pixel with the
/// mean of its neighbourhood instead of a global cut-off keeps faint print
/// legible. A pixel becomes white when it is brighter than the local mean
/// minus `offset`, black otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveThreshold {
    /// Resize factor applied before thresholding
    pub scale: f32,
    /// Side of the square neighbourhood (odd, >= 3)
    pub block_size: u32,
    /// Constant subtracted from the local mean
    pub offset: i32,
}

impl AdaptiveThreshold {
    /// Create with defaults (1.5x upscale, 61px blocks, offset 11).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resize factor.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the neighbourhood size. Even values are rounded up.
    pub fn with_block_size(mut self, block_size: u32) -> Self {
        self.block_size = (block_size.max(3)) | 1;
        self
    }

    /// Set the offset subtracted from the local mean.
    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }
}

impl Default for AdaptiveThreshold {
    fn default() -> Self {
        Self {
            scale: 1.5,
            block_size: 61,
            offset: 11,
        }
    }
}

impl ImagePreprocessor for AdaptiveThreshold {
    fn name(&self) -> &str {
        "adaptive-threshold"
    }

    fn preprocess(&self, page: &PageImage) -> Result<DynamicImage> {
        let gray = page.image.to_luma8();
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::recognition(page.number, "page image is empty"));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::Config(format!("invalid scale factor {}", self.scale)));
        }

        let gray = if (self.scale - 1.0).abs() > f32::EPSILON {
            let w = ((width as f32) * self.scale).round().max(1.0) as u32;
            let h = ((height as f32) * self.scale).round().max(1.0) as u32;
            imageops::resize(&gray, w, h, FilterType::Triangle)
        } else {
            gray
        };

        Ok(DynamicImage::ImageLuma8(mean_threshold(
            &gray,
            self.block_size,
            self.offset,
        )))
    }
}

/// Hands the rendered page to the recognizer unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl ImagePreprocessor for Passthrough {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn preprocess(&self, page: &PageImage) -> Result<DynamicImage> {
        Ok(page.image.clone())
    }
}

/// Local mean thresholding using a summed-area table.
fn mean_threshold(img: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let (width, height) = img.dimensions();
    let (w, h) = (width as usize, height as usize);
    let stride = w + 1;

    let mut integral = vec![0u64; stride * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += img.get_pixel(x as u32, y as u32)[0] as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }

    let radius = (block_size / 2) as usize;
    GrayImage::from_fn(width, height, |x, y| {
        let (x, y) = (x as usize, y as usize);
        let x0 = x.saturating_sub(radius);
        let y0 = y.saturating_sub(radius);
        let x1 = (x + radius).min(w - 1) + 1;
        let y1 = (y + radius).min(h - 1) + 1;

        let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
            - integral[y0 * stride + x1]
            - integral[y1 * stride + x0];
        let count = ((x1 - x0) * (y1 - y0)) as u64;
        let mean = (sum / count) as i64;

        let value = img.get_pixel(x as u32, y as u32)[0] as i64;
        if value > mean - offset as i64 {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
