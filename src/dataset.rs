//! Handwriting image datasets.
//!
//! Training sets for a handwriting recognizer are directories of word
//! images whose label is encoded in the file name. Different sets put the
//! label in different places (`hello_001.png` versus `img_hello.png`), so
//! the position is a [`LabelStrategy`] rather than a separate loader per
//! layout. Every image is loaded as grayscale, resized to a fixed size and
//! optionally scaled to `0.0..=1.0`.

use crate::error::{Error, Result};
use image::imageops::FilterType;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Where the label sits in an underscore-separated file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelStrategy {
    /// First segment: `hello_001.png` → `hello`
    #[default]
    Prefix,
    /// Last segment: `img_hello.png` → `hello`
    Suffix,
    /// Zero-based segment index: `Field(1)` on `a_b_c.png` → `b`
    Field(usize),
}

impl LabelStrategy {
    /// Extract the label from a file name, or `None` if the name has no
    /// segment at the configured position.
    pub fn label(&self, file_name: &str) -> Option<String> {
        let stem = Path::new(file_name).file_stem()?.to_str()?;
        let segment = match self {
            LabelStrategy::Prefix => stem.split('_').next(),
            LabelStrategy::Suffix => stem.rsplit_once('_').map(|(_, last)| last),
            LabelStrategy::Field(index) => stem.split('_').nth(*index),
        }?;
        if segment.is_empty() {
            None
        } else {
            Some(segment.to_string())
        }
    }
}

/// Options for loading a dataset.
#[derive(Debug, Clone)]
pub struct DatasetOptions {
    /// Label position in file names
    pub label: LabelStrategy,

    /// Target width in pixels
    pub width: u32,

    /// Target height in pixels
    pub height: u32,

    /// Scale pixel values from `0..=255` to `0.0..=1.0`
    pub normalize: bool,

    /// File extension to include (case-insensitive, without the dot)
    pub extension: String,
}

impl DatasetOptions {
    /// Create options with defaults (128×32, normalized, `.png`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label strategy.
    pub fn with_label(mut self, label: LabelStrategy) -> Self {
        self.label = label;
        self
    }

    /// Set the target size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Enable or disable normalization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the included file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            label: LabelStrategy::Prefix,
            width: 128,
            height: 32,
            normalize: true,
            extension: "png".to_string(),
        }
    }
}

/// A labeled image file found while scanning a dataset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    /// Image file
    pub path: PathBuf,
    /// Label taken from the file name
    pub label: String,
}

/// One loaded training sample.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Source image
    pub path: PathBuf,
    /// Label taken from the file name
    pub label: String,
    /// Row-major grayscale pixels, `width * height` values
    pub pixels: Vec<f32>,
}

/// A loaded dataset. All samples share the same dimensions.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Sample width
    pub width: u32,
    /// Sample height
    pub height: u32,
    /// Samples in path order
    pub samples: Vec<Sample>,
}

impl Dataset {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Labels in sample order.
    pub fn labels(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.label.as_str()).collect()
    }
}

/// Recursively list the labeled images under `dir`, sorted by path.
///
/// A matching file whose name yields no label is an error rather than a
/// silently skipped sample.
pub fn scan<P: AsRef<Path>>(dir: P, options: &DatasetOptions) -> Result<Vec<DatasetEntry>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::Dataset(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    collect_files(dir, &options.extension, &mut files)?;
    files.sort();

    files
        .into_iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match options.label.label(&name) {
                Some(label) => Ok(DatasetEntry { path, label }),
                None => Err(Error::Dataset(format!(
                    "no label in file name {:?} ({:?})",
                    name, options.label
                ))),
            }
        })
        .collect()
}

fn collect_files(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, extension, out)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Load one image as a resized grayscale sample.
pub fn load_sample(entry: &DatasetEntry, options: &DatasetOptions) -> Result<Sample> {
    if options.width == 0 || options.height == 0 {
        return Err(Error::Config(format!(
            "invalid sample size {}x{}",
            options.width, options.height
        )));
    }

    let image = image::open(&entry.path)
        .map_err(|e| Error::Dataset(format!("{}: {}", entry.path.display(), e)))?;
    let gray = image
        .resize_exact(options.width, options.height, FilterType::Triangle)
        .to_luma8();

    let scale = if options.normalize { 255.0 } else { 1.0 };
    let pixels = gray.pixels().map(|p| p.0[0] as f32 / scale).collect();

    Ok(Sample {
        path: entry.path.clone(),
        label: entry.label.clone(),
        pixels,
    })
}

/// Scan `dir` and load every sample in parallel.
pub fn load<P: AsRef<Path>>(dir: P, options: &DatasetOptions) -> Result<Dataset> {
    let entries = scan(&dir, options)?;
    log::debug!(
        "loading {} samples from {}",
        entries.len(),
        dir.as_ref().display()
    );

    let samples = entries
        .par_iter()
        .map(|entry| load_sample(entry, options))
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset {
        width: options.width,
        height: options.height,
        samples,
    })
}
