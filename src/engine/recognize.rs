//! Text recognition through the `tesseract` command line.

use super::{EngineConfig, TextRecognizer};
use crate::error::{Error, Result};
use crate::workspace::Scratch;
use image::{DynamicImage, ImageFormat};
use std::path::PathBuf;
use std::process::Command;

/// Runs `tesseract <image> stdout -l <lang>` on each page.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    executable: PathBuf,
    language: String,
    page_segmentation_mode: Option<u8>,
}

impl TesseractRecognizer {
    /// Create a recognizer from the engine configuration.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            executable: config.tesseract_path.clone(),
            language: config.language.clone(),
            page_segmentation_mode: config.page_segmentation_mode,
        }
    }

    fn command(&self, image_path: &std::path::Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(image_path).arg("stdout").arg("-l").arg(&self.language);
        if let Some(psm) = self.page_segmentation_mode {
            cmd.arg("--psm").arg(psm.to_string());
        }
        cmd
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage, page: u32, scratch: &Scratch) -> Result<String> {
        let image_path = scratch.file(&format!("ocr-page-{}.png", page));
        image
            .save_with_format(&image_path, ImageFormat::Png)
            .map_err(|e| Error::recognition(page, format!("failed to write page image: {}", e)))?;

        let output = self.command(&image_path).output().map_err(|e| {
            Error::recognition(
                page,
                format!("failed to run {}: {}", self.executable.display(), e),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::recognition(
                page,
                format!(
                    "{} exited with {}: {}",
                    self.executable.display(),
                    output.status,
                    stderr.trim()
                ),
            ));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        log::debug!("page {}: recognized {} characters", page, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_command_arguments() {
        let config = EngineConfig::new()
            .with_tesseract("/usr/local/bin/tesseract")
            .with_language("eng+fra")
            .with_page_segmentation_mode(4);
        let recognizer = TesseractRecognizer::new(&config);
        let cmd = recognizer.command(std::path::Path::new("/tmp/p.png"));

        assert_eq!(cmd.get_program(), "/usr/local/bin/tesseract");
        let args: Vec<_> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, vec!["/tmp/p.png", "stdout", "-l", "eng+fra", "--psm", "4"]);
    }

    #[test]
    fn test_missing_executable_is_recognition_error() {
        let config = EngineConfig::new().with_tesseract("/nonexistent/tesseract");
        let recognizer = TesseractRecognizer::new(&config);
        let scratch = Scratch::create(None).unwrap();
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([255u8])));

        let result = recognizer.recognize(&image, 2, &scratch);
        assert!(matches!(result, Err(Error::Recognition { page: 2, .. })));
    }
}
