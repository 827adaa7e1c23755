//! Engine configuration.

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Environment variable overriding the `pdftoppm` executable.
pub const ENV_PDFTOPPM: &str = "MEDSCAN_PDFTOPPM";
/// Environment variable overriding the `tesseract` executable.
pub const ENV_TESSERACT: &str = "MEDSCAN_TESSERACT";
/// Environment variable selecting the OCR language.
pub const ENV_OCR_LANG: &str = "MEDSCAN_OCR_LANG";
/// Environment variable selecting the render resolution.
pub const ENV_DPI: &str = "MEDSCAN_DPI";

/// Locations and settings of the external rendering and OCR engines.
///
/// Nothing is hardcoded to a machine: by default the executables are looked
/// up on `PATH`, and every setting can be overridden through the builder
/// methods or [`EngineConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Path to (or name of) the `pdftoppm` executable
    pub pdftoppm_path: PathBuf,

    /// Path to (or name of) the `tesseract` executable
    pub tesseract_path: PathBuf,

    /// Tesseract language code(s), e.g. "eng" or "eng+deu"
    pub language: String,

    /// Render resolution in dots per inch
    pub dpi: u32,

    /// Tesseract page segmentation mode (`--psm`), engine default if unset
    pub page_segmentation_mode: Option<u8>,
}

impl EngineConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `MEDSCAN_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(path) = std::env::var(ENV_PDFTOPPM) {
            config.pdftoppm_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var(ENV_TESSERACT) {
            config.tesseract_path = PathBuf::from(path);
        }
        if let Ok(lang) = std::env::var(ENV_OCR_LANG) {
            config.language = lang;
        }
        if let Ok(dpi) = std::env::var(ENV_DPI) {
            config.dpi = dpi
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{} must be an integer, got {:?}", ENV_DPI, dpi)))?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the `pdftoppm` executable.
    pub fn with_pdftoppm(mut self, path: impl Into<PathBuf>) -> Self {
        self.pdftoppm_path = path.into();
        self
    }

    /// Set the `tesseract` executable.
    pub fn with_tesseract(mut self, path: impl Into<PathBuf>) -> Self {
        self.tesseract_path = path.into();
        self
    }

    /// Set the OCR language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the render resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the Tesseract page segmentation mode.
    pub fn with_page_segmentation_mode(mut self, psm: u8) -> Self {
        self.page_segmentation_mode = Some(psm);
        self
    }

    /// Check the settings for obviously unusable values.
    pub fn validate(&self) -> Result<()> {
        if !(36..=1200).contains(&self.dpi) {
            return Err(Error::Config(format!(
                "dpi must be between 36 and 1200, got {}",
                self.dpi
            )));
        }
        if self.language.trim().is_empty() {
            return Err(Error::Config("OCR language must not be empty".into()));
        }
        if let Some(psm) = self.page_segmentation_mode {
            if psm > 13 {
                return Err(Error::Config(format!(
                    "page segmentation mode must be 0-13, got {}",
                    psm
                )));
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pdftoppm_path: PathBuf::from("pdftoppm"),
            tesseract_path: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            dpi: 200,
            page_segmentation_mode: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.pdftoppm_path, PathBuf::from("pdftoppm"));
        assert_eq!(config.language, "eng");
        assert_eq!(config.dpi, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_tesseract("/opt/tesseract/bin/tesseract")
            .with_language("eng+deu")
            .with_dpi(300)
            .with_page_segmentation_mode(6);
        assert_eq!(
            config.tesseract_path,
            PathBuf::from("/opt/tesseract/bin/tesseract")
        );
        assert_eq!(config.language, "eng+deu");
        assert_eq!(config.page_segmentation_mode, Some(6));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            EngineConfig::new().with_dpi(5).validate(),
            Err(Error::Config(_))
        ));
        assert!(EngineConfig::new().with_language(" ").validate().is_err());
        assert!(EngineConfig::new()
            .with_page_segmentation_mode(14)
            .validate()
            .is_err());
    }
}
