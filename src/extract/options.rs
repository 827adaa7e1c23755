//! Extraction options and configuration.

use crate::cleanup::{CleanupOptions, CleanupPreset};
use crate::engine::EngineConfig;
use crate::error::Result;
use std::path::PathBuf;

/// Environment variable selecting where scratch directories are created.
pub const ENV_SCRATCH_DIR: &str = "MEDSCAN_SCRATCH_DIR";

/// Options for building an [`Extractor`](super::Extractor).
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// External engine settings
    pub engine: EngineConfig,

    /// Cleanup applied to each page's recognized text
    pub cleanup: CleanupOptions,

    /// Parent directory for per-request scratch directories
    /// (system temp directory if unset)
    pub scratch_root: Option<PathBuf>,

    /// Skip image preprocessing and recognize the rendered pages directly
    pub skip_preprocessing: bool,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `MEDSCAN_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut options = Self {
            engine: EngineConfig::from_env()?,
            ..Self::default()
        };
        if let Ok(dir) = std::env::var(ENV_SCRATCH_DIR) {
            options.scratch_root = Some(PathBuf::from(dir));
        }
        Ok(options)
    }

    /// Set engine configuration.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Set cleanup from a preset.
    pub fn with_cleanup_preset(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = CleanupOptions::from_preset(preset);
        self
    }

    /// Set the scratch root directory.
    pub fn with_scratch_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(dir.into());
        self
    }

    /// Skip image preprocessing.
    pub fn without_preprocessing(mut self) -> Self {
        self.skip_preprocessing = true;
        self
    }
}
