//! Per-request scratch directories.
//!
//! Renderer and recognizer exchange files through the filesystem. Every
//! extraction gets its own directory, named with a fresh UUID, so that
//! concurrent requests never see each other's intermediate files. The
//! directory is removed when the [`Scratch`] is dropped, on success and on
//! every error path alike.

use crate::error::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// Prefix of every scratch directory name.
pub const SCRATCH_PREFIX: &str = "medscan-";

/// An isolated temporary working area for one extraction.
#[derive(Debug)]
pub struct Scratch {
    id: Uuid,
    dir: TempDir,
}

impl Scratch {
    /// Create a scratch directory under `root`, or under the system temp
    /// directory when `root` is `None`.
    pub fn create(root: Option<&Path>) -> Result<Self> {
        let id = Uuid::new_v4();
        let prefix = format!("{}{}-", SCRATCH_PREFIX, id);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);
        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        log::debug!("created scratch directory {}", dir.path().display());
        Ok(Self { id, dir })
    }

    /// Identifier of the request this area belongs to.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The scratch directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A path for a file inside the scratch directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Create (if needed) and return a subdirectory.
    pub fn subdir(&self, name: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(&path)?;
        Ok(path)
    }
}
