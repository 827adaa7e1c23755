//! Availability checks for the external engines.

use super::EngineConfig;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Outcome of probing one external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStatus {
    /// Engine name ("pdftoppm" or "tesseract")
    pub name: &'static str,
    /// Configured executable
    pub executable: PathBuf,
    /// First line of the version banner, or why the program could not run
    pub version: Result<String, String>,
}

impl EngineStatus {
    /// Whether the program ran and reported a version.
    pub fn is_available(&self) -> bool {
        self.version.is_ok()
    }
}

/// Run each configured engine with its version flag.
pub fn probe_engines(config: &EngineConfig) -> Vec<EngineStatus> {
    vec![
        probe("pdftoppm", &config.pdftoppm_path, "-v"),
        probe("tesseract", &config.tesseract_path, "--version"),
    ]
}

fn probe(name: &'static str, executable: &Path, flag: &str) -> EngineStatus {
    let version = match Command::new(executable).arg(flag).output() {
        Ok(output) if output.status.success() => {
            // pdftoppm prints its banner on stderr.
            let banner = if output.stdout.is_empty() {
                output.stderr
            } else {
                output.stdout
            };
            Ok(String::from_utf8_lossy(&banner)
                .lines()
                .next()
                .unwrap_or("")
                .trim()
                .to_string())
        }
        Ok(output) => Err(format!("exited with {}", output.status)),
        Err(e) => Err(e.to_string()),
    };

    log::debug!("probe {} ({}): {:?}", name, executable.display(), version);

    EngineStatus {
        name,
        executable: executable.to_path_buf(),
        version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_missing_engines() {
        let config = EngineConfig::new()
            .with_pdftoppm("/nonexistent/pdftoppm")
            .with_tesseract("/nonexistent/tesseract");

        let statuses = probe_engines(&config);
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].name, "pdftoppm");
        assert_eq!(statuses[1].name, "tesseract");
        assert!(statuses.iter().all(|s| !s.is_available()));
    }
}
