//! Page rendering through Poppler's `pdftoppm`.

use super::{EngineConfig, PageRenderer};
use crate::detect::sniff_pdf;
use crate::error::{Error, Result};
use crate::model::PageImage;
use crate::workspace::Scratch;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Renders PDF pages to PNG with `pdftoppm -png -r <dpi>`.
#[derive(Debug, Clone)]
pub struct PopplerRenderer {
    executable: PathBuf,
    dpi: u32,
}

impl PopplerRenderer {
    /// Create a renderer from the engine configuration.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            executable: config.pdftoppm_path.clone(),
            dpi: config.dpi,
        }
    }
}

impl PageRenderer for PopplerRenderer {
    fn name(&self) -> &str {
        "pdftoppm"
    }

    fn render(&self, pdf: &[u8], scratch: &Scratch) -> Result<Vec<PageImage>> {
        let header = sniff_pdf(pdf)?;
        log::debug!("rendering {} ({} bytes) at {} dpi", header, pdf.len(), self.dpi);

        let input = scratch.file("input.pdf");
        std::fs::write(&input, pdf)?;
        let out_dir = scratch.subdir("pages")?;

        let output = Command::new(&self.executable)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(&input)
            .arg(out_dir.join("page"))
            .output()
            .map_err(|e| {
                Error::Render(format!(
                    "failed to run {}: {}",
                    self.executable.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Render(format!(
                "{} exited with {}: {}",
                self.executable.display(),
                output.status,
                stderr.trim()
            )));
        }

        let files = rendered_pages(&out_dir)?;
        if files.is_empty() {
            return Err(Error::Render("document has no pages".into()));
        }

        files
            .into_iter()
            .enumerate()
            .map(|(i, path)| {
                let image = image::open(&path).map_err(|e| {
                    Error::Render(format!("failed to decode {}: {}", path.display(), e))
                })?;
                Ok(PageImage::new(i as u32 + 1, image))
            })
            .collect()
    }
}

/// PNG files written by `pdftoppm`, ordered by page number.
///
/// `pdftoppm` zero-pads the page number to the width of the page count
/// (`page-1.png` or `page-01.png`), so sort numerically rather than by name.
fn rendered_pages(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages: Vec<(u32, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("png") {
            continue;
        }
        if let Some(number) = page_number(&path) {
            pages.push((number, path));
        }
    }
    pages.sort_by_key(|(number, _)| *number);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

fn page_number(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    stem.rsplit('-').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number() {
        assert_eq!(page_number(Path::new("/tmp/x/page-1.png")), Some(1));
        assert_eq!(page_number(Path::new("/tmp/x/page-010.png")), Some(10));
        assert_eq!(page_number(Path::new("/tmp/x/input.png")), None);
    }

    #[test]
    fn test_rendered_pages_sorted_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-10.png", "page-2.png", "page-1.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let pages = rendered_pages(dir.path()).unwrap();
        let names: Vec<_> = pages
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["page-1.png", "page-2.png", "page-10.png"]);
    }

    #[test]
    fn test_render_rejects_non_pdf_before_spawning() {
        let renderer = PopplerRenderer::new(
            &EngineConfig::new().with_pdftoppm("/nonexistent/pdftoppm"),
        );
        let scratch = Scratch::create(None).unwrap();
        let result = renderer.render(b"GIF89a not a pdf", &scratch);
        assert!(matches!(result, Err(Error::Render(ref m)) if m.contains("not a PDF")));
    }

    #[test]
    fn test_render_missing_executable() {
        let renderer = PopplerRenderer::new(
            &EngineConfig::new().with_pdftoppm("/nonexistent/pdftoppm"),
        );
        let scratch = Scratch::create(None).unwrap();
        let result = renderer.render(b"%PDF-1.4\n%%EOF\n", &scratch);
        assert!(matches!(result, Err(Error::Render(ref m)) if m.contains("failed to run")));
    }
}
