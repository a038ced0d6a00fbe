//! PDF rasterization via the external rasterizer command.
//!
//! The rasterizer (ImageMagick `convert` by default) is an opaque
//! collaborator: it is handed the source path and an output naming pattern,
//! and is expected to emit one `<basename>-<N>.png` per page, zero-indexed,
//! next to the source file. Failure is a non-zero exit status, a spawn
//! failure, or zero generated images — the tool's stderr is discarded, so
//! the generated files are the only ground truth we check.

use crate::config::JobConfig;
use crate::error::StageError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// One generated page image: its zero-based page index and its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub index: usize,
    pub path: PathBuf,
}

/// Rasterize every page of `pdf` to `<basename>-<N>.png` alongside the
/// source file.
///
/// Blocks (via await) until the rasterizer exits; one child process at a
/// time. Returns the generated page images in ascending page order.
pub async fn rasterize_pdf(pdf: &Path, config: &JobConfig) -> Result<Vec<PageImage>, StageError> {
    let stem = file_stem(pdf)?;
    let work_dir = pdf.parent().unwrap_or_else(|| Path::new("."));
    let pattern = work_dir.join(format!("{stem}-%d.png"));

    tracing::debug!(
        "rasterizing {} at {} dpi via '{}'",
        pdf.display(),
        config.density,
        config.rasterizer_program
    );

    let status = Command::new(&config.rasterizer_program)
        .arg("-density")
        .arg(config.density.to_string())
        .arg(pdf)
        .arg("-quality")
        .arg(config.quality.to_string())
        .arg(&pattern)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| StageError::Rasterize {
            pdf: pdf.to_path_buf(),
            detail: format!("failed to run '{}': {}", config.rasterizer_program, e),
        })?;

    if !status.success() {
        return Err(StageError::Rasterize {
            pdf: pdf.to_path_buf(),
            detail: format!("rasterizer exited with {status}"),
        });
    }

    let pages = collect_page_images(work_dir, &stem).map_err(|e| StageError::Rasterize {
        pdf: pdf.to_path_buf(),
        detail: format!("failed to list page images: {e}"),
    })?;

    if pages.is_empty() {
        return Err(StageError::Rasterize {
            pdf: pdf.to_path_buf(),
            detail: "no page images were generated".to_string(),
        });
    }

    Ok(pages)
}

fn file_stem(pdf: &Path) -> Result<String, StageError> {
    pdf.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| StageError::Rasterize {
            pdf: pdf.to_path_buf(),
            detail: "source path has no file name".to_string(),
        })
}

/// Find `<stem>-<N>.png` files in `dir`, sorted ascending by page index.
fn collect_page_images(dir: &Path, stem: &str) -> std::io::Result<Vec<PageImage>> {
    let mut pages = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        if let Some(index) = page_index(&name.to_string_lossy(), stem) {
            pages.push(PageImage { index, path });
        }
    }
    // Numeric sort: page 10 comes after page 2, which lexicographic
    // file-name order would get wrong.
    pages.sort_by_key(|p| p.index);
    Ok(pages)
}

/// Parse the page index out of `<stem>-<N>.png`, or `None` if the name
/// does not match.
fn page_index(file_name: &str, stem: &str) -> Option<usize> {
    let rest = file_name.strip_prefix(stem)?.strip_prefix('-')?;
    let digits = rest.strip_suffix(".png")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
