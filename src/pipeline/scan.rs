//! Input enumeration: find the PDF files to process.
//!
//! The listing is sorted lexicographically by file name so two runs over the
//! same directory process files in the same order and produce identical logs.

use crate::error::BatchError;
use std::path::{Path, PathBuf};

/// List the `*.pdf` files (case-insensitive extension) directly inside
/// `input_dir`, sorted by file name.
///
/// Subdirectories are not descended into. An empty result is not an error;
/// the caller logs it and ends the run with zero counters.
pub async fn scan_input_dir(input_dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !input_dir.is_dir() {
        return Err(BatchError::InputDirNotFound {
            path: input_dir.to_path_buf(),
        });
    }

    let mut entries =
        tokio::fs::read_dir(input_dir)
            .await
            .map_err(|source| BatchError::InputDirUnreadable {
                path: input_dir.to_path_buf(),
                source,
            })?;

    let mut pdfs = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|source| {
        BatchError::InputDirUnreadable {
            path: input_dir.to_path_buf(),
            source,
        }
    })? {
        let path = entry.path();
        if path.is_file() && has_pdf_extension(&path) {
            pdfs.push(path);
        }
    }

    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    tracing::debug!("found {} PDF file(s) in {}", pdfs.len(), input_dir.display());
    Ok(pdfs)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
