//! Policy-gated deletion of source PDFs and intermediate page images.
//!
//! Deletions are synchronous-in-order, never retried, and never fatal:
//! a failed deletion is reported as a [`StageError::Delete`] for the caller
//! to log and count, but it does not revert accounting already recorded
//! for the conversion itself.

use crate::config::DeletionPolicy;
use crate::error::StageError;
use std::path::Path;

/// Outcome of a deletion attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The file was removed.
    Deleted,
    /// The policy prevented deletion; nothing was touched.
    SkippedByPolicy,
}

/// Delete a source PDF if the policy allows it.
pub async fn delete_pdf(pdf: &Path, policy: &DeletionPolicy) -> Result<DeleteOutcome, StageError> {
    if !policy.delete_pdfs() {
        return Ok(DeleteOutcome::SkippedByPolicy);
    }
    remove(pdf).await
}

/// Delete an intermediate page image if the policy allows it.
pub async fn delete_png(png: &Path, policy: &DeletionPolicy) -> Result<DeleteOutcome, StageError> {
    if !policy.delete_pngs() {
        return Ok(DeleteOutcome::SkippedByPolicy);
    }
    remove(png).await
}

async fn remove(path: &Path) -> Result<DeleteOutcome, StageError> {
    tokio::fs::remove_file(path)
        .await
        .map(|_| DeleteOutcome::Deleted)
        .map_err(|e| StageError::Delete {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
}
