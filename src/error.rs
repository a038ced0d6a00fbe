//! Error types for the ocrbatch library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`BatchError`] — **Fatal**: the run cannot proceed at all (input
//!   directory missing, output directory or log file could not be created,
//!   invalid configuration). Returned as `Err(BatchError)` from
//!   [`crate::run::run`].
//!
//! * [`StageError`] — **Non-fatal**: one stage of one file failed (the
//!   rasterizer exited non-zero, the OCR tool produced no text file, a
//!   cleanup deletion failed). Caught at the invocation site, logged with
//!   the filename and stage, and converted into a counter increment. Under
//!   [`crate::config::ErrorMode::Exit`] a stage error additionally halts
//!   further file iteration, but that is a deliberate early-termination
//!   signal, not an unhandled fault — the summary is still emitted.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the ocrbatch library.
///
/// Per-file, per-page, and cleanup failures use [`StageError`] and are
/// accounted for in [`crate::report::RunCounters`] rather than propagated
/// here.
#[derive(Debug, Error)]
pub enum BatchError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input directory does not exist or is not a directory.
    #[error("Input directory not found: '{path}'\nCheck the path exists and is a directory.")]
    InputDirNotFound { path: PathBuf },

    /// The input directory exists but could not be read.
    #[error("Failed to read input directory '{path}': {source}")]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Setup errors ──────────────────────────────────────────────────────
    /// The output directory was absent and could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log file could not be created or opened for appending.
    #[error("Failed to open log file '{path}': {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error from one stage of processing one file.
///
/// Every variant names the file it concerns so the log line pinpoints what
/// went wrong without a stack trace.
#[derive(Debug, Clone, Error)]
pub enum StageError {
    /// The rasterizer exited non-zero, failed to spawn, or produced no
    /// page images.
    #[error("Failed to convert {pdf} to PNGs: {detail}")]
    Rasterize { pdf: PathBuf, detail: String },

    /// The OCR tool exited non-zero, failed to spawn, or produced no
    /// output text file.
    #[error("Failed to convert {image} to text: {detail}")]
    Extract { image: PathBuf, detail: String },

    /// A policy-approved deletion failed.
    #[error("Failed to delete {path}: {detail}")]
    Delete { path: PathBuf, detail: String },
}

impl StageError {
    /// The path of the file this stage was working on.
    pub fn path(&self) -> &PathBuf {
        match self {
            StageError::Rasterize { pdf, .. } => pdf,
            StageError::Extract { image, .. } => image,
            StageError::Delete { path, .. } => path,
        }
    }
}
