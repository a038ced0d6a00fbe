//! # ocrbatch
//!
//! Batch-convert multi-page PDF documents to per-page text files.
//!
//! ## Why this crate?
//!
//! Bulk-digitizing a folder of scanned PDFs by hand means running ImageMagick
//! and Tesseract once per page, tracking which files succeeded, and cleaning
//! up the intermediate images afterwards. This crate wraps that chore in a
//! single error-tolerant loop: every PDF in an input directory is rasterised
//! to one PNG per page, each PNG is OCR'd to a text file, intermediates are
//! deleted per a configurable policy, and the run ends with a summary of
//! successes, failures, and errors.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input dir
//!  │
//!  ├─ 1. Scan       enumerate *.pdf (case-insensitive, sorted)
//!  ├─ 2. Rasterize  one PNG per page via the external rasterizer
//!  ├─ 3. Extract    one text file per PNG via the external OCR tool
//!  ├─ 4. Cleanup    delete source PDF / page PNGs per deletion policy
//!  └─ 5. Summary    processed / failed / errors + wall-clock duration
//! ```
//!
//! Both external tools are opaque collaborators: the crate spawns them, waits
//! for the exit status, and checks that the expected output files appeared.
//! Nothing is parsed, rendered, or recognised in-process.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ocrbatch::{run, JobConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = JobConfig::builder()
//!         .input_dir("./scans")
//!         .output_dir("./extracted-text")
//!         .build()?;
//!     let summary = run(&config).await?;
//!     println!(
//!         "{} processed, {} failed, {} errors in {}s",
//!         summary.processed, summary.failed, summary.errors, summary.duration_secs
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ocrbatch` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! ocrbatch = { version = "0.3", default-features = false }
//! ```
//!
//! ## External tools
//!
//! By default the rasterizer is ImageMagick's `convert` and the OCR engine is
//! `tesseract`; both must be on `PATH`. The program names are configurable
//! via [`JobConfig`], which also lets tests substitute stub executables.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod logger;
pub mod pipeline;
pub mod report;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DeletionPolicy, ErrorMode, JobConfig, JobConfigBuilder};
pub use error::{BatchError, StageError};
pub use logger::{LogLevel, Logger};
pub use report::{RunCounters, Summary};
pub use run::{run, run_sync};
