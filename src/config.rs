//! Configuration types for a batch OCR run.
//!
//! All run behaviour is controlled through [`JobConfig`], built via its
//! [`JobConfigBuilder`]. Keeping every knob in one immutable struct makes it
//! trivial to log the configuration of a run and to diff two runs to
//! understand why their outcomes differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest.

use crate::error::BatchError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a batch OCR run.
///
/// Built via [`JobConfig::builder()`] or [`JobConfig::default()`].
/// Immutable once built; constructed once per run.
///
/// # Example
/// ```rust
/// use ocrbatch::{ErrorMode, JobConfig};
///
/// let config = JobConfig::builder()
///     .input_dir("./scans")
///     .density(200)
///     .error_mode(ErrorMode::Exit)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Directory scanned for `*.pdf` files. Default: `.`
    pub input_dir: PathBuf,

    /// Directory receiving the per-page `.txt` files. Created if absent.
    /// Default: `extracted-text`
    pub output_dir: PathBuf,

    /// Log file path. `None` means a timestamped default,
    /// `preprocess_log_<YYYYMMDD_HHMMSS>.txt`, chosen when the run starts.
    pub log_file: Option<PathBuf>,

    /// Quiet mode: only error lines and the final summary reach the
    /// terminal. The log file always receives every line. Default: false.
    pub quiet: bool,

    /// Which intermediate and source files to delete after processing.
    pub deletion: DeletionPolicy,

    /// Whether a failure halts the whole batch or only the current file.
    pub error_mode: ErrorMode,

    /// Rasterization density in DPI. Range: 72–600. Default: 300.
    ///
    /// 300 DPI is what Tesseract's own documentation recommends for scanned
    /// text. Lower values speed up rasterization but degrade recognition on
    /// small fonts; higher values rarely help and inflate the intermediate
    /// PNGs.
    pub density: u32,

    /// Rasterizer output quality, 1–100. Default: 100.
    pub quality: u32,

    /// OCR language passed to the extractor (`-l`). Default: `eng`.
    pub lang: String,

    /// Program name (or path) of the external rasterizer. Default: `convert`.
    ///
    /// Overridable so non-ImageMagick setups (`magick`, a wrapper script)
    /// and tests can substitute their own executable. The program must
    /// accept ImageMagick-style arguments:
    /// `<prog> -density <dpi> <pdf> -quality <q> <stem>-%d.png`
    pub rasterizer_program: String,

    /// Program name (or path) of the external OCR tool. Default: `tesseract`.
    ///
    /// Invoked as `<prog> <image> <output-base> -l <lang> txt` and expected
    /// to write `<output-base>.txt`.
    pub ocr_program: String,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("extracted-text"),
            log_file: None,
            quiet: false,
            deletion: DeletionPolicy::default(),
            error_mode: ErrorMode::default(),
            density: 300,
            quality: 100,
            lang: "eng".to_string(),
            rasterizer_program: "convert".to_string(),
            ocr_program: "tesseract".to_string(),
        }
    }
}

impl JobConfig {
    /// Create a new builder for `JobConfig`.
    pub fn builder() -> JobConfigBuilder {
        JobConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`JobConfig`].
#[derive(Debug)]
pub struct JobConfigBuilder {
    config: JobConfig,
}

impl JobConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file = Some(path.into());
        self
    }

    pub fn quiet(mut self, v: bool) -> Self {
        self.config.quiet = v;
        self
    }

    pub fn deletion(mut self, policy: DeletionPolicy) -> Self {
        self.config.deletion = policy;
        self
    }

    pub fn error_mode(mut self, mode: ErrorMode) -> Self {
        self.config.error_mode = mode;
        self
    }

    pub fn density(mut self, dpi: u32) -> Self {
        self.config.density = dpi.clamp(72, 600);
        self
    }

    pub fn quality(mut self, q: u32) -> Self {
        self.config.quality = q.clamp(1, 100);
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.config.lang = lang.into();
        self
    }

    pub fn rasterizer_program(mut self, prog: impl Into<String>) -> Self {
        self.config.rasterizer_program = prog.into();
        self
    }

    pub fn ocr_program(mut self, prog: impl Into<String>) -> Self {
        self.config.ocr_program = prog.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<JobConfig, BatchError> {
        let c = &self.config;
        if c.lang.is_empty() {
            return Err(BatchError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        if c.rasterizer_program.is_empty() || c.ocr_program.is_empty() {
            return Err(BatchError::InvalidConfig(
                "External program names must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Post-processing cleanup policy.
///
/// Two independent keep flags plus a `no_delete` override that wins over
/// both. The default deletes everything: the assumption is that the text
/// files are the product and the source PDFs were already archived.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DeletionPolicy {
    /// Keep the source PDF files after a successful conversion.
    pub keep_pdfs: bool,
    /// Keep the intermediate per-page PNG files.
    pub keep_pngs: bool,
    /// Keep everything, regardless of the two flags above.
    pub no_delete: bool,
}

impl DeletionPolicy {
    /// Whether source PDFs should be deleted after successful rasterization.
    pub fn delete_pdfs(&self) -> bool {
        !(self.no_delete || self.keep_pdfs)
    }

    /// Whether page images should be deleted after successful extraction.
    pub fn delete_pngs(&self) -> bool {
        !(self.no_delete || self.keep_pngs)
    }
}

/// Run-level policy for stage failures.
///
/// `Continue` matches the batch-digitization use case: one corrupt scan out
/// of a thousand should not stop the other 999. `Exit` is for supervised
/// runs where the first failure means something is wrong with the setup
/// (missing tool, wrong directory) and continuing would only multiply the
/// damage. Either way the end-of-run summary is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Log the failure, count it, and move on to the next page/file. (default)
    #[default]
    Continue,
    /// Log the failure, count it, and halt further file processing.
    /// The summary for the partial run is still logged.
    Exit,
}
