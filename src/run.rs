//! The batch orchestration loop.
//!
//! One PDF, one page, one external command at a time: the loop awaits every
//! child process to completion before starting the next, so there is no
//! overlap, no timeout, and no cancellation. Every stage failure is caught
//! right here at the invocation site, logged, and converted into a counter
//! increment; the only thing that stops the loop early is
//! [`ErrorMode::Exit`], and even then the summary is still emitted for the
//! partial run.

use crate::config::{ErrorMode, JobConfig};
use crate::error::BatchError;
use crate::logger::{self, Logger};
use crate::pipeline::cleanup::{self, DeleteOutcome};
use crate::pipeline::{extract, rasterize, scan};
use crate::report::{RunCounters, Summary};
use std::time::Instant;
use tracing::info;

/// Run the batch over `config.input_dir`.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(Summary)` whenever the run reached its summary, including runs with
/// logged stage errors and runs halted early by [`ErrorMode::Exit`]
/// (check `summary.halted`).
///
/// # Errors
/// Returns `Err(BatchError)` only for fatal setup errors:
/// - The input directory is missing or unreadable
/// - The output directory could not be created
/// - The log file could not be opened
pub async fn run(config: &JobConfig) -> Result<Summary, BatchError> {
    let start = Instant::now();

    // ── Step 1: Open the run log ─────────────────────────────────────────
    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(logger::default_log_file_name);
    let mut log = Logger::open(&log_path, config.quiet)?;
    info!("Starting batch run over {}", config.input_dir.display());

    // ── Step 2: Ensure the output directory exists ───────────────────────
    log.info(format!(
        "Directory '{}' check...",
        config.output_dir.display()
    ));
    if config.output_dir.is_dir() {
        log.info(format!(
            "Directory '{}' already exists.",
            config.output_dir.display()
        ));
    } else {
        log.info(format!(
            "Directory '{}' does not exist. Creating it now...",
            config.output_dir.display()
        ));
        if let Err(source) = std::fs::create_dir_all(&config.output_dir) {
            log.error(format!(
                "Failed to create '{}' directory: {}",
                config.output_dir.display(),
                source
            ));
            return Err(BatchError::OutputDir {
                path: config.output_dir.clone(),
                source,
            });
        }
    }

    // ── Step 3: Enumerate PDF files ──────────────────────────────────────
    log.info(format!(
        "Checking for PDF files in '{}'...",
        config.input_dir.display()
    ));
    let pdfs = match scan::scan_input_dir(&config.input_dir).await {
        Ok(pdfs) => pdfs,
        Err(e) => {
            log.error(e.to_string());
            return Err(e);
        }
    };

    let mut counters = RunCounters::default();

    if pdfs.is_empty() {
        log.info(format!(
            "No PDF files found in '{}'.",
            config.input_dir.display()
        ));
        log.info("No files to process.");
        return Ok(emit_summary(&mut log, counters, start, false));
    }

    // ── Step 4: Process each PDF file ────────────────────────────────────
    let mut halted = false;

    'files: for pdf in &pdfs {
        // 4a. Rasterize all pages.
        log.info(format!("Converting {} to PNGs...", pdf.display()));
        let pages = match rasterize::rasterize_pdf(pdf, config).await {
            Ok(pages) => pages,
            Err(e) => {
                counters.errors += 1;
                counters.failed += 1;
                log.error(e.to_string());
                log.info(format!(
                    "Processing of {} incomplete due to errors.",
                    pdf.display()
                ));
                if config.error_mode == ErrorMode::Exit {
                    halted = true;
                    break 'files;
                }
                continue 'files;
            }
        };

        // 4b. Conversion succeeded; delete the source PDF per policy.
        // A deletion failure never reverts the conversion accounting.
        match cleanup::delete_pdf(pdf, &config.deletion).await {
            Ok(DeleteOutcome::Deleted) => {
                log.info(format!("Deleting {}... done.", pdf.display()));
            }
            Ok(DeleteOutcome::SkippedByPolicy) => {
                log.info(format!(
                    "Skipping deletion of {} per user option.",
                    pdf.display()
                ));
            }
            Err(e) => {
                counters.errors += 1;
                log.error(e.to_string());
                if config.error_mode == ErrorMode::Exit {
                    counters.failed += 1;
                    halted = true;
                    break 'files;
                }
            }
        }

        // 4c/4d. OCR each page, ascending. A single page failure marks the
        // whole file failed, but sibling pages are still attempted unless
        // exit mode halts the run.
        let mut page_success = 0usize;
        let mut page_fail = 0usize;

        for page in &pages {
            log.info(format!("Converting {} to text...", page.path.display()));
            match extract::extract_text(&page.path, &config.output_dir, config).await {
                Ok(text_file) => {
                    tracing::debug!("wrote {}", text_file.display());
                    page_success += 1;

                    match cleanup::delete_png(&page.path, &config.deletion).await {
                        Ok(DeleteOutcome::Deleted) => {
                            log.info(format!("Deleting {}... done.", page.path.display()));
                        }
                        Ok(DeleteOutcome::SkippedByPolicy) => {
                            log.info(format!(
                                "Skipping deletion of {} per user option.",
                                page.path.display()
                            ));
                        }
                        Err(e) => {
                            counters.errors += 1;
                            log.error(e.to_string());
                            if config.error_mode == ErrorMode::Exit {
                                counters.failed += 1;
                                halted = true;
                                break 'files;
                            }
                        }
                    }
                }
                Err(e) => {
                    counters.errors += 1;
                    page_fail += 1;
                    log.error(e.to_string());
                    log.info(format!(
                        "Skipping deletion of {} due to text conversion failure.",
                        page.path.display()
                    ));
                    if config.error_mode == ErrorMode::Exit {
                        counters.failed += 1;
                        halted = true;
                        break 'files;
                    }
                }
            }
        }

        // 4e. File accounting, once per file.
        if page_fail == 0 && page_success > 0 {
            counters.processed += 1;
            log.info(format!(
                "Successfully processed {} (all {} pages)",
                pdf.display(),
                page_success
            ));
        } else {
            counters.failed += 1;
            log.info(format!(
                "Processing of {} incomplete: {} pages succeeded, {} pages failed",
                pdf.display(),
                page_success,
                page_fail
            ));
        }
    }

    // ── Step 5: Summary (always, even after an exit-mode halt) ───────────
    Ok(emit_summary(&mut log, counters, start, halted))
}

/// Synchronous wrapper around [`run`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_sync(config: &JobConfig) -> Result<Summary, BatchError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| BatchError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(run(config))
}

/// Log the end-of-run summary block and build the [`Summary`].
///
/// Summary lines bypass quiet-mode filtering, and the logger is flushed
/// before returning so even an early-terminated run leaves a complete log.
fn emit_summary(
    log: &mut Logger,
    counters: RunCounters,
    start: Instant,
    halted: bool,
) -> Summary {
    let duration = start.elapsed();

    if halted {
        log.summary("Processing halted after error (exit mode).");
    } else {
        log.summary("Preprocessing complete!");
    }
    log.summary("Summary:");
    log.summary(format!(
        "  Total files successfully processed: {}",
        counters.processed
    ));
    log.summary(format!("  Total files not processed: {}", counters.failed));
    log.summary(format!(
        "  Total errors encountered: {}",
        counters.errors
    ));
    log.summary(format!("  Script duration: {} seconds", duration.as_secs()));
    log.summary(format!(
        "All output has been logged to {}",
        log.path().display()
    ));

    let log_file = log.path().to_path_buf();
    log.flush();

    counters.into_summary(duration, halted, log_file)
}
