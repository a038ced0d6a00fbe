//! End-to-end tests for the batch orchestration loop.
//!
//! The two external tools are replaced with stub shell scripts so the tests
//! exercise the real loop (spawning, exit-status checks, output discovery,
//! deletion policy, counters) without requiring ImageMagick or Tesseract.
//! The stubs honour the same argument conventions as the real tools:
//!
//!   rasterizer: <prog> -density <dpi> <pdf> -quality <q> <stem>-%d.png
//!   ocr:        <prog> <image> <out-base> -l <lang> txt
//!
//! A PDF whose name contains `bad` makes the rasterizer stub exit 1.

#![cfg(unix)]

use ocrbatch::{run, DeletionPolicy, ErrorMode, JobConfig};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn write_stub(path: &Path, body: &str) {
    std::fs::write(path, body).unwrap();
    let mut perms = std::fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).unwrap();
}

/// A stub rasterizer producing `pages` empty PNGs per PDF.
/// Exits 1 for any PDF whose path contains `bad`.
fn rasterizer_stub(tools: &Path, pages: usize) -> PathBuf {
    let path = tools.join("stub-convert");
    let body = format!(
        "#!/bin/sh\n\
         pdf=\"$3\"\n\
         pattern=\"$6\"\n\
         case \"${{pdf##*/}}\" in *bad*) exit 1 ;; esac\n\
         i=0\n\
         while [ \"$i\" -lt {pages} ]; do\n\
         : > \"$(printf \"$pattern\" \"$i\")\"\n\
         i=$((i+1))\n\
         done\n"
    );
    write_stub(&path, &body);
    path
}

/// A stub OCR tool writing one line of text per image.
/// `fail_suffix` makes it exit 1 for images whose path ends with it.
fn ocr_stub(tools: &Path, fail_suffix: Option<&str>) -> PathBuf {
    let path = tools.join("stub-tesseract");
    let fail_case = match fail_suffix {
        Some(s) => format!("case \"$1\" in *{s}) exit 1 ;; esac\n"),
        None => String::new(),
    };
    let body = format!(
        "#!/bin/sh\n\
         {fail_case}\
         printf 'ocr text for %s\\n' \"$1\" > \"$2.txt\"\n"
    );
    write_stub(&path, &body);
    path
}

struct Fixture {
    _root: TempDir,
    input: PathBuf,
    output: PathBuf,
    log: PathBuf,
    rasterizer: PathBuf,
    ocr: PathBuf,
}

impl Fixture {
    /// A fixture with stub tools: `pages` PNGs per PDF, OCR failing on
    /// images ending in `ocr_fail_suffix` (if any).
    fn new(pages: usize, ocr_fail_suffix: Option<&str>) -> Self {
        let root = TempDir::new().unwrap();
        let input = root.path().join("input");
        let output = root.path().join("extracted-text");
        let tools = root.path().join("tools");
        std::fs::create_dir(&input).unwrap();
        std::fs::create_dir(&tools).unwrap();

        Self {
            rasterizer: rasterizer_stub(&tools, pages),
            ocr: ocr_stub(&tools, ocr_fail_suffix),
            log: root.path().join("run.log"),
            _root: root,
            input,
            output,
        }
    }

    fn add_pdf(&self, name: &str) -> PathBuf {
        let p = self.input.join(name);
        std::fs::write(&p, b"%PDF-1.4 stub").unwrap();
        p
    }

    fn config(&self) -> ocrbatch::JobConfigBuilder {
        JobConfig::builder()
            .input_dir(&self.input)
            .output_dir(&self.output)
            .log_file(&self.log)
            .rasterizer_program(self.rasterizer.to_string_lossy())
            .ocr_program(self.ocr.to_string_lossy())
    }

    fn log_contents(&self) -> String {
        std::fs::read_to_string(&self.log).unwrap()
    }

    fn remaining_pngs(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.input)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".png"))
            .collect();
        names.sort();
        names
    }
}

// ── Empty input ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_input_dir_completes_with_zero_counters() {
    let fx = Fixture::new(1, None);

    let summary = run(&fx.config().build().unwrap()).await.unwrap();

    assert_eq!(summary.processed, 0);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.errors, 0);
    assert!(!summary.halted);

    let log = fx.log_contents();
    assert!(log.contains("No PDF files found"), "log was:\n{log}");
    assert!(log.contains("Summary:"));
}

#[tokio::test]
async fn missing_input_dir_is_fatal() {
    let fx = Fixture::new(1, None);
    let config = fx
        .config()
        .input_dir("/definitely/not/a/real/dir")
        .build()
        .unwrap();

    let result = run(&config).await;
    assert!(result.is_err());
}

// ── Happy path ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn multi_page_pdf_produces_one_text_file_per_page() {
    let fx = Fixture::new(3, None);
    let pdf = fx.add_pdf("doc.pdf");

    let summary = run(&fx.config().build().unwrap()).await.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.errors, 0);

    for n in 0..3 {
        let txt = fx.output.join(format!("doc-{n}.txt"));
        assert!(txt.is_file(), "missing {}", txt.display());
    }
    // Default deletion policy removes the source and intermediates.
    assert!(!pdf.exists(), "source PDF should be deleted by default");
    assert!(fx.remaining_pngs().is_empty(), "PNGs should be deleted");
}

#[tokio::test]
async fn existing_output_dir_is_reused() {
    let fx = Fixture::new(1, None);
    std::fs::create_dir_all(&fx.output).unwrap();
    fx.add_pdf("doc.pdf");

    let summary = run(&fx.config().build().unwrap()).await.unwrap();

    assert_eq!(summary.processed, 1);
    assert!(fx.log_contents().contains("already exists"));
}

// ── Deletion policy ──────────────────────────────────────────────────────────

#[tokio::test]
async fn keep_pdfs_preserves_sources() {
    let fx = Fixture::new(2, None);
    let pdf = fx.add_pdf("doc.pdf");

    let config = fx
        .config()
        .deletion(DeletionPolicy {
            keep_pdfs: true,
            keep_pngs: false,
            no_delete: false,
        })
        .build()
        .unwrap();
    let summary = run(&config).await.unwrap();

    assert_eq!(summary.processed, 1);
    assert!(pdf.exists(), "--keep-pdfs must preserve the source");
    assert!(fx.remaining_pngs().is_empty(), "PNGs still deleted");
}

#[tokio::test]
async fn keep_pngs_preserves_intermediates() {
    let fx = Fixture::new(2, None);
    let pdf = fx.add_pdf("doc.pdf");

    let config = fx
        .config()
        .deletion(DeletionPolicy {
            keep_pdfs: false,
            keep_pngs: true,
            no_delete: false,
        })
        .build()
        .unwrap();
    run(&config).await.unwrap();

    assert!(!pdf.exists(), "PDF still deleted");
    assert_eq!(fx.remaining_pngs(), vec!["doc-0.png", "doc-1.png"]);
}

#[tokio::test]
async fn no_delete_preserves_everything() {
    let fx = Fixture::new(2, None);
    let pdf = fx.add_pdf("doc.pdf");

    let config = fx
        .config()
        .deletion(DeletionPolicy {
            keep_pdfs: false,
            keep_pngs: false,
            no_delete: true,
        })
        .build()
        .unwrap();
    let summary = run(&config).await.unwrap();

    assert_eq!(summary.processed, 1);
    assert!(pdf.exists());
    assert_eq!(fx.remaining_pngs(), vec!["doc-0.png", "doc-1.png"]);
    assert!(fx.log_contents().contains("per user option"));
}

// ── Error handling modes ─────────────────────────────────────────────────────

#[tokio::test]
async fn continue_mode_attempts_every_file() {
    let fx = Fixture::new(2, None);
    fx.add_pdf("a-bad.pdf"); // sorts first, rasterizer stub fails on it
    fx.add_pdf("b.pdf");

    let summary = run(&fx.config().build().unwrap()).await.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 1);
    assert!(summary.errors >= 1);
    assert!(!summary.halted);

    assert!(fx.output.join("b-0.txt").is_file());
    assert!(fx.output.join("b-1.txt").is_file());

    let log = fx.log_contents();
    assert!(log.contains("Error:"), "log was:\n{log}");
}

#[tokio::test]
async fn exit_mode_halts_after_first_failure() {
    let fx = Fixture::new(2, None);
    let bad = fx.add_pdf("a-bad.pdf");
    let good = fx.add_pdf("b.pdf");

    let config = fx.config().error_mode(ErrorMode::Exit).build().unwrap();
    let summary = run(&config).await.unwrap();

    assert!(summary.halted);
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.failed, 1);

    // B was never attempted.
    assert!(good.exists());
    assert!(!fx.output.join("b-0.txt").exists());
    assert!(bad.exists(), "failed PDF is never deleted");

    // The summary is still logged after the halt.
    let log = fx.log_contents();
    assert!(log.contains("Summary:"), "log was:\n{log}");
    assert!(log.contains("Total files not processed: 1"));
}

#[tokio::test]
async fn page_failure_marks_file_failed_but_siblings_continue() {
    // OCR fails on page 0; page 1 must still be attempted.
    let fx = Fixture::new(2, Some("-0.png"));
    fx.add_pdf("doc.pdf");

    let summary = run(&fx.config().build().unwrap()).await.unwrap();

    assert_eq!(summary.processed, 0, "one bad page fails the whole file");
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors, 1);

    assert!(!fx.output.join("doc-0.txt").exists());
    assert!(
        fx.output.join("doc-1.txt").is_file(),
        "sibling pages continue after a page failure"
    );

    // The failed page's image is kept; the successful page's is deleted.
    assert_eq!(fx.remaining_pngs(), vec!["doc-0.png"]);
}

#[tokio::test]
async fn exit_mode_page_failure_halts_whole_run() {
    let fx = Fixture::new(2, Some("-0.png"));
    fx.add_pdf("a.pdf");
    fx.add_pdf("b.pdf");

    let config = fx.config().error_mode(ErrorMode::Exit).build().unwrap();
    let summary = run(&config).await.unwrap();

    assert!(summary.halted);
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.failed, 1);

    // Neither A's sibling page nor B was attempted.
    assert!(!fx.output.join("a-1.txt").exists());
    assert!(!fx.output.join("b-0.txt").exists());
}

// ── Logging ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn quiet_mode_still_writes_full_log_file() {
    let fx = Fixture::new(1, None);
    fx.add_pdf("doc.pdf");

    let config = fx.config().quiet(true).build().unwrap();
    let summary = run(&config).await.unwrap();

    assert_eq!(summary.processed, 1);
    let log = fx.log_contents();
    // Quiet filters the terminal only; every stage still lands in the file.
    assert!(log.contains("Converting"), "log was:\n{log}");
    assert!(log.contains("Summary:"));
}

#[tokio::test]
async fn summary_reports_counts_and_log_destination() {
    let fx = Fixture::new(1, None);
    fx.add_pdf("x.pdf");
    fx.add_pdf("y.pdf");

    let summary = run(&fx.config().build().unwrap()).await.unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.log_file, fx.log);

    let log = fx.log_contents();
    assert!(log.contains("Total files successfully processed: 2"));
    assert!(log.contains("Total errors encountered: 0"));
    assert!(log.contains("Script duration:"));
    assert!(log.contains(&fx.log.display().to_string()));
}

// ── Ordering ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn files_are_processed_in_sorted_order() {
    let fx = Fixture::new(1, None);
    fx.add_pdf("zeta.pdf");
    fx.add_pdf("alpha.pdf");

    run(&fx.config().build().unwrap()).await.unwrap();

    let log = fx.log_contents();
    let alpha = log.find("alpha.pdf").expect("alpha logged");
    let zeta = log.find("zeta.pdf").expect("zeta logged");
    assert!(alpha < zeta, "alpha must be processed before zeta");
}

// ── Sync wrapper ─────────────────────────────────────────────────────────────

#[test]
fn run_sync_works_without_a_runtime() {
    let fx = Fixture::new(1, None);
    fx.add_pdf("doc.pdf");

    let summary = ocrbatch::run_sync(&fx.config().build().unwrap()).unwrap();
    assert_eq!(summary.processed, 1);
}
