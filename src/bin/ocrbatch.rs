//! CLI binary for ocrbatch.
//!
//! A thin shim over the library crate that maps CLI flags to `JobConfig`
//! and prints the run summary.

use anyhow::{Context, Result};
use clap::Parser;
use ocrbatch::{run, DeletionPolicy, ErrorMode, JobConfig};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Process PDFs in the current directory with default settings
  ocrbatch

  # Process PDFs from './pdfs', write text files to './text'
  ocrbatch -i ./pdfs -o ./text

  # Quiet mode, custom log file
  ocrbatch -q -l errors.log

  # Keep the source PDFs, delete intermediate PNGs
  ocrbatch -k

  # Keep all files (PDFs and PNGs)
  ocrbatch -n

  # Stop the whole batch at the first failure
  ocrbatch --on-error exit

  # All options combined
  ocrbatch -i pdfs -o text -q -l mylog.txt -n --dpi 200 --lang deu

EXTERNAL TOOLS:
  Rasterizer   ImageMagick `convert` (override with --rasterizer), invoked as
               convert -density <dpi> <pdf> -quality <q> <basename>-%d.png
  OCR engine   `tesseract` (override with --ocr), invoked as
               tesseract <image> <output-base> -l <lang> txt

  Both must be on PATH. On Debian/Ubuntu:
    sudo apt install imagemagick tesseract-ocr

FILES:
  One text file per page lands in the output directory as
  <basename>-<page>.txt (pages are zero-indexed). A timestamped log of the
  run is appended to the log file (default: preprocess_log_<timestamp>.txt).

EXIT STATUS:
  0  run completed, even if some files failed (continue mode)
  1  run halted early on first error (--on-error exit), or a fatal setup
     error (missing input directory, unwritable output directory)
"#;

/// Batch-convert multi-page PDFs to per-page text files.
#[derive(Parser, Debug)]
#[command(
    name = "ocrbatch",
    version,
    about = "Batch-convert multi-page PDFs to per-page text via ImageMagick and Tesseract",
    long_about = "Preprocess multi-page PDF files by rasterising them to PNGs and extracting \
text with an external OCR engine. Processes all pages of each PDF, logs progress and errors \
to a timestamped log file, and prints a summary of results.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing PDF files to process.
    #[arg(short, long, env = "OCRBATCH_INPUT_DIR", default_value = ".")]
    input_dir: PathBuf,

    /// Directory where extracted text files will be saved.
    #[arg(short, long, env = "OCRBATCH_OUTPUT_DIR", default_value = "extracted-text")]
    output_dir: PathBuf,

    /// Limit terminal output to errors and the final summary.
    #[arg(short, long, env = "OCRBATCH_QUIET")]
    quiet: bool,

    /// Custom log file name (default: preprocess_log_<timestamp>.txt).
    #[arg(short, long, env = "OCRBATCH_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Prevent deletion of original PDF files.
    #[arg(short, long)]
    keep_pdfs: bool,

    /// Prevent deletion of intermediate PNG files.
    #[arg(short = 'p', long)]
    keep_pngs: bool,

    /// Prevent deletion of any files; overrides --keep-pdfs and --keep-pngs.
    #[arg(short, long)]
    no_delete: bool,

    /// What to do when a file fails: keep going or halt the batch.
    #[arg(long, value_enum, env = "OCRBATCH_ON_ERROR", default_value = "continue")]
    on_error: OnErrorArg,

    /// Rasterization density in DPI (72–600).
    #[arg(long, env = "OCRBATCH_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// OCR language passed to the extractor.
    #[arg(long, env = "OCRBATCH_LANG", default_value = "eng")]
    lang: String,

    /// Rasterizer program name or path.
    #[arg(long, env = "OCRBATCH_RASTERIZER", default_value = "convert")]
    rasterizer: String,

    /// OCR program name or path.
    #[arg(long, env = "OCRBATCH_OCR", default_value = "tesseract")]
    ocr: String,

    /// Print the run summary as JSON to stdout.
    #[arg(long, env = "OCRBATCH_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs on stderr.
    #[arg(short, long, env = "OCRBATCH_VERBOSE")]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OnErrorArg {
    Continue,
    Exit,
}

impl From<OnErrorArg> for ErrorMode {
    fn from(v: OnErrorArg) -> Self {
        match v {
            OnErrorArg::Continue => ErrorMode::Continue,
            OnErrorArg::Exit => ErrorMode::Exit,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The run log (terminal + file) is the user-facing output; tracing is
    // diagnostics only, so it defaults to errors on stderr.
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli).context("Invalid configuration")?;

    // ── Run the batch ────────────────────────────────────────────────────
    let summary = run(&config).await.context("Batch run failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    }

    // Completed runs exit 0 even with logged errors; only an exit-mode halt
    // is distinguished.
    Ok(if summary.halted {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

/// Map CLI args to `JobConfig`.
fn build_config(cli: &Cli) -> Result<JobConfig> {
    let mut builder = JobConfig::builder()
        .input_dir(&cli.input_dir)
        .output_dir(&cli.output_dir)
        .quiet(cli.quiet)
        .deletion(DeletionPolicy {
            keep_pdfs: cli.keep_pdfs,
            keep_pngs: cli.keep_pngs,
            no_delete: cli.no_delete,
        })
        .error_mode(cli.on_error.into())
        .density(cli.dpi)
        .lang(cli.lang.as_str())
        .rasterizer_program(cli.rasterizer.as_str())
        .ocr_program(cli.ocr.as_str());

    if let Some(ref path) = cli.log_file {
        builder = builder.log_file(path);
    }

    Ok(builder.build()?)
}
