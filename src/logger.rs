//! Run logging: timestamped lines to the terminal and an append-only file.
//!
//! ## Why not tracing alone?
//!
//! The log file is a user-facing artifact of the run — a flat, timestamped
//! record that survives the terminal session and can be grepped for
//! `Error:` lines afterwards. Its format (`YYYY-MM-DD HH:MM:SS: <message>`)
//! and its filtering rules are part of the tool's contract, so it is written
//! directly rather than through a tracing subscriber. Library diagnostics
//! still go through [`tracing`] for anyone embedding the crate.
//!
//! ## Filtering rules
//!
//! The file receives **every** line regardless of verbosity, so a quiet run
//! can still be audited afterwards. Quiet mode only filters the terminal,
//! where error lines and the final summary block always print.

use crate::error::BatchError;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Severity of a log line, controlling terminal output in quiet mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Step-by-step progress. Suppressed on the terminal in quiet mode.
    Info,
    /// A failure. Always printed, prefixed with `Error: `.
    Error,
    /// An end-of-run summary line. Always printed.
    Summary,
}

/// Timestamped run logger writing to the terminal and a log file.
///
/// The file is opened once (append mode) when the run starts and flushed on
/// every exit path: explicitly at summary time and again on [`Drop`], so an
/// early halt under exit mode still lands on disk.
pub struct Logger {
    writer: BufWriter<File>,
    path: PathBuf,
    quiet: bool,
}

impl Logger {
    /// Open (or create) the log file in append mode.
    pub fn open(path: impl Into<PathBuf>, quiet: bool) -> Result<Self, BatchError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| BatchError::LogFile {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
            quiet,
        })
    }

    /// Path of the log file this logger writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Log a progress line.
    pub fn info(&mut self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message.as_ref());
    }

    /// Log a failure. The message is prefixed with `Error: ` so failures can
    /// be grepped out of the log file.
    pub fn error(&mut self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, &format!("Error: {}", message.as_ref()));
    }

    /// Log an end-of-run summary line (printed even in quiet mode).
    pub fn summary(&mut self, message: impl AsRef<str>) {
        self.log(LogLevel::Summary, message.as_ref());
    }

    /// Write one timestamped line to the file and, per filtering rules, the
    /// terminal.
    pub fn log(&mut self, level: LogLevel, message: &str) {
        let line = format!("{}: {}", timestamp(), message);

        // A write failure on the log file must not take down the run; the
        // terminal copy still goes out.
        if writeln!(self.writer, "{line}").is_err() {
            tracing::warn!("failed to write to log file {}", self.path.display());
        }

        match level {
            LogLevel::Error => tracing::error!("{message}"),
            _ => tracing::debug!("{message}"),
        }

        if should_print(level, self.quiet) {
            println!("{line}");
        }
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Terminal filtering: quiet mode passes only errors and summary lines.
fn should_print(level: LogLevel, quiet: bool) -> bool {
    !quiet || level != LogLevel::Info
}

/// Current local time as `YYYY-MM-DD HH:MM:SS`.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Default log file name, `preprocess_log_<YYYYMMDD_HHMMSS>.txt`.
pub fn default_log_file_name() -> PathBuf {
    PathBuf::from(format!(
        "preprocess_log_{}.txt",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_suppresses_info_only() {
        assert!(!should_print(LogLevel::Info, true));
        assert!(should_print(LogLevel::Error, true));
        assert!(should_print(LogLevel::Summary, true));
        assert!(should_print(LogLevel::Info, false));
    }

    #[test]
    fn timestamp_format() {
        let ts = timestamp();
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(ts.len(), 19, "got: {ts}");
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
    }

    #[test]
    fn default_log_name_shape() {
        let name = default_log_file_name();
        let s = name.to_string_lossy();
        assert!(s.starts_with("preprocess_log_"), "got: {s}");
        assert!(s.ends_with(".txt"), "got: {s}");
    }

    #[test]
    fn file_receives_all_lines_even_when_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        let mut logger = Logger::open(&path, true).unwrap();
        logger.info("step one");
        logger.error("it broke");
        logger.summary("done");
        logger.flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("step one"));
        assert!(contents.contains("Error: it broke"));
        assert!(contents.contains("done"));
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn appends_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        {
            let mut logger = Logger::open(&path, false).unwrap();
            logger.info("first run");
        } // Drop flushes

        let mut logger = Logger::open(&path, false).unwrap();
        logger.info("second run");
        logger.flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("first run"));
        assert!(contents.contains("second run"));
    }

    #[test]
    fn lines_carry_timestamp_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        let mut logger = Logger::open(&path, false).unwrap();
        logger.info("hello");
        logger.flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        let line = contents.lines().next().unwrap();
        // "YYYY-MM-DD HH:MM:SS: hello"
        assert_eq!(&line[19..21], ": ");
        assert!(line.ends_with("hello"));
    }
}
