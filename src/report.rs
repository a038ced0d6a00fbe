//! Run accounting: the mutable counters owned by the loop and the immutable
//! summary handed back to the caller.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Mutable outcome accumulator, owned by the orchestration loop.
///
/// Incremented as files succeed or fail, read once at end-of-run to
/// produce the [`Summary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Files whose every page produced a text file.
    pub processed: u64,
    /// Files with at least one failed stage. A single page failure marks
    /// the whole source PDF as failed; there is no partial success.
    pub failed: u64,
    /// Total individual errors (rasterization, extraction, deletion).
    /// Can exceed `failed` when one file accumulates several errors.
    pub errors: u64,
}

impl RunCounters {
    /// Fold the counters into a summary.
    pub fn into_summary(self, duration: Duration, halted: bool, log_file: PathBuf) -> Summary {
        Summary {
            processed: self.processed,
            failed: self.failed,
            errors: self.errors,
            duration_secs: duration.as_secs(),
            halted,
            log_file,
        }
    }
}

/// End-of-run summary.
///
/// Always produced, even when exit mode halted the run early — partial
/// results are still results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Files fully processed (every page OCR'd).
    pub processed: u64,
    /// Files not processed or only partially processed.
    pub failed: u64,
    /// Total errors encountered across all stages.
    pub errors: u64,
    /// Wall-clock duration of the run in whole seconds.
    pub duration_secs: u64,
    /// True when exit mode stopped the loop before all files were attempted.
    pub halted: bool,
    /// Where the run log was written.
    pub log_file: PathBuf,
}
