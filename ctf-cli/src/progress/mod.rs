//! Batch progress and outcome tally

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What happened to one file in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Changed,
    Unchanged,
    Failed,
}

/// Progress bar plus per-status counters for a batch run
///
/// Shared by reference across rayon workers; counters are atomic so
/// `record` only needs `&self`. The bar is optional, the tally is not.
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    dry_run: bool,
    total: usize,
    changed: AtomicUsize,
    failed: AtomicUsize,
}

impl ProgressReporter {
    /// Tally for `total` files, drawing a bar only when `show_bar` is set
    pub fn new(total: usize, dry_run: bool, show_bar: bool) -> Self {
        let progress_bar = show_bar.then(|| {
            let pb = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files {msg}")
            {
                pb.set_style(style.progress_chars("##-"));
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        Self {
            progress_bar,
            dry_run,
            total,
            changed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    /// Count a finished file and advance the bar
    pub fn record(&self, filename: &str, status: FileStatus) {
        match status {
            FileStatus::Changed => {
                self.changed.fetch_add(1, Ordering::Relaxed);
            }
            FileStatus::Failed => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
            FileStatus::Unchanged => {}
        }

        if let Some(pb) = &self.progress_bar {
            let mark = match status {
                FileStatus::Changed if self.dry_run => "would change",
                FileStatus::Changed => "changed",
                FileStatus::Unchanged => "ok",
                FileStatus::Failed => "failed",
            };
            pb.set_message(format!("{filename} ({mark})"));
            pb.inc(1);
        }
    }

    pub fn changed(&self) -> usize {
        self.changed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    /// Closing line for stderr
    pub fn summary(&self) -> String {
        let mut line = if self.dry_run {
            format!(
                "{} of {} file(s) would be reformatted",
                self.changed(),
                self.total
            )
        } else {
            format!("Formatted {} of {} file(s)", self.changed(), self.total)
        };
        if self.failed() > 0 {
            line.push_str(&format!(", {} failed", self.failed()));
        }
        line
    }

    /// Finish the bar, if any
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("{} changed", self.changed()));
        }
    }
}
