//! Change-statistics output

use anyhow::Result;
use ctf_core::ChangeStats;

/// Trait for statistics formatters
pub trait StatsFormatter: Send + Sync {
    /// Record the statistics of one formatted input
    fn format_file(&mut self, name: &str, stats: &ChangeStats) -> Result<()>;

    /// Emit totals and flush
    fn finish(&mut self, total: &ChangeStats) -> Result<()>;
}

pub mod json;
pub mod text;

pub use json::JsonStatsFormatter;
pub use text::TextStatsFormatter;
