//! Human-readable statistics

use super::StatsFormatter;
use anyhow::Result;
use ctf_core::ChangeStats;
use std::io::Write;

/// One summary line per input, plus a total when there are several
pub struct TextStatsFormatter<W: Write> {
    writer: W,
    files: usize,
}

impl<W: Write> TextStatsFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, files: 0 }
    }
}

impl<W: Write + Send + Sync> StatsFormatter for TextStatsFormatter<W> {
    fn format_file(&mut self, name: &str, stats: &ChangeStats) -> Result<()> {
        writeln!(self.writer, "{}: {}", name, stats.format_summary())?;
        self.files += 1;
        Ok(())
    }

    fn finish(&mut self, total: &ChangeStats) -> Result<()> {
        if self.files > 1 {
            writeln!(
                self.writer,
                "Total ({} files): {}",
                self.files,
                total.format_summary()
            )?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
