//! JSON statistics

use super::StatsFormatter;
use anyhow::Result;
use ctf_core::{ChangeStats, RuleCount};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON formatter - collects every input and writes one document at the end
pub struct JsonStatsFormatter<W: Write> {
    writer: W,
    files: Vec<FileStats>,
}

/// Statistics of one input
#[derive(Debug, Serialize, Deserialize)]
pub struct FileStats {
    pub name: String,
    pub total_changes: usize,
    pub counts: Vec<RuleCount>,
}

/// Complete JSON report
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsReport {
    pub files: Vec<FileStats>,
    pub total_changes: usize,
    pub counts: Vec<RuleCount>,
}

impl<W: Write> JsonStatsFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            files: Vec::new(),
        }
    }
}

impl<W: Write + Send + Sync> StatsFormatter for JsonStatsFormatter<W> {
    fn format_file(&mut self, name: &str, stats: &ChangeStats) -> Result<()> {
        self.files.push(FileStats {
            name: name.to_string(),
            total_changes: stats.total(),
            counts: stats.counts.clone(),
        });
        Ok(())
    }

    fn finish(&mut self, total: &ChangeStats) -> Result<()> {
        let report = StatsReport {
            files: std::mem::take(&mut self.files),
            total_changes: total.total(),
            counts: total.counts.clone(),
        };
        serde_json::to_writer_pretty(&mut self.writer, &report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_shape() {
        let mut buffer = Vec::new();
        {
            let mut formatter = JsonStatsFormatter::new(&mut buffer);
            let stats = ChangeStats::new(
                "中文--更多",
                "中文 —— 更多",
                vec![RuleCount::new("dash_conversion", 1)],
            );
            formatter.format_file("a.md", &stats).unwrap();
            formatter.finish(&stats).unwrap();
        }

        let report: StatsReport = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].name, "a.md");
        assert_eq!(report.files[0].total_changes, 1);
        assert_eq!(report.total_changes, 1);
        assert_eq!(report.counts[0].rule, "dash_conversion");
    }

    #[test]
    fn test_texts_are_not_serialized() {
        let mut buffer = Vec::new();
        {
            let mut formatter = JsonStatsFormatter::new(&mut buffer);
            let stats = ChangeStats::new("secret before", "secret after", Vec::new());
            formatter.format_file("a.md", &stats).unwrap();
            formatter.finish(&stats).unwrap();
        }
        let output = String::from_utf8(buffer).unwrap();
        assert!(!output.contains("secret"));
    }
}
