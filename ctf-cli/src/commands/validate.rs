//! Validate command implementation

use crate::error::CliError;
use crate::input::FileReader;
use anyhow::Result;
use clap::Args;
use ctf_core::config::validate_str;
use ctf_core::ValidationReport;
use std::path::{Path, PathBuf};

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the configuration file to validate
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        let report = validate_file(&self.file)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", report.format_report());
        }

        if !report.is_valid() {
            return Err(CliError::ConfigError(format!(
                "{} has {} error(s)",
                self.file.display(),
                report.errors.len()
            ))
            .into());
        }
        Ok(())
    }
}

/// Validate a configuration file; a missing file is reported, not raised
pub fn validate_file(path: &Path) -> Result<ValidationReport> {
    let source = path.display().to_string();
    if !path.is_file() {
        let mut report = ValidationReport::new(source.as_str());
        report
            .errors
            .push(format!("Config file not found: {source}"));
        return Ok(report);
    }

    let content = FileReader::read_text(path)?;
    Ok(validate_str(&content, &source))
}
