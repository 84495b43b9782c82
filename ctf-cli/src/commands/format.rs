//! Format command implementation

use crate::config::{ConfigPaths, LoadedConfig};
use crate::error::CliError;
use crate::input::{resolve_inputs, FileReader};
use crate::output::{JsonStatsFormatter, StatsFormatter, TextStatsFormatter};
use crate::progress::{FileStatus, ProgressReporter};
use anyhow::{Context, Result};
use clap::Args;
use ctf_core::{ChangeStats, DocumentFormat, Formatter};
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Arguments for the format command
#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Files, directories or glob patterns (default: read stdin)
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<String>,

    /// Format this text instead of reading input
    #[arg(short, long, value_name = "TEXT", conflicts_with = "inputs")]
    pub text: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["inplace", "dry_run"])]
    pub output: Option<PathBuf>,

    /// Rewrite files in place
    #[arg(short, long, conflicts_with = "dry_run")]
    pub inplace: bool,

    /// Report which files would change without writing them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// File extensions picked up from directories
    #[arg(
        short,
        long = "extension",
        value_name = "EXT",
        default_values = ["txt", "md", "markdown", "html", "htm"]
    )]
    pub extensions: Vec<String>,

    /// Document format (auto detects it from the file extension)
    #[arg(long, value_enum, default_value = "auto")]
    pub format: FormatChoice,

    /// Configuration file applied after the user and project files
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable a rule by name (repeatable)
    #[arg(long, value_name = "RULE")]
    pub enable: Vec<String>,

    /// Disable a rule by name (repeatable)
    #[arg(long, value_name = "RULE")]
    pub disable: Vec<String>,

    /// Maximum run of repeated punctuation to keep (0 turns the rule off)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(0..=2))]
    pub punctuation_limit: Option<u8>,

    /// Print change statistics to stderr
    #[arg(long)]
    pub stats: bool,

    /// Statistics format
    #[arg(long, value_enum, default_value = "text")]
    pub stats_format: StatsFormat,

    /// Number of worker threads (default: number of CPUs)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Document format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatChoice {
    /// Detect from the file extension; stdin and unknown extensions are plain
    Auto,
    /// Format everything
    Plain,
    /// Keep code blocks, inline code and URLs
    Markdown,
    /// Keep tags, comments, entities and pre/code/script/style elements
    Markup,
}

impl FormatChoice {
    /// Concrete format for an input, `None` meaning stdin or a literal
    pub fn resolve(self, path: Option<&Path>) -> DocumentFormat {
        match self {
            FormatChoice::Auto => path.map(DocumentFormat::from_path).unwrap_or_default(),
            FormatChoice::Plain => DocumentFormat::Plain,
            FormatChoice::Markdown => DocumentFormat::Markdown,
            FormatChoice::Markup => DocumentFormat::Markup,
        }
    }
}

/// Supported statistics formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StatsFormat {
    /// One summary line per input
    Text,
    /// A single JSON document
    Json,
}

/// Result of formatting one file in a batch
struct FileOutcome {
    path: PathBuf,
    result: Result<(bool, ChangeStats)>,
}

impl FormatArgs {
    /// Execute the format command
    pub fn execute(&self) -> Result<()> {
        self.init_logging()?;

        log::debug!("Arguments: {:?}", self);

        let loaded = self.load_config(&ConfigPaths::discover()?)?;
        let formatter = Formatter::new(&loaded.config);

        if let Some(text) = &self.text {
            let (formatted, stats) = formatter.format_text(text);
            self.emit(&format!("{formatted}\n"))?;
            return self.report_stats(&[("<text>".to_string(), stats)]);
        }

        if self.inputs.is_empty() {
            let content = FileReader::read_stdin()?;
            let (formatted, stats) = formatter
                .format_document(&content, self.format.resolve(None))
                .context("Failed to format standard input")?;
            self.emit(&formatted)?;
            return self.report_stats(&[("<stdin>".to_string(), stats)]);
        }

        let resolved = resolve_inputs(&self.inputs, self.recursive, &self.extensions)?;
        if self.inplace || self.dry_run {
            return self.run_batch(&formatter, &resolved.files);
        }

        if resolved.had_directory {
            return Err(CliError::UsageError(
                "directories require --inplace or --dry-run".to_string(),
            )
            .into());
        }
        let [path] = resolved.files.as_slice() else {
            return Err(CliError::UsageError(
                "multiple files require --inplace or --dry-run".to_string(),
            )
            .into());
        };

        let content = FileReader::read_text(path)?;
        let (formatted, stats) = formatter
            .format_document(&content, self.format.resolve(Some(path.as_path())))
            .with_context(|| format!("Failed to format {}", path.display()))?;
        self.emit(&formatted)?;
        self.report_stats(&[(path.display().to_string(), stats)])
    }

    /// Fold configuration files and command-line switches
    fn load_config(&self, paths: &ConfigPaths) -> Result<LoadedConfig> {
        let mut loaded = paths.load(self.config.as_deref())?;
        loaded.apply_overrides(&self.enable, &self.disable, self.punctuation_limit)?;
        if loaded.sources.is_empty() {
            log::debug!("No configuration files found, using defaults");
        }
        Ok(loaded)
    }

    /// Write a single result to `--output` or stdout
    fn emit(&self, content: &str) -> Result<()> {
        match &self.output {
            Some(path) => FileReader::write_text(path, content),
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(content.as_bytes())
                    .context("Failed to write to stdout")?;
                stdout.flush().context("Failed to write to stdout")
            }
        }
    }

    fn run_batch(&self, formatter: &Formatter, files: &[PathBuf]) -> Result<()> {
        let threads = self.threads.unwrap_or_else(num_cpus::get).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to create thread pool")?;

        log::info!(
            "Formatting {} file(s) with {} thread(s)",
            files.len(),
            threads
        );

        let show_bar = !self.quiet && files.len() > 1;
        let progress = ProgressReporter::new(files.len(), self.dry_run, show_bar);

        let outcomes: Vec<FileOutcome> = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    let result = self.process_file(formatter, path);
                    let status = match &result {
                        Ok((true, _)) => FileStatus::Changed,
                        Ok((false, _)) => FileStatus::Unchanged,
                        Err(_) => FileStatus::Failed,
                    };
                    progress.record(&path.display().to_string(), status);
                    FileOutcome {
                        path: path.clone(),
                        result,
                    }
                })
                .collect()
        });
        progress.finish();

        let mut stats = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            let name = outcome.path.display().to_string();
            match outcome.result {
                Ok((was_changed, file_stats)) => {
                    if was_changed {
                        if self.dry_run {
                            println!("Would reformat: {name}");
                        } else {
                            log::info!("Formatted {name}");
                        }
                    }
                    stats.push((name, file_stats));
                }
                Err(e) => eprintln!("Error: {name}: {e:#}"),
            }
        }

        if !self.quiet {
            eprintln!("{}", progress.summary());
        }
        self.report_stats(&stats)?;

        let failures = progress.failed();
        if failures > 0 {
            return Err(CliError::ProcessingError(format!(
                "{failures} of {} file(s) failed",
                files.len()
            ))
            .into());
        }
        Ok(())
    }

    /// Format one file, writing it back unless this is a dry run
    fn process_file(&self, formatter: &Formatter, path: &Path) -> Result<(bool, ChangeStats)> {
        let content = FileReader::read_text(path)?;
        let format = self.format.resolve(Some(path));
        log::debug!("{}: formatting as {}", path.display(), format);

        let (formatted, stats) = formatter.format_document(&content, format)?;
        let changed = formatted != content;
        if changed && !self.dry_run {
            FileReader::write_text(path, &formatted)?;
        }
        Ok((changed, stats))
    }

    fn report_stats(&self, entries: &[(String, ChangeStats)]) -> Result<()> {
        if !self.stats {
            return Ok(());
        }

        let mut formatter: Box<dyn StatsFormatter> = match self.stats_format {
            StatsFormat::Text => Box::new(TextStatsFormatter::new(std::io::stderr())),
            StatsFormat::Json => Box::new(JsonStatsFormatter::new(std::io::stderr())),
        };

        let mut total = ChangeStats::default();
        for (name, stats) in entries {
            formatter.format_file(name, stats)?;
            total.absorb(stats);
        }
        formatter.finish(&total)
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> Result<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
                .init();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ctf_core::{RuleConfig, RuleKind};
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        args: FormatArgs,
    }

    fn parse(argv: &[&str]) -> FormatArgs {
        let mut full = vec!["ctf"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).unwrap().args
    }

    fn no_config(dir: &TempDir) -> ConfigPaths {
        ConfigPaths {
            user: None,
            project: dir.path().join("none.toml"),
        }
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert!(args.inputs.is_empty());
        assert_eq!(args.format, FormatChoice::Auto);
        assert_eq!(args.stats_format, StatsFormat::Text);
        assert_eq!(args.extensions, vec!["txt", "md", "markdown", "html", "htm"]);
    }

    #[test]
    fn test_conflicting_flags_are_rejected() {
        assert!(TestCli::try_parse_from(["ctf", "-i", "-n", "a.md"]).is_err());
        assert!(TestCli::try_parse_from(["ctf", "-o", "out.md", "-i", "a.md"]).is_err());
        assert!(TestCli::try_parse_from(["ctf", "--text", "x", "a.md"]).is_err());
        assert!(TestCli::try_parse_from(["ctf", "--punctuation-limit", "3"]).is_err());
    }

    #[test]
    fn test_format_choice_resolution() {
        let md = Path::new("notes.md");
        assert_eq!(FormatChoice::Auto.resolve(Some(md)), DocumentFormat::Markdown);
        assert_eq!(
            FormatChoice::Auto.resolve(Some(Path::new("page.HTML"))),
            DocumentFormat::Markup
        );
        assert_eq!(FormatChoice::Auto.resolve(None), DocumentFormat::Plain);
        assert_eq!(FormatChoice::Plain.resolve(Some(md)), DocumentFormat::Plain);
    }

    #[test]
    fn test_load_config_applies_switches() {
        let dir = TempDir::new().unwrap();
        let args = parse(&["--disable", "dash_conversion", "--punctuation-limit", "2"]);

        let loaded = args.load_config(&no_config(&dir)).unwrap();
        assert!(!loaded.config.settings.is_enabled(RuleKind::DashConversion));
        assert_eq!(loaded.config.settings.punctuation_limit(), 2);
    }

    #[test]
    fn test_load_config_rejects_unknown_rule() {
        let dir = TempDir::new().unwrap();
        let args = parse(&["--enable", "made_up_rule"]);

        assert!(args.load_config(&no_config(&dir)).is_err());
    }

    #[test]
    fn test_process_file_writes_only_when_changed() {
        let dir = TempDir::new().unwrap();
        let messy = dir.path().join("messy.md");
        let clean = dir.path().join("clean.md");
        fs::write(&messy, "中文--更多\n\n`a--b`\n").unwrap();
        fs::write(&clean, "中文 English\n").unwrap();

        let args = parse(&["-i"]);
        let formatter = Formatter::new(&RuleConfig::default());

        let (changed, stats) = args.process_file(&formatter, &messy).unwrap();
        assert!(changed);
        assert_eq!(stats.count("dash_conversion"), 1);
        assert_eq!(fs::read_to_string(&messy).unwrap(), "中文 —— 更多\n\n`a--b`\n");

        let (changed, _) = args.process_file(&formatter, &clean).unwrap();
        assert!(!changed);
    }

    #[test]
    fn test_dry_run_leaves_files_alone() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "中文--更多").unwrap();

        let args = parse(&["-n"]);
        let formatter = Formatter::new(&RuleConfig::default());

        let (changed, _) = args.process_file(&formatter, &file).unwrap();
        assert!(changed);
        assert_eq!(fs::read_to_string(&file).unwrap(), "中文--更多");
    }

    #[test]
    fn test_batch_reports_failures() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("bad.txt");
        fs::write(&good, "中文--更多").unwrap();
        fs::write(&bad, [0xFF, 0xFE]).unwrap();

        let args = parse(&["-i", "-q", "-j", "2"]);
        let formatter = Formatter::new(&RuleConfig::default());

        let err = args.run_batch(&formatter, &[bad, good.clone()]).unwrap_err();
        assert!(err.to_string().contains("1 of 2 file(s) failed"));
        assert_eq!(fs::read_to_string(&good).unwrap(), "中文 —— 更多");
    }
}
