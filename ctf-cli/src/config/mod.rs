//! Configuration discovery and layering
//!
//! Layers are applied in order: built-in defaults, the user file
//! (`~/.config/cjk-text-formatter.toml`), the project file
//! (`./cjk-text-formatter.toml`), an explicit `--config` file, and finally
//! `--enable`/`--disable` switches from the command line.

use crate::error::CliError;
use crate::input::FileReader;
use anyhow::{Context, Result};
use ctf_core::{ConfigError, ConfigLayer, RuleConfig, CONFIG_FILE_NAME};
use std::path::{Path, PathBuf};

/// Annotated example configuration shipped with the binary
pub const EXAMPLE_CONFIG: &str = include_str!("../../configs/cjk-text-formatter.toml.example");

/// Where configuration files are looked up
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// User-level file, if a home directory is known
    pub user: Option<PathBuf>,
    /// Project-level file in the working directory
    pub project: PathBuf,
}

impl ConfigPaths {
    /// Paths for the current user and working directory
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        Ok(Self {
            user: dirs::home_dir().map(|home| home.join(".config").join(CONFIG_FILE_NAME)),
            project: cwd.join(CONFIG_FILE_NAME),
        })
    }

    /// User file path, failing when no home directory is known
    pub fn user_path(&self) -> Result<&Path> {
        self.user
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine the home directory"))
    }

    /// Fold every existing layer into a configuration
    pub fn load(&self, explicit: Option<&Path>) -> Result<LoadedConfig> {
        let mut loaded = LoadedConfig::default();

        if let Some(user) = &self.user {
            if user.is_file() {
                loaded.apply_file(user)?;
            }
        }
        if self.project.is_file() {
            loaded.apply_file(&self.project)?;
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(CliError::FileNotFound(path.display().to_string()).into());
            }
            loaded.apply_file(path)?;
        }

        Ok(loaded)
    }
}

/// Effective configuration and the files it came from
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: RuleConfig,
    pub sources: Vec<PathBuf>,
}

impl LoadedConfig {
    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let content = FileReader::read_text(path)?;
        let source = path.display().to_string();

        let layer = ConfigLayer::from_toml_str(&content)
            .map(|layer| layer.with_source(source.clone()))
            .map_err(|e| CliError::ConfigError(format!("{source}: {e}")))?;
        let report = self.config.merge(&layer).map_err(|e| match e {
            ConfigError::Invalid(errors) => {
                CliError::ConfigError(format!("{source}:\n  {}", errors.join("\n  ")))
            }
            other => CliError::ConfigError(format!("{source}: {other}")),
        })?;

        for warning in &report.warnings {
            log::warn!("{source}: {warning}");
        }
        log::info!("Loaded configuration from {source}");
        self.sources.push(path.to_path_buf());
        Ok(())
    }

    /// Apply command-line switches on top of the file layers
    pub fn apply_overrides(
        &mut self,
        enable: &[String],
        disable: &[String],
        punctuation_limit: Option<u8>,
    ) -> Result<()> {
        for name in enable {
            self.config
                .set_rule(name, true)
                .map_err(|e| CliError::ConfigError(e.to_string()))?;
        }
        for name in disable {
            self.config
                .set_rule(name, false)
                .map_err(|e| CliError::ConfigError(e.to_string()))?;
        }
        if let Some(limit) = punctuation_limit {
            self.config.settings.set_punctuation_limit(limit);
        }
        Ok(())
    }
}
