//! Config command implementations

use crate::config::{ConfigPaths, EXAMPLE_CONFIG};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration after merging every layer
    Show {
        /// Configuration file applied after the user and project files
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Print where configuration files are looked up
    Where,

    /// Print an annotated example configuration
    Example,

    /// Write the example configuration to the project or user location
    Init(InitArgs),
}

/// Arguments for `config init`
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to the user location instead of the working directory
    #[arg(long)]
    pub global: bool,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl ConfigCommands {
    /// Execute the config subcommand
    pub fn execute(&self) -> Result<()> {
        let paths = ConfigPaths::discover()?;
        match self {
            ConfigCommands::Show { config } => {
                print!("{}", show(&paths, config.as_deref())?);
                Ok(())
            }
            ConfigCommands::Where => {
                print!("{}", describe_locations(&paths));
                Ok(())
            }
            ConfigCommands::Example => {
                print!("{EXAMPLE_CONFIG}");
                Ok(())
            }
            ConfigCommands::Init(args) => {
                let target = if args.global {
                    paths.user_path()?.to_path_buf()
                } else {
                    paths.project.clone()
                };
                init(&target, args.force)?;
                println!("✓ Created config file: {}", target.display());
                println!();
                println!("Validate it after editing:");
                println!("   ctf validate {}", target.display());
                Ok(())
            }
        }
    }
}

fn show(paths: &ConfigPaths, explicit: Option<&Path>) -> Result<String> {
    let loaded = paths.load(explicit)?;

    let mut out = String::new();
    if loaded.sources.is_empty() {
        out.push_str("# No configuration files found; built-in defaults\n");
    } else {
        out.push_str("# Merged from:\n");
        for source in &loaded.sources {
            out.push_str(&format!("#   {}\n", source.display()));
        }
    }
    out.push('\n');
    out.push_str(&loaded.config.to_toml_string());
    Ok(out)
}

fn describe_locations(paths: &ConfigPaths) -> String {
    let status = |path: &Path| if path.is_file() { "found" } else { "not found" };

    let mut out = String::from("Configuration files, lowest priority first:\n");
    match &paths.user {
        Some(user) => out.push_str(&format!(
            "  user:    {} ({})\n",
            user.display(),
            status(user)
        )),
        None => out.push_str("  user:    (no home directory)\n"),
    }
    out.push_str(&format!(
        "  project: {} ({})\n",
        paths.project.display(),
        status(&paths.project)
    ));
    out.push_str("  --config FILE overrides both; --enable/--disable apply last\n");
    out
}

fn init(target: &Path, force: bool) -> Result<()> {
    if target.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            target.display()
        );
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(target, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write to {}", target.display()))
}
