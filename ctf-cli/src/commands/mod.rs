//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;

pub mod config;
pub mod format;
pub mod list;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Format files, directories, glob patterns, a literal or stdin
    Format(format::FormatArgs),

    /// Validate a configuration file
    Validate(validate::ValidateArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },

    /// Inspect or create configuration files
    Config {
        #[command(subcommand)]
        subcommand: config::ConfigCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List built-in rules with category, default and description
    Rules,

    /// List document formats and their file extensions
    Formats,
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Format(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::List { subcommand } => match subcommand {
                ListCommands::Rules => list::list_rules(),
                ListCommands::Formats => list::list_formats(),
            },
            Commands::Config { subcommand } => subcommand.execute(),
        }
    }
}
