//! ctf CLI library
//!
//! This library provides the command-line interface for the CJK text
//! formatter: argument parsing, layered configuration discovery, input
//! resolution and parallel file processing on top of `ctf-core`.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
