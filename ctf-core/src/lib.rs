//! Typography normalization for mixed CJK and Latin text
//!
//! The crate applies an ordered pipeline of context-sensitive rewrite rules
//! (spacing between CJK and Latin, full-width punctuation, dash and ellipsis
//! normalization, quote spacing) to text, while keeping code blocks,
//! inline code and markup byte-for-byte intact.
//!
//! # Architecture
//!
//! - [`classify`]: code-point tables shared by every rule
//! - [`rules`]: built-in rules, custom regex rules and the [`Pipeline`]
//! - [`preserve`]: region extraction and placeholder tokens per [`DocumentFormat`]
//! - [`config`]: TOML schema, layered merge and validation
//! - [`stats`]: per-rule change counts
//!
//! # Example
//!
//! ```rust
//! use ctf_core::{protect_and_transform, transform, DocumentFormat, RuleConfig};
//!
//! let config = RuleConfig::default();
//! assert_eq!(transform("文本English混合", &config), "文本 English 混合");
//!
//! let doc = "中文--更多\n\n`text--more`\n";
//! let out = protect_and_transform(doc, DocumentFormat::Markdown, &config).unwrap();
//! assert_eq!(out, "中文 —— 更多\n\n`text--more`\n");
//! ```

pub mod classify;
pub mod config;
pub mod error;
mod formatter;
pub mod preserve;
pub mod rules;
pub mod stats;

pub use config::{ConfigLayer, RuleConfig, ValidationReport, CONFIG_FILE_NAME};
pub use error::{ConfigError, Error, PreserveError, Result};
pub use formatter::{
    protect_and_transform, protect_and_transform_verbose, transform, transform_verbose, Formatter,
};
pub use preserve::DocumentFormat;
pub use rules::{Category, CustomRule, Pipeline, RuleKind, RuleSettings};
pub use stats::{ChangeStats, RuleCount};
