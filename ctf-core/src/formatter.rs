//! Formatting entry points

use crate::config::RuleConfig;
use crate::error::Result;
use crate::preserve::{protect, DocumentFormat};
use crate::rules::Pipeline;
use crate::stats::ChangeStats;

/// A compiled, reusable formatter
///
/// Holds no mutable state, so one instance can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    pipeline: Pipeline,
}

impl Formatter {
    pub fn new(config: &RuleConfig) -> Self {
        Self {
            pipeline: config.pipeline(),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Format literal text; surrounding whitespace is trimmed
    pub fn format_text(&self, text: &str) -> (String, ChangeStats) {
        let outcome = self.pipeline.run(text);
        let formatted = outcome.text.trim().to_string();
        let stats = ChangeStats::new(text, formatted.as_str(), outcome.counts);
        (formatted, stats)
    }

    /// Format a document, leaving its protected regions untouched
    ///
    /// Unlike [`Formatter::format_text`] the result is not trimmed, so a
    /// trailing newline survives.
    pub fn format_document(
        &self,
        text: &str,
        format: DocumentFormat,
    ) -> Result<(String, ChangeStats)> {
        let protected = protect(text, format)?;
        let outcome = self
            .pipeline
            .run_with_barrier(protected.text(), |c| protected.is_token_char(c));

        let restored = protected.restore(&outcome.text);
        debug_assert!(
            restored.is_ok(),
            "placeholder tokens were damaged: {:?}",
            restored.as_ref().err()
        );
        let formatted = restored?;

        let stats = ChangeStats::new(text, formatted.as_str(), outcome.counts);
        Ok((formatted, stats))
    }
}

/// Apply the configured rules to literal text
pub fn transform(text: &str, config: &RuleConfig) -> String {
    Formatter::new(config).format_text(text).0
}

/// [`transform`] plus per-rule change counts
pub fn transform_verbose(text: &str, config: &RuleConfig) -> (String, ChangeStats) {
    Formatter::new(config).format_text(text)
}

/// Apply the configured rules to a document, shielding code and markup
pub fn protect_and_transform(
    text: &str,
    format: DocumentFormat,
    config: &RuleConfig,
) -> Result<String> {
    Formatter::new(config)
        .format_document(text, format)
        .map(|(formatted, _)| formatted)
}

/// [`protect_and_transform`] plus per-rule change counts
pub fn protect_and_transform_verbose(
    text: &str,
    format: DocumentFormat,
    config: &RuleConfig,
) -> Result<(String, ChangeStats)> {
    Formatter::new(config).format_document(text, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLayer;

    #[test]
    fn test_transform_trims() {
        let config = RuleConfig::default();
        assert_eq!(transform("  文本English混合  \n", &config), "文本 English 混合");
    }

    #[test]
    fn test_transform_verbose_counts() {
        let (text, stats) = transform_verbose("wait . . . more", &RuleConfig::default());
        assert_eq!(text, "wait... more");
        assert_eq!(stats.count("ellipsis_normalization"), 1);
        assert_eq!(stats.before, "wait . . . more");
        assert_eq!(stats.after, "wait... more");
    }

    #[test]
    fn test_document_keeps_trailing_newline_and_code() {
        let doc = "中文--更多\n\n```\ntext--more 中文--更多\n```\n";
        let out = protect_and_transform(doc, DocumentFormat::Markdown, &RuleConfig::default())
            .unwrap();
        assert_eq!(out, "中文 —— 更多\n\n```\ntext--more 中文--更多\n```\n");
    }

    #[test]
    fn test_custom_rule_cannot_touch_tokens() {
        let mut config = RuleConfig::default();
        let layer = ConfigLayer::from_toml_str(
            "[[custom_rules]]\nname = \"everything\"\npattern = '[^\\n]'\nreplacement = 'x'\n",
        )
        .unwrap();
        config.merge(&layer).unwrap();

        let out = protect_and_transform("ab`code`cd", DocumentFormat::Markdown, &config).unwrap();
        assert_eq!(out, "xx`code`xx");
    }

    #[test]
    fn test_formatter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Formatter>();
    }
}
