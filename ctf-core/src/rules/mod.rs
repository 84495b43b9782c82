//! Rule engine: built-in typography rules, custom rules and the pipeline
//!
//! Rules run in a fixed order. Each one is a pure `&str -> Rewrite`
//! function that also reports how many rewrites it made. Only
//! `ellipsis_normalization` runs on every text; the others need at least
//! one CJK character in the input.

mod cleanup;
mod custom;
mod dash;
mod ellipsis;
mod patterns;
mod quotes;
mod spacing;
mod width;

pub use custom::{translate_replacement, CustomRule};

use crate::classify::contains_cjk;
use crate::stats::RuleCount;
use std::fmt;

/// Output of a single rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub changes: usize,
}

impl Rewrite {
    pub fn new(text: String, changes: usize) -> Self {
        Self { text, changes }
    }

    /// No changes; the input is returned as is
    pub fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            changes: 0,
        }
    }
}

/// Rule groups shown by `list rules`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Universal,
    Normalization,
    EmDash,
    Quotes,
    Spacing,
    Cleanup,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Universal => "Universal",
            Category::Normalization => "Normalization",
            Category::EmDash => "Em-Dash",
            Category::Quotes => "Quotes",
            Category::Spacing => "Spacing",
            Category::Cleanup => "Cleanup",
        }
    }
}

/// Built-in rules in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    EllipsisNormalization,
    FullwidthAlphanumeric,
    FullwidthPunctuation,
    FullwidthParentheses,
    FullwidthBrackets,
    CjkParenthesisSpacing,
    DashConversion,
    EmdashSpacing,
    QuoteSpacing,
    SingleQuoteSpacing,
    CjkEnglishSpacing,
    CurrencySpacing,
    SlashSpacing,
    ConsecutivePunctuationLimit,
    SpaceCollapsing,
    TrailingSpaceCleanup,
    BlankLineCollapsing,
}

impl RuleKind {
    /// Number of built-in rules
    pub const COUNT: usize = 17;

    /// Every built-in rule, in the order the pipeline applies them
    pub const ALL: [RuleKind; Self::COUNT] = [
        RuleKind::EllipsisNormalization,
        RuleKind::FullwidthAlphanumeric,
        RuleKind::FullwidthPunctuation,
        RuleKind::FullwidthParentheses,
        RuleKind::FullwidthBrackets,
        RuleKind::CjkParenthesisSpacing,
        RuleKind::DashConversion,
        RuleKind::EmdashSpacing,
        RuleKind::QuoteSpacing,
        RuleKind::SingleQuoteSpacing,
        RuleKind::CjkEnglishSpacing,
        RuleKind::CurrencySpacing,
        RuleKind::SlashSpacing,
        RuleKind::ConsecutivePunctuationLimit,
        RuleKind::SpaceCollapsing,
        RuleKind::TrailingSpaceCleanup,
        RuleKind::BlankLineCollapsing,
    ];

    /// Stable configuration name
    pub fn name(self) -> &'static str {
        match self {
            RuleKind::EllipsisNormalization => "ellipsis_normalization",
            RuleKind::FullwidthAlphanumeric => "fullwidth_alphanumeric",
            RuleKind::FullwidthPunctuation => "fullwidth_punctuation",
            RuleKind::FullwidthParentheses => "fullwidth_parentheses",
            RuleKind::FullwidthBrackets => "fullwidth_brackets",
            RuleKind::CjkParenthesisSpacing => "cjk_parenthesis_spacing",
            RuleKind::DashConversion => "dash_conversion",
            RuleKind::EmdashSpacing => "emdash_spacing",
            RuleKind::QuoteSpacing => "quote_spacing",
            RuleKind::SingleQuoteSpacing => "single_quote_spacing",
            RuleKind::CjkEnglishSpacing => "cjk_english_spacing",
            RuleKind::CurrencySpacing => "currency_spacing",
            RuleKind::SlashSpacing => "slash_spacing",
            RuleKind::ConsecutivePunctuationLimit => "consecutive_punctuation_limit",
            RuleKind::SpaceCollapsing => "space_collapsing",
            RuleKind::TrailingSpaceCleanup => "trailing_space_cleanup",
            RuleKind::BlankLineCollapsing => "blank_line_collapsing",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RuleKind::EllipsisNormalization => "Convert spaced ellipsis (. . .) to standard (...)",
            RuleKind::FullwidthAlphanumeric => {
                "Convert full-width letters and digits to half-width"
            }
            RuleKind::FullwidthPunctuation => {
                "Use full-width punctuation (，。！？；：) after CJK characters"
            }
            RuleKind::FullwidthParentheses => "Use full-width parentheses （） around CJK content",
            RuleKind::FullwidthBrackets => "Use lenticular brackets 【】 around CJK content",
            RuleKind::CjkParenthesisSpacing => "Add space between CJK and half-width parentheses",
            RuleKind::DashConversion => "Convert -- between CJK characters to ——",
            RuleKind::EmdashSpacing => "Fix spacing around —— em-dashes",
            RuleKind::QuoteSpacing => "Add spacing around “” quotation marks",
            RuleKind::SingleQuoteSpacing => "Add spacing around ‘’ quotation marks",
            RuleKind::CjkEnglishSpacing => "Add space between CJK and English/numbers",
            RuleKind::CurrencySpacing => "Remove space between currency symbol and amount",
            RuleKind::SlashSpacing => "Remove spaces around slashes",
            RuleKind::ConsecutivePunctuationLimit => {
                "Limit repeated punctuation (0=off, 1=single, 2=double)"
            }
            RuleKind::SpaceCollapsing => "Collapse multiple spaces to single space",
            RuleKind::TrailingSpaceCleanup => "Remove trailing spaces and tabs at line ends",
            RuleKind::BlankLineCollapsing => "Collapse three or more newlines to one blank line",
        }
    }

    pub fn category(self) -> Category {
        match self {
            RuleKind::EllipsisNormalization => Category::Universal,
            RuleKind::FullwidthAlphanumeric
            | RuleKind::FullwidthPunctuation
            | RuleKind::FullwidthParentheses
            | RuleKind::FullwidthBrackets
            | RuleKind::ConsecutivePunctuationLimit => Category::Normalization,
            RuleKind::DashConversion | RuleKind::EmdashSpacing => Category::EmDash,
            RuleKind::QuoteSpacing | RuleKind::SingleQuoteSpacing => Category::Quotes,
            RuleKind::CjkParenthesisSpacing
            | RuleKind::CjkEnglishSpacing
            | RuleKind::CurrencySpacing
            | RuleKind::SlashSpacing => Category::Spacing,
            RuleKind::SpaceCollapsing
            | RuleKind::TrailingSpaceCleanup
            | RuleKind::BlankLineCollapsing => Category::Cleanup,
        }
    }

    /// Whether the rule runs on text without any CJK character
    pub fn is_universal(self) -> bool {
        self.category() == Category::Universal
    }

    /// Whether the rule takes an integer instead of a boolean
    pub fn is_numeric(self) -> bool {
        self == RuleKind::ConsecutivePunctuationLimit
    }

    pub fn default_enabled(self) -> bool {
        !matches!(
            self,
            RuleKind::FullwidthBrackets | RuleKind::ConsecutivePunctuationLimit
        )
    }

    pub fn from_name(name: &str) -> Option<RuleKind> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Comma-separated list of every rule name
    pub fn names_joined() -> String {
        Self::ALL.map(RuleKind::name).join(", ")
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Apply this rule with the given settings
    pub fn apply(self, text: &str, settings: &RuleSettings) -> Rewrite {
        match self {
            RuleKind::EllipsisNormalization => ellipsis::normalize(text),
            RuleKind::FullwidthAlphanumeric => width::halfwidth_alphanumeric(text),
            RuleKind::FullwidthPunctuation => width::fullwidth_punctuation(text),
            RuleKind::FullwidthParentheses => width::fullwidth_parentheses(text),
            RuleKind::FullwidthBrackets => width::fullwidth_brackets(text),
            RuleKind::CjkParenthesisSpacing => spacing::cjk_parenthesis(text),
            RuleKind::DashConversion => dash::convert_dashes(text),
            RuleKind::EmdashSpacing => dash::space_emdashes(text),
            RuleKind::QuoteSpacing => quotes::space_quotes(text, '“', '”'),
            RuleKind::SingleQuoteSpacing => quotes::space_quotes(text, '‘', '’'),
            RuleKind::CjkEnglishSpacing => spacing::cjk_english(text),
            RuleKind::CurrencySpacing => spacing::currency(text),
            RuleKind::SlashSpacing => spacing::slash(text),
            RuleKind::ConsecutivePunctuationLimit => {
                cleanup::limit_punctuation(text, settings.punctuation_limit())
            }
            RuleKind::SpaceCollapsing => spacing::collapse_spaces(text),
            RuleKind::TrailingSpaceCleanup => cleanup::trailing_spaces(text),
            RuleKind::BlankLineCollapsing => cleanup::blank_lines(text),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Highest accepted value for `consecutive_punctuation_limit`
pub const MAX_PUNCTUATION_LIMIT: u8 = 2;

/// Enabled flag per built-in rule plus the punctuation limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSettings {
    enabled: [bool; RuleKind::COUNT],
    punctuation_limit: u8,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            enabled: RuleKind::ALL.map(RuleKind::default_enabled),
            punctuation_limit: 0,
        }
    }
}

impl RuleSettings {
    /// Every rule switched off
    pub fn none() -> Self {
        Self {
            enabled: [false; RuleKind::COUNT],
            punctuation_limit: 0,
        }
    }

    pub fn is_enabled(&self, kind: RuleKind) -> bool {
        if kind.is_numeric() {
            return self.punctuation_limit > 0;
        }
        self.enabled[kind.index()]
    }

    /// Toggle a rule. For the punctuation limit, enabling picks 1 when
    /// the limit is currently 0 and disabling resets it to 0.
    pub fn set_enabled(&mut self, kind: RuleKind, on: bool) {
        if kind.is_numeric() {
            self.punctuation_limit = match (on, self.punctuation_limit) {
                (false, _) => 0,
                (true, 0) => 1,
                (true, n) => n,
            };
        }
        self.enabled[kind.index()] = on;
    }

    pub fn punctuation_limit(&self) -> u8 {
        self.punctuation_limit
    }

    /// Set the punctuation limit, capped at [`MAX_PUNCTUATION_LIMIT`]
    pub fn set_punctuation_limit(&mut self, limit: u8) {
        self.punctuation_limit = limit.min(MAX_PUNCTUATION_LIMIT);
        self.enabled[RuleKind::ConsecutivePunctuationLimit.index()] = self.punctuation_limit > 0;
    }

    /// Enabled rules in pipeline order
    pub fn enabled_rules(&self) -> impl Iterator<Item = RuleKind> + '_ {
        RuleKind::ALL
            .into_iter()
            .filter(move |kind| self.is_enabled(*kind))
    }
}

/// Pipeline output: the rewritten text and per-rule change counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub text: String,
    /// Rules that changed something, in the order they ran
    pub counts: Vec<RuleCount>,
}

/// Ordered rule pipeline
///
/// A pipeline is immutable once built and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    settings: RuleSettings,
    custom_rules: Vec<CustomRule>,
}

impl Pipeline {
    pub fn new(settings: RuleSettings, custom_rules: Vec<CustomRule>) -> Self {
        Self {
            settings,
            custom_rules,
        }
    }

    pub fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    pub fn custom_rules(&self) -> &[CustomRule] {
        &self.custom_rules
    }

    /// Run every enabled rule over the text
    pub fn run(&self, text: &str) -> Outcome {
        self.run_with_barrier(text, |_| false)
    }

    /// Run the pipeline, keeping custom rules away from barrier characters
    ///
    /// Custom patterns match against the whole text, but a match that
    /// contains a barrier character, or an empty match between two of them,
    /// is left alone. Built-in rules never inspect the characters used for
    /// placeholder tokens.
    pub fn run_with_barrier<F>(&self, text: &str, is_barrier: F) -> Outcome
    where
        F: Fn(char) -> bool,
    {
        let mut current = text.to_string();
        let mut counts = Vec::new();
        let mut has_cjk = false;

        for kind in self.settings.enabled_rules() {
            if !kind.is_universal() && !has_cjk {
                // Only ellipsis normalization precedes the CJK rules and it
                // cannot introduce CJK text, so checking once is enough.
                has_cjk = contains_cjk(&current);
                if !has_cjk {
                    log::trace!("no CJK text, skipping CJK rules");
                    break;
                }
            }
            let rewrite = kind.apply(&current, &self.settings);
            if rewrite.changes > 0 {
                log::debug!("{}: {} change(s)", kind.name(), rewrite.changes);
                counts.push(RuleCount::new(kind.name(), rewrite.changes));
                current = rewrite.text;
            }
        }

        for rule in &self.custom_rules {
            let rewrite = rule.apply(&current, &is_barrier);
            if rewrite.changes > 0 {
                log::debug!("{}: {} change(s)", rule.name(), rewrite.changes);
                counts.push(RuleCount::new(rule.name(), rewrite.changes));
                current = rewrite.text;
            }
        }

        Outcome {
            text: current,
            counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_consistent() {
        assert_eq!(RuleKind::ALL.len(), RuleKind::COUNT);
        for (i, kind) in RuleKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i, "{kind} is out of pipeline order");
            assert_eq!(RuleKind::from_name(kind.name()), Some(*kind));
            assert!(!kind.description().is_empty());
        }
        assert_eq!(RuleKind::from_name("no_such_rule"), None);
    }

    #[test]
    fn test_default_settings() {
        let settings = RuleSettings::default();
        assert!(settings.is_enabled(RuleKind::QuoteSpacing));
        assert!(!settings.is_enabled(RuleKind::FullwidthBrackets));
        assert!(!settings.is_enabled(RuleKind::ConsecutivePunctuationLimit));
        assert_eq!(settings.punctuation_limit(), 0);
    }

    #[test]
    fn test_punctuation_limit_toggle() {
        let mut settings = RuleSettings::default();
        settings.set_enabled(RuleKind::ConsecutivePunctuationLimit, true);
        assert_eq!(settings.punctuation_limit(), 1);
        settings.set_punctuation_limit(5);
        assert_eq!(settings.punctuation_limit(), 2);
        settings.set_enabled(RuleKind::ConsecutivePunctuationLimit, false);
        assert!(!settings.is_enabled(RuleKind::ConsecutivePunctuationLimit));
    }

    #[test]
    fn test_non_cjk_text_only_gets_universal_rules() {
        let pipeline = Pipeline::default();
        let outcome = pipeline.run("wait . . . more  spaces");
        assert_eq!(outcome.text, "wait... more  spaces");
        assert_eq!(outcome.counts.len(), 1);
        assert_eq!(outcome.counts[0].rule, "ellipsis_normalization");
    }

    #[test]
    fn test_pipeline_order_and_counts() {
        let pipeline = Pipeline::default();
        let outcome = pipeline.run("中文--更多English");
        assert_eq!(outcome.text, "中文 —— 更多 English");
        let rules: Vec<&str> = outcome.counts.iter().map(|c| c.rule.as_str()).collect();
        assert_eq!(rules, vec!["dash_conversion", "cjk_english_spacing"]);
    }

    #[test]
    fn test_disabled_rule_is_skipped() {
        let mut settings = RuleSettings::default();
        settings.set_enabled(RuleKind::CjkEnglishSpacing, false);
        let outcome = Pipeline::new(settings, Vec::new()).run("文本English混合");
        assert_eq!(outcome.text, "文本English混合");
        assert!(outcome.counts.is_empty());
    }

    #[test]
    fn test_custom_rules_see_builtin_output() {
        let rule = CustomRule::new("spaced_dash", " —— ", "——", None).unwrap();
        let pipeline = Pipeline::new(RuleSettings::default(), vec![rule]);
        let outcome = pipeline.run("中文--更多");
        assert_eq!(outcome.text, "中文——更多");
        assert_eq!(outcome.counts.last().unwrap().rule, "spaced_dash");
    }

    #[test]
    fn test_pipeline_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }
}
