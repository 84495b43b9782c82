//! Compiled pattern registry shared by the regex-based rules

use crate::classify::cjk_class_body;
use regex::Regex;
use std::sync::OnceLock;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Latin token that stays glued together when spaced against CJK:
/// optional currency prefix, alphanumerics, optional unit or currency code.
const LATIN_TOKEN: &str =
    r"(?:[$¥€£₹] ?)?[A-Za-z0-9]+(?:[%‰℃℉]|°[CcFf]?| ?(?:USD|CNY|EUR|GBP|RMB))?";

pub(crate) struct Patterns {
    pub ellipsis_run: Regex,
    pub ellipsis_follow: Regex,
    pub cjk_paren_open: Regex,
    pub cjk_paren_close: Regex,
    pub cjk_then_latin: Regex,
    pub latin_then_cjk: Regex,
    pub currency_gap: Regex,
    pub space_run: Regex,
    pub trailing_space: Regex,
    pub blank_lines: Regex,
}

fn build(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("built-in pattern {pattern:?} is invalid: {e}"))
}

impl Patterns {
    fn compile() -> Self {
        let cjk = cjk_class_body();
        Self {
            ellipsis_run: build(r"(?P<lead>[ \t]*)(?P<run>\.(?:[ \t]*\.){2,})"),
            ellipsis_follow: build(&format!(r"\.\.\.(?P<gap>[ \t]*)(?P<next>[A-Za-z0-9{cjk}])")),
            cjk_paren_open: build(&format!(r"([{cjk}])\(")),
            cjk_paren_close: build(&format!(r"\)([{cjk}])")),
            cjk_then_latin: build(&format!(r"([{cjk}])({LATIN_TOKEN})")),
            latin_then_cjk: build(&format!(r"({LATIN_TOKEN})([{cjk}])")),
            currency_gap: build(r"([$¥€£₹])[ \t]+([0-9])"),
            space_run: build(r"(\S)[ \t]{2,}"),
            trailing_space: build(r"(?m)[ \t]+(\r?)$"),
            blank_lines: build(r"(\r?\n){3,}"),
        }
    }
}

/// Process-wide compiled patterns
pub(crate) fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(Patterns::compile)
}
