//! Code and markup survive formatting untouched

use ctf_core::preserve::protect;
use ctf_core::{protect_and_transform, ConfigLayer, DocumentFormat, RuleConfig};
use proptest::prelude::*;

fn markdown(text: &str) -> String {
    protect_and_transform(text, DocumentFormat::Markdown, &RuleConfig::default()).unwrap()
}

fn markup(text: &str) -> String {
    protect_and_transform(text, DocumentFormat::Markup, &RuleConfig::default()).unwrap()
}

fn is_private_use(c: char) -> bool {
    matches!(c as u32, 0xE000..=0xF8FF | 0xF0000..=0xFFFFD | 0x100000..=0x10FFFD)
}

#[test]
fn test_fenced_code_is_preserved() {
    let doc = "说明--如下\n\n```bash\necho text--more 中文English\n```\n";
    assert_eq!(
        markdown(doc),
        "说明 —— 如下\n\n```bash\necho text--more 中文English\n```\n"
    );
}

#[test]
fn test_inline_code_and_urls_are_preserved() {
    let doc = "使用`a--b`命令，访问https://example.com/中文--x页面\n";
    let out = markdown(doc);
    assert!(out.contains("`a--b`"));
    assert!(out.contains("https://example.com/"));
}

#[test]
fn test_indented_code_is_preserved() {
    let doc = "示例:\n\n    let x = a--b;  // 中文English\n\n结束\n";
    let out = markdown(doc);
    assert!(out.starts_with("示例："));
    assert!(out.contains("\n    let x = a--b;  // 中文English\n"));
}

#[test]
fn test_plain_format_formats_everything() {
    let out = protect_and_transform("`中文English`", DocumentFormat::Plain, &RuleConfig::default())
        .unwrap();
    assert_eq!(out, "`中文 English`");
}

#[test]
fn test_markup_text_is_formatted_but_tags_are_not() {
    let doc = "<p title=\"中文English\">中文English</p>\n<pre>中文--更多</pre>\n";
    assert_eq!(
        markup(doc),
        "<p title=\"中文English\">中文 English</p>\n<pre>中文--更多</pre>\n"
    );
}

#[test]
fn test_markup_entities_and_scripts() {
    let doc = "<script>let s = \"中文--更多\";</script><p>A&amp;B中文</p>";
    let out = markup(doc);
    assert!(out.starts_with("<script>let s = \"中文--更多\";</script>"));
    assert!(out.ends_with("<p>A&amp;B 中文</p>"));
}

#[test]
fn test_private_use_input_does_not_collide() {
    let doc = "\u{E000}\u{E010}中文English `x`\n";
    assert_eq!(markdown(doc), "\u{E000}\u{E010}中文 English `x`\n");
}

#[test]
fn test_regions_are_reported_in_order() {
    let protected = protect("a `b` c\n```\nd\n```", DocumentFormat::Markdown).unwrap();
    assert_eq!(protected.regions(), &["`b`".to_string(), "```\nd\n```".to_string()]);
}

fn with_custom_rule(pattern: &str, replacement: &str) -> RuleConfig {
    let layer = ConfigLayer::from_toml_str(&format!(
        "[[custom_rules]]\nname = \"custom\"\npattern = '{pattern}'\nreplacement = '{replacement}'\n"
    ))
    .unwrap();
    let mut config = RuleConfig::default();
    config.merge(&layer).unwrap();
    config
}

#[test]
fn test_empty_matching_custom_rule_keeps_inline_code() {
    let config = with_custom_rule("(?m)^", "> ");
    let out = protect_and_transform("see `x` and y\n", DocumentFormat::Markdown, &config).unwrap();
    assert!(out.starts_with("> see `x` and y\n"), "{out:?}");

    let config = with_custom_rule("x*", "-");
    let out = protect_and_transform("a `b` c\n", DocumentFormat::Markdown, &config).unwrap();
    assert!(out.contains("`b`"), "{out:?}");
    assert!(!out.chars().any(is_private_use));
}

#[test]
fn test_custom_anchor_ignores_protected_region_edges() {
    let config = with_custom_rule("(?m)^see", "SEE");
    let doc = "`x`see\nsee\n";
    for format in [DocumentFormat::Markdown, DocumentFormat::Plain] {
        assert_eq!(
            protect_and_transform(doc, format, &config).unwrap(),
            "`x`see\nSEE\n",
            "{format}"
        );
    }
}

proptest! {
    #[test]
    fn prop_inline_code_survives(
        prefix in "[a-z中文 ]{0,10}",
        code in "[^`\n]{1,20}",
        suffix in "[a-z中文 ]{0,10}",
    ) {
        let doc = format!("{prefix}`{code}`{suffix}");
        let out = markdown(&doc);
        let span = format!("`{code}`");
        prop_assert!(out.contains(&span), "{:?} lost {:?}", out, span);
    }

    #[test]
    fn prop_fenced_block_survives(
        lines in prop::collection::vec("[^`~\n\r]{0,30}", 1..5),
    ) {
        let block = format!("```\n{}\n```", lines.join("\n"));
        let doc = format!("前文--后文\n\n{block}\n");
        let out = markdown(&doc);
        prop_assert!(out.contains(&block));
    }

    #[test]
    fn prop_no_token_leaks(doc in r"[a-z中文`~ \n\-—“”.,!?()<>&;/]{0,80}") {
        for format in DocumentFormat::ALL {
            let out = protect_and_transform(&doc, format, &RuleConfig::default());
            prop_assert!(out.is_ok());
            let out = out.unwrap();
            prop_assert!(!out.chars().any(is_private_use), "token leaked into {:?}", out);
        }
    }
}
