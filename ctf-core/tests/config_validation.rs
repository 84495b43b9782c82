//! Validation of configuration files

use ctf_core::config::validate_str;
use ctf_core::{ConfigError, ConfigLayer, RuleConfig};

#[test]
fn test_complete_custom_rule_is_accepted() {
    let report = validate_str(
        r#"
        [rules]
        ellipsis_normalization = true
        consecutive_punctuation_limit = 1

        [[custom_rules]]
        name = "arrow"
        pattern = '->'
        replacement = '→'
        description = "Unicode arrow"
        "#,
        "good.toml",
    );
    assert!(report.is_valid(), "{}", report.format_report());
    assert!(report.warnings.is_empty());
    assert_eq!(
        report.format_report(),
        "Validating: good.toml\n\n✓ Configuration is valid"
    );
}

#[test]
fn test_invalid_pattern_is_rejected() {
    let report = validate_str(
        "[[custom_rules]]\nname = \"bad\"\npattern = '(unclosed'\nreplacement = 'x'\n",
        "bad.toml",
    );
    assert!(!report.is_valid());
    let text = report.format_report();
    assert!(text.contains("Errors:"));
    assert!(text.contains("  ✗ custom_rules[0] (bad): Invalid regex pattern"));
}

#[test]
fn test_every_problem_is_reported() {
    let report = validate_str(
        r#"
        extra = "ignored"

        [rules]
        no_such_rule = true
        space_collapsing = "yes"

        [[custom_rules]]
        name = "no_pattern"
        replacement = "x"
        "#,
        "many.toml",
    );
    assert_eq!(report.errors.len(), 3, "{:?}", report.errors);
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn test_syntax_error_report() {
    let report = validate_str("[rules\n", "broken.toml");
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("TOML syntax error: "));
}

#[test]
fn test_merge_rejects_invalid_layer() {
    let layer = ConfigLayer::from_toml_str("[rules]\nfake = true\n")
        .unwrap()
        .with_source("fake.toml");
    let mut config = RuleConfig::default();
    match config.merge(&layer) {
        Err(ConfigError::Invalid(errors)) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("'fake'"));
        }
        other => panic!("expected invalid configuration, got {other:?}"),
    }
}

#[test]
fn test_layers_merge_in_priority_order() {
    let user = ConfigLayer::from_toml_str(
        "[rules]\nquote_spacing = false\n\n[[custom_rules]]\nname = \"a\"\npattern = 'x'\nreplacement = 'y'\n",
    )
    .unwrap();
    let project = ConfigLayer::from_toml_str(
        "[rules]\nquote_spacing = true\n\n[[custom_rules]]\nname = \"b\"\npattern = 'p'\nreplacement = 'q'\n",
    )
    .unwrap();

    let mut config = RuleConfig::default();
    config.merge(&user).unwrap();
    config.merge(&project).unwrap();

    assert_eq!(ctf_core::transform("文本“引用”文本", &config), "文本 “引用” 文本");
    let names: Vec<&str> = config.custom_rules.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["a", "b"]);
}
