//! Configuration validation and interpretation

use super::{CustomRuleSpec, RuleValue};
use crate::error::ConfigError;
use crate::rules::{CustomRule, RuleKind, MAX_PUNCTUATION_LIMIT};
use serde::Serialize;
use std::collections::HashSet;

const KNOWN_SECTIONS: &[&str] = &["rules", "custom_rules"];

/// Outcome of validating one configuration source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub source: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Report holding a single error, e.g. for a file that could not be read
    pub fn from_error(source: impl Into<String>, error: &ConfigError) -> Self {
        let mut report = Self::new(source);
        report.error(error);
        report
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn error(&mut self, error: &ConfigError) {
        self.errors.push(error.to_string());
    }

    pub(crate) fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Human-readable report for the `validate` command
    pub fn format_report(&self) -> String {
        let mut lines = vec![format!("Validating: {}", self.source), String::new()];

        if self.is_valid() && self.warnings.is_empty() {
            lines.push("✓ Configuration is valid".to_string());
            return lines.join("\n");
        }

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            lines.extend(self.errors.iter().map(|e| format!("  ✗ {e}")));
            lines.push(String::new());
        }
        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            lines.extend(self.warnings.iter().map(|w| format!("  ⚠ {w}")));
            lines.push(String::new());
        }
        if self.is_valid() {
            lines.push("✓ Configuration is valid (with warnings)".to_string());
        }

        lines.join("\n")
    }
}

/// Rule values and compiled custom rules read from one layer
#[derive(Debug, Default)]
pub(crate) struct Resolved {
    pub rules: Vec<(RuleKind, RuleValue)>,
    pub custom_rules: Vec<CustomRule>,
}

/// Check a parsed configuration table and extract what it sets
pub(crate) fn interpret(table: &toml::Table, source: &str) -> (Resolved, ValidationReport) {
    let mut report = ValidationReport::new(source);
    let mut resolved = Resolved::default();

    for key in table.keys() {
        if !KNOWN_SECTIONS.contains(&key.as_str()) {
            report.warn(format!("Unknown top-level key '{key}' will be ignored"));
        }
    }

    match table.get("rules") {
        None => {}
        Some(toml::Value::Table(rules)) => {
            for (name, value) in rules {
                match rule_value(name, value) {
                    Ok(entry) => resolved.rules.push(entry),
                    Err(e) => report.error(&e),
                }
            }
        }
        Some(_) => report.error(&ConfigError::SectionType {
            section: "rules",
            expected: "a table",
        }),
    }

    match table.get("custom_rules") {
        None => {}
        Some(toml::Value::Array(entries)) => {
            let mut names = HashSet::new();
            for (i, entry) in entries.iter().enumerate() {
                if let Some(rule) = custom_rule(i, entry, &mut names, &mut report) {
                    resolved.custom_rules.push(rule);
                }
            }
        }
        Some(_) => report.error(&ConfigError::SectionType {
            section: "custom_rules",
            expected: "an array of tables",
        }),
    }

    (resolved, report)
}

fn rule_value(name: &str, value: &toml::Value) -> Result<(RuleKind, RuleValue), ConfigError> {
    let kind = RuleKind::from_name(name).ok_or_else(|| ConfigError::UnknownRule {
        name: name.to_string(),
        valid: RuleKind::names_joined(),
    })?;

    if kind.is_numeric() {
        let limit = value
            .as_integer()
            .and_then(|n| u8::try_from(n).ok())
            .filter(|&n| n <= MAX_PUNCTUATION_LIMIT)
            .ok_or_else(|| ConfigError::InvalidValue {
                rule: name.to_string(),
                reason: format!("expected an integer from 0 to {MAX_PUNCTUATION_LIMIT}"),
            })?;
        return Ok((kind, RuleValue::Limit(limit)));
    }

    value
        .as_bool()
        .map(|on| (kind, RuleValue::Toggle(on)))
        .ok_or_else(|| ConfigError::InvalidValue {
            rule: name.to_string(),
            reason: "expected true or false".to_string(),
        })
}

fn custom_rule(
    index: usize,
    entry: &toml::Value,
    names: &mut HashSet<String>,
    report: &mut ValidationReport,
) -> Option<CustomRule> {
    let location = format!("custom_rules[{index}]");
    if !entry.is_table() {
        report.error(&ConfigError::InvalidEntry {
            location,
            reason: "expected a table".to_string(),
        });
        return None;
    }
    let spec: CustomRuleSpec = match entry.clone().try_into() {
        Ok(spec) => spec,
        Err(e) => {
            report.error(&ConfigError::InvalidEntry {
                location,
                reason: e.to_string(),
            });
            return None;
        }
    };

    let Some(name) = spec.name else {
        report.error(&ConfigError::MissingField {
            location,
            field: "name",
        });
        return None;
    };
    let location = format!("{location} ({name})");

    let mut complete = true;
    if spec.pattern.is_none() {
        report.error(&ConfigError::MissingField {
            location: location.clone(),
            field: "pattern",
        });
        complete = false;
    }
    if spec.replacement.is_none() {
        report.error(&ConfigError::MissingField {
            location: location.clone(),
            field: "replacement",
        });
        complete = false;
    }
    if RuleKind::from_name(&name).is_some() {
        report.error(&ConfigError::ReservedName {
            location: location.clone(),
            name: name.clone(),
        });
        complete = false;
    } else if !names.insert(name.clone()) {
        report.error(&ConfigError::DuplicateName {
            location: location.clone(),
            name: name.clone(),
        });
        complete = false;
    }

    let (Some(pattern), Some(replacement)) = (spec.pattern, spec.replacement) else {
        return None;
    };
    match CustomRule::new(name, &pattern, &replacement, spec.description) {
        Ok(rule) => {
            if rule.matches_empty() {
                report.warn(format!("{location}: Pattern matches the empty string"));
            }
            complete.then_some(rule)
        }
        Err(ConfigError::InvalidPattern { source, .. }) => {
            report.error(&ConfigError::InvalidPattern { location, source });
            None
        }
        Err(e) => {
            report.error(&e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(toml_text: &str) -> (Resolved, ValidationReport) {
        let table: toml::Table = toml::from_str(toml_text).unwrap();
        interpret(&table, "test.toml")
    }

    #[test]
    fn test_valid_rules() {
        let (resolved, report) = check(
            r#"
            [rules]
            quote_spacing = false
            consecutive_punctuation_limit = 2
            "#,
        );
        assert!(report.is_valid(), "{report:?}");
        assert_eq!(resolved.rules.len(), 2);
    }

    #[test]
    fn test_unknown_rule() {
        let (_, report) = check("[rules]\nfake_rule = true\n");
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Unknown rule name: 'fake_rule'. Valid rules: "));
    }

    #[test]
    fn test_wrong_value_types() {
        let (_, report) = check("[rules]\nquote_spacing = 1\nconsecutive_punctuation_limit = 5\n");
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_rules_must_be_table() {
        let (_, report) = check("rules = 3\n");
        assert_eq!(report.errors, vec!["'rules' must be a table"]);
    }

    #[test]
    fn test_custom_rule_missing_fields() {
        let (resolved, report) = check(
            r#"
            [[custom_rules]]
            pattern = "x"
            replacement = "y"

            [[custom_rules]]
            name = "incomplete"
            replacement = "y"
            "#,
        );
        assert!(resolved.custom_rules.is_empty());
        assert_eq!(
            report.errors,
            vec![
                "custom_rules[0]: Missing required field 'name'",
                "custom_rules[1] (incomplete): Missing required field 'pattern'",
            ]
        );
    }

    #[test]
    fn test_custom_rule_invalid_pattern() {
        let (_, report) = check(
            r#"
            [[custom_rules]]
            name = "broken"
            pattern = "[unclosed"
            replacement = ""
            "#,
        );
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("custom_rules[0] (broken): Invalid regex pattern"));
    }

    #[test]
    fn test_custom_rule_names() {
        let (_, report) = check(
            r#"
            [[custom_rules]]
            name = "quote_spacing"
            pattern = "a"
            replacement = "b"

            [[custom_rules]]
            name = "twice"
            pattern = "a"
            replacement = "b"

            [[custom_rules]]
            name = "twice"
            pattern = "c"
            replacement = "d"
            "#,
        );
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].contains("built-in rule name"));
        assert!(report.errors[1].contains("Duplicate rule name 'twice'"));
    }

    #[test]
    fn test_warnings() {
        let (resolved, report) = check(
            r#"
            unknown_section = 1

            [[custom_rules]]
            name = "empty"
            pattern = "x*"
            replacement = "y"
            "#,
        );
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(resolved.custom_rules.len(), 1);
        assert!(report.format_report().contains("with warnings"));
    }

    #[test]
    fn test_format_report() {
        let mut report = ValidationReport::new("cfg.toml");
        assert_eq!(report.format_report(), "Validating: cfg.toml\n\n✓ Configuration is valid");
        report.error(&ConfigError::Syntax("bad".to_string()));
        let text = report.format_report();
        assert!(text.contains("Errors:\n  ✗ TOML syntax error: bad"));
        assert!(!text.contains("✓"));
    }
}
