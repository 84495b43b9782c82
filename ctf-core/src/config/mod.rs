//! Rule configuration
//!
//! A configuration file is a [`ConfigLayer`]. Layers are checked with
//! [`ConfigLayer::validate`] and folded into a [`RuleConfig`] with
//! [`RuleConfig::merge`]; later layers win. Finding the layers on disk is
//! the caller's job.
//!
//! ```toml
//! [rules]
//! ellipsis_normalization = true
//! consecutive_punctuation_limit = 1
//!
//! [[custom_rules]]
//! name = "arrow"
//! pattern = '->'
//! replacement = '→'
//! description = "Unicode arrow"
//! ```

mod validate;

pub use validate::ValidationReport;

use crate::error::ConfigError;
use crate::rules::{CustomRule, Pipeline, RuleKind, RuleSettings};
use serde::{Deserialize, Serialize};

/// File name looked up in the user and project config locations
pub const CONFIG_FILE_NAME: &str = "cjk-text-formatter.toml";

/// A `[[custom_rules]]` entry before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CustomRuleSpec {
    pub name: Option<String>,
    pub pattern: Option<String>,
    pub replacement: Option<String>,
    pub description: Option<String>,
}

/// Value of a `[rules]` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleValue {
    Toggle(bool),
    Limit(u8),
}

/// One parsed configuration source
#[derive(Debug, Clone, Default)]
pub struct ConfigLayer {
    source: String,
    table: toml::Table,
}

impl ConfigLayer {
    /// Parse TOML. Only syntax is checked here; see [`ConfigLayer::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| ConfigError::Syntax(e.message().to_string()))?;
        Ok(Self {
            source: "<string>".to_string(),
            table,
        })
    }

    /// Name used in reports, usually the file path
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn validate(&self) -> ValidationReport {
        validate::interpret(&self.table, &self.source).1
    }
}

/// Parse and validate configuration text in one step
pub fn validate_str(content: &str, source: &str) -> ValidationReport {
    match ConfigLayer::from_toml_str(content) {
        Ok(layer) => layer.with_source(source).validate(),
        Err(e) => ValidationReport::from_error(source, &e),
    }
}

/// Effective configuration: built-in rule settings plus custom rules
#[derive(Debug, Clone, Default)]
pub struct RuleConfig {
    pub settings: RuleSettings,
    pub custom_rules: Vec<CustomRule>,
}

impl RuleConfig {
    /// Apply a layer on top of this configuration
    ///
    /// Rule values in the layer override current ones. A custom rule
    /// replaces an existing one of the same name and is appended otherwise.
    /// An invalid layer changes nothing. On success the report is returned
    /// so callers can surface warnings.
    pub fn merge(&mut self, layer: &ConfigLayer) -> Result<ValidationReport, ConfigError> {
        let (resolved, report) = validate::interpret(&layer.table, &layer.source);
        if !report.is_valid() {
            return Err(ConfigError::Invalid(report.errors));
        }

        for (kind, value) in resolved.rules {
            match value {
                RuleValue::Toggle(on) => self.settings.set_enabled(kind, on),
                RuleValue::Limit(limit) => self.settings.set_punctuation_limit(limit),
            }
        }
        for rule in resolved.custom_rules {
            match self.custom_rules.iter_mut().find(|r| r.name() == rule.name()) {
                Some(existing) => *existing = rule,
                None => self.custom_rules.push(rule),
            }
        }

        log::debug!("merged configuration from {}", layer.source);
        Ok(report)
    }

    /// Switch a rule on or off by name
    ///
    /// Disabling a custom rule removes it.
    pub fn set_rule(&mut self, name: &str, on: bool) -> Result<(), ConfigError> {
        if let Some(kind) = RuleKind::from_name(name) {
            self.settings.set_enabled(kind, on);
            return Ok(());
        }
        match self.custom_rules.iter().position(|r| r.name() == name) {
            Some(index) => {
                if !on {
                    self.custom_rules.remove(index);
                }
                Ok(())
            }
            None => Err(ConfigError::UnknownRule {
                name: name.to_string(),
                valid: RuleKind::names_joined(),
            }),
        }
    }

    /// Compile into a pipeline
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.settings.clone(), self.custom_rules.clone())
    }

    /// Render the effective configuration in the file format
    pub fn to_toml_string(&self) -> String {
        let mut rules = toml::Table::new();
        for kind in RuleKind::ALL {
            let value = if kind.is_numeric() {
                toml::Value::Integer(i64::from(self.settings.punctuation_limit()))
            } else {
                toml::Value::Boolean(self.settings.is_enabled(kind))
            };
            rules.insert(kind.name().to_string(), value);
        }

        let custom: Vec<CustomRuleSpec> = self
            .custom_rules
            .iter()
            .map(|rule| CustomRuleSpec {
                name: Some(rule.name().to_string()),
                pattern: Some(rule.pattern().to_string()),
                replacement: Some(rule.replacement().to_string()),
                description: rule.description().map(str::to_string),
            })
            .collect();

        #[derive(Serialize)]
        struct Document<'a> {
            rules: &'a toml::Table,
            #[serde(skip_serializing_if = "<[_]>::is_empty")]
            custom_rules: &'a [CustomRuleSpec],
        }

        toml::to_string(&Document {
            rules: &rules,
            custom_rules: &custom,
        })
        .unwrap_or_default()
    }
}
