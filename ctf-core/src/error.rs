//! Error types for the formatter core
//!
//! Transformation itself never fails. Errors come from two places only:
//! configuration that does not validate, and a preservation round-trip
//! that does not restore cleanly.

use thiserror::Error;

/// Configuration loading or validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("TOML syntax error: {0}")]
    Syntax(String),

    /// A section has the wrong TOML type
    #[error("'{section}' must be {expected}")]
    SectionType {
        section: &'static str,
        expected: &'static str,
    },

    /// Rule name not in the built-in catalog
    #[error("Unknown rule name: '{name}'. Valid rules: {valid}")]
    UnknownRule { name: String, valid: String },

    /// Rule value of the wrong type or out of range
    #[error("Invalid value for rule '{rule}': {reason}")]
    InvalidValue { rule: String, reason: String },

    /// A custom rule entry has the wrong shape
    #[error("{location}: {reason}")]
    InvalidEntry { location: String, reason: String },

    /// A custom rule lacks a required field
    #[error("{location}: Missing required field '{field}'")]
    MissingField {
        location: String,
        field: &'static str,
    },

    /// A custom rule pattern does not compile
    #[error("{location}: Invalid regex pattern: {source}")]
    InvalidPattern {
        location: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// Two custom rules in one file share a name
    #[error("{location}: Duplicate rule name '{name}'")]
    DuplicateName { location: String, name: String },

    /// Custom rule named after a built-in rule
    #[error("{location}: '{name}' is a built-in rule name")]
    ReservedName { location: String, name: String },

    /// The configuration failed validation
    #[error("Configuration is invalid: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Content preservation errors
///
/// Every variant other than [`PreserveError::AlphabetExhausted`] means a
/// placeholder token was lost or damaged between protect and restore.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreserveError {
    /// The document uses every private-use block a token could be built from
    #[error("no free private-use block for placeholder tokens")]
    AlphabetExhausted,

    /// A region was never restored
    #[error("placeholder for region {index} is missing from the transformed text")]
    MissingRegion { index: usize },

    /// A region token appeared twice
    #[error("placeholder for region {index} appears more than once")]
    DuplicateRegion { index: usize },

    /// A token referenced a region that does not exist
    #[error("placeholder refers to unknown region {index}")]
    UnknownRegion { index: usize },

    /// Token characters were found outside a well-formed token
    #[error("malformed placeholder at byte {offset}")]
    MalformedToken { offset: usize },
}

/// Umbrella error for the public API
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Preservation error
    #[error("content preservation failed: {0}")]
    Preserve(#[from] PreserveError),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_rule_display() {
        let err = ConfigError::UnknownRule {
            name: "fake_rule".to_string(),
            valid: "a, b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown rule name: 'fake_rule'. Valid rules: a, b"
        );
    }

    #[test]
    fn test_missing_field_display() {
        let err = ConfigError::MissingField {
            location: "custom_rules[0] (incomplete)".to_string(),
            field: "pattern",
        };
        assert_eq!(
            err.to_string(),
            "custom_rules[0] (incomplete): Missing required field 'pattern'"
        );
    }

    #[test]
    fn test_preserve_error_converts() {
        let err: Error = PreserveError::MissingRegion { index: 3 }.into();
        assert!(err.to_string().contains("region 3"));
    }
}
