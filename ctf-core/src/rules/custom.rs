//! User-defined regex rules

use super::Rewrite;
use crate::error::ConfigError;
use regex::Regex;

/// A regex find/replace rule from configuration
#[derive(Debug, Clone)]
pub struct CustomRule {
    name: String,
    pattern: Regex,
    replacement: String,
    description: Option<String>,
}

impl CustomRule {
    /// Compile a custom rule. `\1`..`\9` in the replacement are accepted
    /// as group references.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        replacement: &str,
        description: Option<String>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            location: name.clone(),
            source: Box::new(e),
        })?;
        Ok(Self {
            name,
            pattern,
            replacement: translate_replacement(replacement),
            description,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Replacement template in `regex` syntax
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the pattern can match without consuming anything
    pub fn matches_empty(&self) -> bool {
        self.pattern.is_match("")
    }

    /// Apply the rule to the whole text, skipping matches that touch a
    /// barrier character
    ///
    /// Matching runs over the full haystack so anchors and word boundaries
    /// see the same context as in unprotected text. A non-empty match that
    /// contains a barrier is dropped, as is an empty match between two
    /// barrier characters.
    pub(crate) fn apply<F>(&self, text: &str, is_barrier: F) -> Rewrite
    where
        F: Fn(char) -> bool,
    {
        let mut out = String::with_capacity(text.len());
        let mut changes = 0;
        let mut copied = 0;

        for caps in self.pattern.captures_iter(text) {
            let Some(found) = caps.get(0) else {
                continue;
            };
            if touches_barrier(text, found.start(), found.end(), &is_barrier) {
                continue;
            }
            out.push_str(&text[copied..found.start()]);
            caps.expand(&self.replacement, &mut out);
            copied = found.end();
            changes += 1;
        }

        if changes == 0 {
            return Rewrite::unchanged(text);
        }
        out.push_str(&text[copied..]);
        Rewrite::new(out, changes)
    }
}

fn touches_barrier<F>(text: &str, start: usize, end: usize, is_barrier: &F) -> bool
where
    F: Fn(char) -> bool,
{
    if start < end {
        return text[start..end].chars().any(is_barrier);
    }
    let before = text[..start].chars().next_back();
    let after = text[start..].chars().next();
    matches!((before, after), (Some(b), Some(a)) if is_barrier(b) && is_barrier(a))
}

/// Rewrite `\N` group references into `${N}`
pub fn translate_replacement(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(&d)) if ('1'..='9').contains(&d) => {
                chars.next();
                out.push_str("${");
                out.push(d);
                out.push('}');
            }
            _ => out.push(c),
        }
    }
    out
}
