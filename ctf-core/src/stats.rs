//! Per-rule change statistics

use serde::{Deserialize, Serialize};

/// Number of rewrites one rule made
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCount {
    pub rule: String,
    pub count: usize,
}

impl RuleCount {
    pub fn new(rule: impl Into<String>, count: usize) -> Self {
        Self {
            rule: rule.into(),
            count,
        }
    }
}

/// What a formatting run changed
///
/// Counts keep the order in which rules first reported a change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeStats {
    pub before: String,
    pub after: String,
    pub counts: Vec<RuleCount>,
}

impl ChangeStats {
    pub fn new(before: impl Into<String>, after: impl Into<String>, counts: Vec<RuleCount>) -> Self {
        let mut stats = Self {
            before: before.into(),
            after: after.into(),
            counts: Vec::with_capacity(counts.len()),
        };
        for entry in counts {
            stats.record(&entry.rule, entry.count);
        }
        stats
    }

    /// Add `count` changes for `rule`
    pub fn record(&mut self, rule: &str, count: usize) {
        if count == 0 {
            return;
        }
        match self.counts.iter_mut().find(|c| c.rule == rule) {
            Some(existing) => existing.count += count,
            None => self.counts.push(RuleCount::new(rule, count)),
        }
    }

    /// Fold another run's counts into this one
    pub fn absorb(&mut self, other: &ChangeStats) {
        for entry in &other.counts {
            self.record(&entry.rule, entry.count);
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }

    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }

    /// Changes made by one rule, zero if it never fired
    pub fn count(&self, rule: &str) -> usize {
        self.counts
            .iter()
            .find(|c| c.rule == rule)
            .map_or(0, |c| c.count)
    }

    /// One-line summary, e.g. `Changes: 2 ellipsis normalization, 1 dash conversion`
    pub fn format_summary(&self) -> String {
        if !self.has_changes() {
            return "No changes made".to_string();
        }
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|c| format!("{} {}", c.count, c.rule.replace('_', " ")))
            .collect();
        format!("Changes: {}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = ChangeStats::default();
        assert_eq!(stats.total(), 0);
        assert!(!stats.has_changes());
        assert_eq!(stats.format_summary(), "No changes made");
    }

    #[test]
    fn test_summary_keeps_order() {
        let stats = ChangeStats::new(
            "a",
            "b",
            vec![
                RuleCount::new("ellipsis_normalization", 2),
                RuleCount::new("dash_conversion", 1),
            ],
        );
        assert_eq!(
            stats.format_summary(),
            "Changes: 2 ellipsis normalization, 1 dash conversion"
        );
        assert_eq!(stats.count("dash_conversion"), 1);
        assert_eq!(stats.count("quote_spacing"), 0);
    }

    #[test]
    fn test_absorb_merges_counts() {
        let mut total = ChangeStats::default();
        let run = ChangeStats::new("", "", vec![RuleCount::new("space_collapsing", 3)]);
        total.absorb(&run);
        total.absorb(&run);
        assert_eq!(total.count("space_collapsing"), 6);
        assert_eq!(total.counts.len(), 1);
    }

    #[test]
    fn test_serializes_to_json() {
        let stats = ChangeStats::new("x", "y", vec![RuleCount::new("quote_spacing", 1)]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["counts"][0]["rule"], "quote_spacing");
        assert_eq!(json["counts"][0]["count"], 1);
    }
}
