//! Ellipsis normalization

use super::patterns::patterns;
use super::Rewrite;
use regex::Captures;

/// Collapse spaced or overlong dot runs to `...` and put one space after
/// an ellipsis that runs into a word.
pub(crate) fn normalize(text: &str) -> Rewrite {
    let p = patterns();
    let mut changes = 0;

    let collapsed = p.ellipsis_run.replace_all(text, |caps: &Captures| {
        let whole = &caps[0];
        let lead = &caps["lead"];
        let run = &caps["run"];
        let spaced = run.contains([' ', '\t']);
        let replacement = if spaced {
            "...".to_string()
        } else {
            format!("{lead}...")
        };
        if replacement != whole {
            changes += 1;
        }
        replacement
    });

    let spaced = p.ellipsis_follow.replace_all(&collapsed, |caps: &Captures| {
        if &caps["gap"] != " " {
            changes += 1;
        }
        format!("... {}", &caps["next"])
    });

    Rewrite::new(spaced.into_owned(), changes)
}
