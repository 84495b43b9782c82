//! Dash conversion and em-dash spacing

use super::Rewrite;
use crate::classify::{is_cjk, is_cjk_bracket, EM_DASH, EM_DASH_PAIR};

/// A dash run together with the horizontal whitespace around it
struct DashSite {
    /// First whitespace char before the run
    start: usize,
    /// One past the last whitespace char after the run
    end: usize,
    /// Nearest character before `start` on the same line
    left: Option<char>,
    /// Nearest character at `end` on the same line
    right: Option<char>,
}

fn is_horizontal_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Locate the site around the run `chars[run_start..run_end]`, never
/// reaching back before `floor`.
fn site(chars: &[char], run_start: usize, run_end: usize, floor: usize) -> DashSite {
    let mut start = run_start;
    while start > floor && is_horizontal_space(chars[start - 1]) {
        start -= 1;
    }
    let mut end = run_end;
    while end < chars.len() && is_horizontal_space(chars[end]) {
        end += 1;
    }
    let left = start
        .checked_sub(1)
        .map(|i| chars[i])
        .filter(|&c| !is_line_break(c));
    let right = chars.get(end).copied().filter(|&c| !is_line_break(c));
    DashSite {
        start,
        end,
        left,
        right,
    }
}

fn run_end(chars: &[char], start: usize, dash: char) -> usize {
    let mut end = start;
    while end < chars.len() && chars[end] == dash {
        end += 1;
    }
    end
}

/// The dash with one space on each side that does not touch a CJK
/// bracket. A side at a line edge keeps its original whitespace.
fn spaced_dash(chars: &[char], site: &DashSite, run: (usize, usize), dash: &str) -> String {
    let mut out = String::new();
    match site.left {
        None => out.extend(&chars[site.start..run.0]),
        Some(c) if !is_cjk_bracket(c) => out.push(' '),
        Some(_) => {}
    }
    out.push_str(dash);
    match site.right {
        None => out.extend(&chars[run.1..site.end]),
        Some(c) if !is_cjk_bracket(c) => out.push(' '),
        Some(_) => {}
    }
    out
}

/// Walk every run of `dash` of length two or more and let `rewrite`
/// decide the replacement for the run and its surrounding whitespace.
fn rewrite_runs<F>(text: &str, dash: char, rewrite: F) -> Rewrite
where
    F: Fn(&[char], &DashSite, (usize, usize)) -> Option<String>,
{
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut changes = 0;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != dash {
            i += 1;
            continue;
        }
        let end = run_end(&chars, i, dash);
        if end - i < 2 {
            i = end;
            continue;
        }
        let site = site(&chars, i, end, copied);
        if let Some(replacement) = rewrite(&chars, &site, (i, end)) {
            let original: String = chars[site.start..site.end].iter().collect();
            if replacement != original {
                out.extend(&chars[copied..site.start]);
                out.push_str(&replacement);
                copied = site.end;
                changes += 1;
            }
        }
        i = site.end.max(end);
    }

    out.extend(&chars[copied..]);
    Rewrite::new(out, changes)
}

fn is_dash_anchor(c: char) -> bool {
    is_cjk(c) || is_cjk_bracket(c)
}

/// `--` between CJK text becomes `——`
pub(crate) fn convert_dashes(text: &str) -> Rewrite {
    rewrite_runs(text, '-', |chars, site, run| match (site.left, site.right) {
        (Some(l), Some(r)) if is_dash_anchor(l) && is_dash_anchor(r) => {
            Some(spaced_dash(chars, site, run, EM_DASH_PAIR))
        }
        _ => None,
    })
}

/// Normalize the spacing around existing em-dash runs
pub(crate) fn space_emdashes(text: &str) -> Rewrite {
    rewrite_runs(text, EM_DASH, |chars, site, run| {
        let dash: String = chars[run.0..run.1].iter().collect();
        Some(spaced_dash(chars, site, run, &dash))
    })
}
