//! Full-width/half-width normalization
//!
//! Character scanners rather than regexes: each decision looks at the
//! immediate neighbours of a mark, and the bracket rules need to find the
//! matching close on the same line.

use super::Rewrite;
use crate::classify::is_fullwidth_context;

/// Full-width digits and Latin letters become ASCII
pub(crate) fn halfwidth_alphanumeric(text: &str) -> Rewrite {
    let mut changes = 0;
    let out: String = text
        .chars()
        .map(|c| match c {
            '０'..='９' | 'Ａ'..='Ｚ' | 'ａ'..='ｚ' => {
                changes += 1;
                char::from_u32(c as u32 - 0xFEE0).unwrap_or(c)
            }
            _ => c,
        })
        .collect();
    Rewrite::new(out, changes)
}

fn to_fullwidth(c: char) -> char {
    match c {
        ',' => '，',
        '.' => '。',
        '!' => '！',
        '?' => '？',
        ';' => '；',
        ':' => '：',
        other => other,
    }
}

/// A converted mark must be followed by CJK, whitespace or end of text
fn closes_clause(next: Option<char>) -> bool {
    match next {
        None => true,
        Some(c) => c.is_whitespace() || is_fullwidth_context(c),
    }
}

/// ASCII punctuation after Han or kana becomes full-width
pub(crate) fn fullwidth_punctuation(text: &str) -> Rewrite {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut changes = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let after_cjk = i > 0 && is_fullwidth_context(chars[i - 1]);
        if !after_cjk || !matches!(c, ',' | '.' | '!' | '?' | ';' | ':') {
            out.push(c);
            i += 1;
            continue;
        }

        // Extent of the mark: `!`/`?` runs convert together, dot runs are
        // ellipses and stay as they are.
        let end = match c {
            '!' | '?' => {
                let mut j = i;
                while j < chars.len() && matches!(chars[j], '!' | '?') {
                    j += 1;
                }
                j
            }
            '.' => {
                let mut j = i;
                while j < chars.len() && chars[j] == '.' {
                    j += 1;
                }
                if j - i > 1 {
                    out.extend(&chars[i..j]);
                    i = j;
                    continue;
                }
                j
            }
            _ => i + 1,
        };

        if !closes_clause(chars.get(end).copied()) {
            out.push(c);
            i += 1;
            continue;
        }

        out.extend(chars[i..end].iter().map(|&m| to_fullwidth(m)));
        changes += 1;
        i = end;

        // Full-width marks carry their own spacing
        let mut j = i;
        while j < chars.len() && matches!(chars[j], ' ' | '\t') {
            j += 1;
        }
        if j > i && j < chars.len() && !matches!(chars[j], '\n' | '\r') {
            i = j;
        }
    }

    Rewrite::new(out, changes)
}

fn has_cjk_content(content: &[char]) -> bool {
    content.iter().any(|&c| is_fullwidth_context(c))
}

/// Find the close for `chars[open]` on the same line, rejecting nesting
fn matching_close(chars: &[char], open: usize, open_ch: char, close_ch: char) -> Option<usize> {
    chars[open + 1..]
        .iter()
        .position(|&c| c == open_ch || c == close_ch || c == '\n')
        .map(|offset| open + 1 + offset)
        .filter(|&pos| chars[pos] == close_ch)
}

fn replace_pairs<F>(text: &str, open: (char, char), close: (char, char), allowed: F) -> Rewrite
where
    F: Fn(&[char], usize, usize) -> bool,
{
    let mut chars: Vec<char> = text.chars().collect();
    let mut changes = 0;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != open.0 {
            i += 1;
            continue;
        }
        match matching_close(&chars, i, open.0, close.0) {
            Some(end) if has_cjk_content(&chars[i + 1..end]) && allowed(&chars, i, end) => {
                chars[i] = open.1;
                chars[end] = close.1;
                changes += 1;
                i = end + 1;
            }
            _ => i += 1,
        }
    }

    Rewrite::new(chars.into_iter().collect(), changes)
}

/// `(中文)` becomes `（中文）`, except in a markdown link destination
pub(crate) fn fullwidth_parentheses(text: &str) -> Rewrite {
    replace_pairs(text, ('(', '（'), (')', '）'), |chars, open, _| {
        open == 0 || chars[open - 1] != ']'
    })
}

/// `[中文]` becomes `【中文】`, except in markdown link or reference syntax
pub(crate) fn fullwidth_brackets(text: &str) -> Rewrite {
    replace_pairs(text, ('[', '【'), (']', '】'), |chars, _, close| {
        !matches!(chars.get(close + 1), Some('(' | '[' | ':'))
    })
}
