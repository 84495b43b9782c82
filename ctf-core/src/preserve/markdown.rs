//! Markdown region detection
//!
//! One pass over the lines of the original document. Block constructs
//! (fenced and indented code) are recognised first; prose lines are then
//! scanned for inline code spans and bare URLs. Returned ranges are byte
//! offsets, sorted and non-overlapping, and never include the newline that
//! ends a block.

use std::ops::Range;

/// A line of the document: `start..end` excludes the line terminator
#[derive(Debug, Clone, Copy)]
struct Line {
    start: usize,
    end: usize,
}

fn split_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (pos, b) in text.bytes().enumerate() {
        if b == b'\n' {
            let end = if pos > start && text.as_bytes()[pos - 1] == b'\r' {
                pos - 1
            } else {
                pos
            };
            lines.push(Line { start, end });
            start = pos + 1;
        }
    }
    if start < text.len() {
        lines.push(Line {
            start,
            end: text.len(),
        });
    }
    lines
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Leading indentation in columns, tabs counting as four
fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for b in line.bytes() {
        match b {
            b' ' => width += 1,
            b'\t' => width += 4 - width % 4,
            _ => break,
        }
    }
    width
}

fn is_indented(line: &str) -> bool {
    !is_blank(line) && indent_width(line) >= 4
}

/// An opening or closing fence: `(fence char, run length)`
fn fence(line: &str) -> Option<(u8, usize)> {
    if indent_width(line) > 3 {
        return None;
    }
    let rest = line.trim_start_matches(' ');
    let ch = *rest.as_bytes().first()?;
    if ch != b'`' && ch != b'~' {
        return None;
    }
    let len = rest.bytes().take_while(|&b| b == ch).count();
    if len < 3 {
        return None;
    }
    // A backtick fence's info string may not contain backticks
    if ch == b'`' && rest[len..].contains('`') {
        return None;
    }
    Some((ch, len))
}

fn closes_fence(line: &str, open: (u8, usize)) -> bool {
    match fence(line) {
        Some((ch, len)) => {
            let rest = line.trim_start_matches(' ');
            ch == open.0 && len >= open.1 && rest[len..].trim().is_empty()
        }
        None => false,
    }
}

fn is_list_item(line: &str) -> bool {
    if indent_width(line) > 3 {
        return false;
    }
    let rest = line.trim_start();
    let bytes = rest.as_bytes();
    let marker_end = match bytes.first() {
        Some(b'-' | b'*' | b'+') => 1,
        Some(b) if b.is_ascii_digit() => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 9 || !matches!(bytes.get(digits), Some(b'.' | b')')) {
                return false;
            }
            digits + 1
        }
        _ => return false,
    };
    matches!(bytes.get(marker_end), None | Some(b' ' | b'\t'))
}

/// Protected ranges of a markdown document
pub(crate) fn regions(text: &str) -> Vec<Range<usize>> {
    let lines = split_lines(text);
    let mut regions = Vec::new();
    let mut after_blank = true;
    let mut in_list = false;
    let mut i = 0;

    while i < lines.len() {
        let line = &text[lines[i].start..lines[i].end];

        if let Some(open) = fence(line) {
            let close = (i + 1..lines.len())
                .find(|&j| closes_fence(&text[lines[j].start..lines[j].end], open));
            let last = close.unwrap_or(lines.len() - 1);
            regions.push(lines[i].start..lines[last].end);
            i = last + 1;
            after_blank = false;
            continue;
        }

        if is_blank(line) {
            after_blank = true;
            i += 1;
            continue;
        }

        if after_blank && !in_list && is_indented(line) {
            let mut last = i;
            let mut j = i + 1;
            while j < lines.len() {
                let next = &text[lines[j].start..lines[j].end];
                if is_indented(next) {
                    last = j;
                } else if !is_blank(next) {
                    break;
                }
                j += 1;
            }
            regions.push(lines[i].start..lines[last].end);
            i = last + 1;
            after_blank = false;
            continue;
        }

        if is_list_item(line) {
            in_list = true;
        } else if !is_indented(line) {
            in_list = false;
        }

        inline_regions(line, lines[i].start, &mut regions);
        after_blank = false;
        i += 1;
    }

    regions
}

/// Inline code spans and URLs on one prose line
fn inline_regions(line: &str, offset: usize, regions: &mut Vec<Range<usize>>) {
    let bytes = line.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] == b'`' {
            let run = backtick_run(bytes, pos);
            match closing_backticks(bytes, pos + run, run) {
                Some(end) => {
                    regions.push(offset + pos..offset + end);
                    pos = end;
                }
                None => pos += run,
            }
            continue;
        }

        let word_start = pos == 0 || !bytes[pos - 1].is_ascii_alphanumeric();
        if word_start && bytes[pos].is_ascii_alphabetic() {
            if let Some(end) = url_end(bytes, pos) {
                regions.push(offset + pos..offset + end);
                pos = end;
                continue;
            }
        }

        pos += 1;
    }
}

fn backtick_run(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|&&b| b == b'`').count()
}

/// End of the first run of exactly `len` backticks at or after `from`
fn closing_backticks(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut pos = from;
    while pos < bytes.len() {
        if bytes[pos] == b'`' {
            let run = backtick_run(bytes, pos);
            if run == len {
                return Some(pos + run);
            }
            pos += run;
        } else {
            pos += 1;
        }
    }
    None
}

fn is_url_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"-._~:/?#[]@!$&'()*+,;=%".contains(&b)
}

/// End of a `scheme://rest` URL starting at `start`
fn url_end(bytes: &[u8], start: usize) -> Option<usize> {
    let scheme_len = bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'.' | b'-'))
        .count();
    let after_scheme = start + scheme_len;
    if !bytes[after_scheme..].starts_with(b"://") {
        return None;
    }
    let body_start = after_scheme + 3;
    let body_len = bytes[body_start..]
        .iter()
        .take_while(|&&b| is_url_byte(b))
        .count();
    let mut end = body_start + body_len;

    // Sentence punctuation and unbalanced closing parens are not part of the URL
    while end > body_start {
        let last = bytes[end - 1];
        let unbalanced_paren = last == b')' && {
            let body = &bytes[start..end];
            let count = |c: u8| body.iter().filter(|&&b| b == c).count();
            count(b')') > count(b'(')
        };
        if b".,;:!?'".contains(&last) || unbalanced_paren {
            end -= 1;
        } else {
            break;
        }
    }

    (end > body_start).then_some(end)
}
