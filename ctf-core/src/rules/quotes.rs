//! Spacing around curly quotation marks

use super::Rewrite;
use crate::classify::{is_cjk, EM_DASH};

/// Characters a quote must not touch directly.
///
/// CJK terminal punctuation and brackets already carry visual space and
/// are not in this set.
fn wants_space(c: char) -> bool {
    c.is_alphanumeric() || is_cjk(c) || c == EM_DASH
}

/// Insert a space between an opening quote and the word before it, and
/// between a closing quote and the word after it.
pub(crate) fn space_quotes(text: &str, open: char, close: char) -> Rewrite {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut changes = 0;

    for (i, &c) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();

        if c == open && prev.is_some_and(wants_space) {
            out.push(' ');
            changes += 1;
        }
        out.push(c);
        if c == close && next.is_some_and(wants_space) && !is_apostrophe(c, prev, next) {
            out.push(' ');
            changes += 1;
        }
    }

    Rewrite::new(out, changes)
}

/// `’` between two ASCII letters, as in `don’t`
fn is_apostrophe(c: char, prev: Option<char>, next: Option<char>) -> bool {
    c == '’'
        && prev.is_some_and(|p| p.is_ascii_alphabetic())
        && next.is_some_and(|n| n.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double(text: &str) -> String {
        space_quotes(text, '“', '”').text
    }

    fn single(text: &str) -> String {
        space_quotes(text, '‘', '’').text
    }

    #[test]
    fn test_quotes_between_words() {
        assert_eq!(double("文本“引用”文本"), "文本 “引用” 文本");
        assert_eq!(double("say“hi”now"), "say “hi” now");
    }

    #[test]
    fn test_cjk_punctuation_is_exempt() {
        assert_eq!(double("文本，“引用”。"), "文本，“引用”。");
        assert_eq!(double("《“书名”》"), "《“书名”》");
    }

    #[test]
    fn test_em_dash_neighbour_is_spaced() {
        assert_eq!(double("——“引用”——"), "—— “引用” ——");
    }

    #[test]
    fn test_already_spaced_is_stable() {
        let rewrite = space_quotes("文本 “引用” 文本", '“', '”');
        assert_eq!(rewrite.changes, 0);
    }

    #[test]
    fn test_single_quotes_and_apostrophe() {
        assert_eq!(single("他说‘好’然后"), "他说 ‘好’ 然后");
        assert_eq!(single("中文don’t"), "中文don’t");
        assert_eq!(single("‘test’中文"), "‘test’ 中文");
    }
}
