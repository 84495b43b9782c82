//! Whitespace cleanup and punctuation limits

use super::patterns::patterns;
use super::Rewrite;

/// Marks whose repetition `consecutive_punctuation_limit` caps
const LIMITED_MARKS: &[char] = &['！', '？', '。', '，', '；', '：', '、', '!', '?'];

pub(crate) fn trailing_spaces(text: &str) -> Rewrite {
    let re = &patterns().trailing_space;
    let changes = re.find_iter(text).count();
    if changes == 0 {
        return Rewrite::unchanged(text);
    }
    Rewrite::new(re.replace_all(text, "${1}").into_owned(), changes)
}

pub(crate) fn blank_lines(text: &str) -> Rewrite {
    let re = &patterns().blank_lines;
    let changes = re.find_iter(text).count();
    if changes == 0 {
        return Rewrite::unchanged(text);
    }
    Rewrite::new(re.replace_all(text, "${1}${1}").into_owned(), changes)
}

/// Cap runs of the same mark at `limit`; a limit of 0 disables the rule
pub(crate) fn limit_punctuation(text: &str, limit: u8) -> Rewrite {
    if limit == 0 {
        return Rewrite::unchanged(text);
    }
    let limit = usize::from(limit);
    let mut out = String::with_capacity(text.len());
    let mut changes = 0;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        if !LIMITED_MARKS.contains(&c) {
            continue;
        }
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
            if run <= limit {
                out.push(c);
            }
        }
        if run > limit {
            changes += 1;
        }
    }

    Rewrite::new(out, changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_spaces() {
        let rewrite = trailing_spaces("line one  \nline two\t\nend ");
        assert_eq!(rewrite.text, "line one\nline two\nend");
        assert_eq!(rewrite.changes, 3);
        assert_eq!(trailing_spaces("crlf  \r\nnext").text, "crlf\r\nnext");
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(blank_lines("a\n\n\n\nb").text, "a\n\nb");
        assert_eq!(blank_lines("a\n\nb").changes, 0);
        assert_eq!(blank_lines("a\r\n\r\n\r\nb").text, "a\r\n\r\nb");
    }

    #[test]
    fn test_limit_punctuation() {
        assert_eq!(limit_punctuation("真的！！！", 1).text, "真的！");
        assert_eq!(limit_punctuation("真的！！！", 2).text, "真的！！");
        assert_eq!(limit_punctuation("what???", 1).text, "what?");
        assert_eq!(limit_punctuation("什么？！", 1).changes, 0);
        assert_eq!(limit_punctuation("真的！！！", 0).text, "真的！！！");
        assert_eq!(limit_punctuation("wait...", 1).text, "wait...");
    }
}
