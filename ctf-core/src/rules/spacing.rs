//! Spacing rules between CJK and Latin text

use super::patterns::patterns;
use super::Rewrite;
use crate::classify::is_cjk;
use regex::Regex;

/// `replace_all` with a fixed template, counting the matches
fn replace_counted(re: &Regex, text: &str, template: &str) -> Rewrite {
    let changes = re.find_iter(text).count();
    if changes == 0 {
        return Rewrite::unchanged(text);
    }
    Rewrite::new(re.replace_all(text, template).into_owned(), changes)
}

/// Chain two rewrites, adding their counts
fn then(first: Rewrite, re: &Regex, template: &str) -> Rewrite {
    let second = replace_counted(re, &first.text, template);
    Rewrite::new(second.text, first.changes + second.changes)
}

pub(crate) fn cjk_parenthesis(text: &str) -> Rewrite {
    let p = patterns();
    let opened = replace_counted(&p.cjk_paren_open, text, "${1} (");
    then(opened, &p.cjk_paren_close, ") ${1}")
}

/// One space at every CJK/Latin boundary, units and currency kept attached
pub(crate) fn cjk_english(text: &str) -> Rewrite {
    let p = patterns();
    let forward = replace_counted(&p.cjk_then_latin, text, "${1} ${2}");
    then(forward, &p.latin_then_cjk, "${1} ${2}")
}

pub(crate) fn currency(text: &str) -> Rewrite {
    replace_counted(&patterns().currency_gap, text, "${1}${2}")
}

pub(crate) fn collapse_spaces(text: &str) -> Rewrite {
    replace_counted(&patterns().space_run, text, "${1} ")
}

fn slash_neighbour(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_cjk(c)
}

/// `A / B` becomes `A/B`; `//` is left alone
pub(crate) fn slash(text: &str) -> Rewrite {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut changes = 0;

    for i in 0..chars.len() {
        if chars[i] != '/' {
            continue;
        }
        if (i > 0 && chars[i - 1] == '/') || chars.get(i + 1) == Some(&'/') {
            continue;
        }
        let mut start = i;
        while start > copied && matches!(chars[start - 1], ' ' | '\t') {
            start -= 1;
        }
        let mut end = i + 1;
        while end < chars.len() && matches!(chars[end], ' ' | '\t') {
            end += 1;
        }
        if start == i && end == i + 1 {
            continue;
        }
        let left = start.checked_sub(1).map(|p| chars[p]);
        let right = chars.get(end).copied();
        if left.is_some_and(slash_neighbour) && right.is_some_and(slash_neighbour) {
            out.extend(&chars[copied..start]);
            out.push('/');
            copied = end;
            changes += 1;
        }
    }

    out.extend(&chars[copied..]);
    Rewrite::new(out, changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cjk_english_spacing() {
        assert_eq!(cjk_english("文本English混合").text, "文本 English 混合");
        assert_eq!(cjk_english("100个item").text, "100 个 item");
        assert_eq!(cjk_english("温度25℃很热").text, "温度 25℃ 很热");
        assert_eq!(cjk_english("增长50%以上").text, "增长 50% 以上");
        assert_eq!(cjk_english("价格$100元").text, "价格 $100 元");
        assert_eq!(cjk_english("共100 USD左右").text, "共 100 USD 左右");
    }

    #[test]
    fn test_cjk_english_counts_each_boundary() {
        let rewrite = cjk_english("中a中b中");
        assert_eq!(rewrite.text, "中 a 中 b 中");
        assert_eq!(rewrite.changes, 4);
        assert_eq!(cjk_english("中 a 中").changes, 0);
    }

    #[test]
    fn test_cjk_parenthesis_spacing() {
        assert_eq!(cjk_parenthesis("中文(test)").text, "中文 (test)");
        assert_eq!(cjk_parenthesis("(test)中文").text, "(test) 中文");
        assert_eq!(cjk_parenthesis("a(b)c").changes, 0);
    }

    #[test]
    fn test_currency_spacing() {
        assert_eq!(currency("价格 $ 100").text, "价格 $100");
        assert_eq!(currency("¥  50").text, "¥50");
        assert_eq!(currency("$ USD").changes, 0);
    }

    #[test]
    fn test_slash_spacing() {
        assert_eq!(slash("A / B").text, "A/B");
        assert_eq!(slash("中文 / 英文 / 日文").text, "中文/英文/日文");
        assert_eq!(slash("http://example.com").text, "http://example.com");
        assert_eq!(slash("a // b").text, "a // b");
        assert_eq!(slash("1/2").changes, 0);
        assert_eq!(slash("end /").changes, 0);
    }

    #[test]
    fn test_collapse_spaces_keeps_indentation() {
        assert_eq!(collapse_spaces("a  b   c").text, "a b c");
        assert_eq!(collapse_spaces("    indented  text").text, "    indented text");
    }

    #[test]
    fn test_collapse_spaces_includes_tabs() {
        assert_eq!(collapse_spaces("中文\t\tEnglish").text, "中文 English");
        assert_eq!(collapse_spaces("a \t b").text, "a b");
        assert_eq!(collapse_spaces("a\tb").changes, 0);
        assert_eq!(collapse_spaces("\t\tindented").changes, 0);
    }
}
