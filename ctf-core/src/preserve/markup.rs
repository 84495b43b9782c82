//! HTML-like markup region detection
//!
//! A forgiving, non-validating scanner. Tags, comments, declarations and
//! character references become regions of their own; elements whose
//! content is code or raw text are protected whole. Anything the scanner
//! cannot make sense of is left as text.

use std::ops::Range;

/// Elements protected from start tag through matching end tag
const PRESERVED_ELEMENTS: &[&str] = &["pre", "code", "script", "style", "textarea"];

/// Protected ranges of a markup document
pub(crate) fn regions(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut regions = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let found = match bytes[pos] {
            b'<' => markup_at(bytes, pos),
            b'&' => entity_at(bytes, pos),
            _ => None,
        };
        match found {
            Some(end) => {
                regions.push(pos..end);
                pos = end;
            }
            None => pos += 1,
        }
    }

    regions
}

fn starts_with_ignore_case(bytes: &[u8], at: usize, prefix: &[u8]) -> bool {
    bytes
        .get(at..at + prefix.len())
        .is_some_and(|window| window.eq_ignore_ascii_case(prefix))
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

/// End of the markup construct starting with `<` at `pos`
fn markup_at(bytes: &[u8], pos: usize) -> Option<usize> {
    if bytes[pos..].starts_with(b"<!--") {
        // An unterminated comment swallows the rest of the document
        let end = find(bytes, pos + 4, b"-->").map_or(bytes.len(), |i| i + 3);
        return Some(end);
    }
    match bytes.get(pos + 1) {
        Some(b'!' | b'?') => find(bytes, pos + 2, b">").map(|i| i + 1),
        Some(b'/') if bytes.get(pos + 2).is_some_and(u8::is_ascii_alphabetic) => {
            tag_end(bytes, pos)
        }
        Some(b) if b.is_ascii_alphabetic() => {
            let end = tag_end(bytes, pos)?;
            let name = tag_name(bytes, pos + 1);
            let self_closing = bytes[..end].ends_with(b"/>");
            let preserved = PRESERVED_ELEMENTS
                .iter()
                .any(|p| p.as_bytes().eq_ignore_ascii_case(name));
            if preserved && !self_closing {
                Some(element_end(bytes, end, name).unwrap_or(bytes.len()))
            } else {
                Some(end)
            }
        }
        _ => None,
    }
}

fn tag_name(bytes: &[u8], start: usize) -> &[u8] {
    let len = bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-')
        .count();
    &bytes[start..start + len]
}

/// One past the `>` closing the tag at `pos`; quoted attribute values may
/// contain `>`.
fn tag_end(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(pos + 1) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i + 1),
            (None, b'<') => return None,
            _ => {}
        }
    }
    None
}

/// Whether the byte after a tag name ends the name
fn ends_name(b: Option<&u8>) -> bool {
    matches!(b, None | Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r'))
}

/// End of the element named `name` whose start tag ends at `from`,
/// counting nested elements of the same name.
fn element_end(bytes: &[u8], from: usize, name: &[u8]) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = from;

    while let Some(lt) = find(bytes, pos, b"<") {
        if bytes.get(lt + 1) == Some(&b'/')
            && starts_with_ignore_case(bytes, lt + 2, name)
            && ends_name(bytes.get(lt + 2 + name.len()))
        {
            depth -= 1;
            if depth == 0 {
                return find(bytes, lt, b">").map(|i| i + 1);
            }
        } else if starts_with_ignore_case(bytes, lt + 1, name)
            && ends_name(bytes.get(lt + 1 + name.len()))
        {
            depth += 1;
        }
        pos = lt + 1;
    }
    None
}

/// End of a character reference such as `&amp;`, `&#39;` or `&#x4E2D;`
fn entity_at(bytes: &[u8], pos: usize) -> Option<usize> {
    let body = &bytes[pos + 1..];
    let len = match body.first()? {
        b'#' => match body.get(1)? {
            b'x' | b'X' => {
                let digits = body[2..].iter().take_while(|b| b.is_ascii_hexdigit()).count();
                (digits > 0).then_some(2 + digits)?
            }
            _ => {
                let digits = body[1..].iter().take_while(|b| b.is_ascii_digit()).count();
                (digits > 0).then_some(1 + digits)?
            }
        },
        b if b.is_ascii_alphabetic() => body
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count(),
        _ => return None,
    };
    (body.get(len) == Some(&b';')).then_some(pos + 1 + len + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(text: &str) -> Vec<&str> {
        regions(text).into_iter().map(|r| &text[r]).collect()
    }

    #[test]
    fn test_tags_are_regions() {
        let doc = "<p class=\"a>b\">中文English</p>";
        assert_eq!(extracted(doc), vec!["<p class=\"a>b\">", "</p>"]);
    }

    #[test]
    fn test_preserved_elements_are_whole() {
        let doc = "<p>前</p><pre>a--b\n  c</pre><code>x</code>";
        assert_eq!(
            extracted(doc),
            vec!["<p>", "</p>", "<pre>a--b\n  c</pre>", "<code>x</code>"]
        );
    }

    #[test]
    fn test_nested_same_element() {
        let doc = "<code>a<code>b</code>c</code>后";
        assert_eq!(extracted(doc), vec!["<code>a<code>b</code>c</code>"]);
    }

    #[test]
    fn test_unterminated_preserved_element() {
        let doc = "<script>if (a < b) { x--; }";
        assert_eq!(extracted(doc), vec![doc]);
    }

    #[test]
    fn test_comments_declarations_entities() {
        let doc = "<!DOCTYPE html><!-- 注释 -->a&amp;b&#x4E2D;&#39;";
        assert_eq!(
            extracted(doc),
            vec!["<!DOCTYPE html>", "<!-- 注释 -->", "&amp;", "&#x4E2D;", "&#39;"]
        );
    }

    #[test]
    fn test_stray_markup_is_text() {
        assert!(extracted("a < b and c > d").is_empty());
        assert!(extracted("AT&T & co").is_empty());
        assert!(extracted("<p unclosed").is_empty());
    }

    #[test]
    fn test_prefix_names_do_not_match() {
        let doc = "<pre>x<prefix>y</pre>";
        assert_eq!(extracted(doc), vec![doc]);
        let doc = "<codex>不保护</codex>";
        assert_eq!(extracted(doc), vec!["<codex>", "</codex>"]);
    }
}
