//! Character classification for CJK typography rules
//!
//! Every context-sensitive rule asks the same questions about its
//! neighbours: is this an ideograph, a piece of CJK punctuation that
//! already carries visual spacing, or plain Latin? The answers come from
//! explicit code-point tables so that scanners and regex-based rules agree.
//!
//! | Script   | Ranges |
//! |----------|--------|
//! | Han      | U+3400–4DBF, U+4E00–9FFF, U+F900–FAFF, U+20000–2A6DF, U+2A700–2EBEF, U+30000–3134F |
//! | Hiragana | U+3040–309F |
//! | Katakana | U+30A0–30FF, U+31F0–31FF |
//! | Hangul   | U+1100–11FF, U+3130–318F, U+AC00–D7AF |

use std::fmt::Write as _;

/// Han ideograph ranges (unified, extension A–F, compatibility)
pub const HAN_RANGES: &[(u32, u32)] = &[
    (0x3400, 0x4DBF),
    (0x4E00, 0x9FFF),
    (0xF900, 0xFAFF),
    (0x20000, 0x2A6DF),
    (0x2A700, 0x2EBEF),
    (0x30000, 0x3134F),
];

/// Hiragana block
pub const HIRAGANA_RANGES: &[(u32, u32)] = &[(0x3040, 0x309F)];

/// Katakana block and phonetic extensions
pub const KATAKANA_RANGES: &[(u32, u32)] = &[(0x30A0, 0x30FF), (0x31F0, 0x31FF)];

/// Hangul jamo, compatibility jamo and precomposed syllables
pub const HANGUL_RANGES: &[(u32, u32)] = &[(0x1100, 0x11FF), (0x3130, 0x318F), (0xAC00, 0xD7AF)];

/// Full-width sentence punctuation with built-in trailing space
pub const CJK_TERMINAL_PUNCTUATION: &[char] = &['，', '。', '！', '？', '；', '：', '、'];

/// Opening CJK brackets and title marks
pub const CJK_BRACKETS_OPEN: &[char] = &['《', '「', '『', '【', '（', '〈'];

/// Closing CJK brackets and title marks
pub const CJK_BRACKETS_CLOSE: &[char] = &['》', '」', '』', '】', '）', '〉'];

/// Single em-dash code point; Chinese text uses it doubled
pub const EM_DASH: char = '\u{2014}';

/// The Chinese dash, two em-dashes
pub const EM_DASH_PAIR: &str = "\u{2014}\u{2014}";

/// Scripts recognised as CJK
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Script {
    Han,
    Hiragana,
    Katakana,
    Hangul,
}

/// Classification of a single code point for typography decisions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    /// Han ideograph, kana or Hangul syllable
    CjkIdeograph,
    /// ，。！？；：、
    CjkTerminalPunctuation,
    /// 《「『【（〈
    CjkBracketOpen,
    /// 》」』】）〉
    CjkBracketClose,
    /// U+2014; see [`is_em_dash_pair`] for the doubled form
    EmDash,
    /// ASCII letter or digit
    LatinAlnum,
    /// Anything else
    Other,
}

#[inline]
fn in_ranges(ch: char, ranges: &[(u32, u32)]) -> bool {
    let cp = ch as u32;
    ranges.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

/// Script of a character, if it is CJK
pub fn script(ch: char) -> Option<Script> {
    // Cheap reject for everything below the first CJK block
    if (ch as u32) < 0x1100 {
        return None;
    }
    if in_ranges(ch, HAN_RANGES) {
        Some(Script::Han)
    } else if in_ranges(ch, HIRAGANA_RANGES) {
        Some(Script::Hiragana)
    } else if in_ranges(ch, KATAKANA_RANGES) {
        Some(Script::Katakana)
    } else if in_ranges(ch, HANGUL_RANGES) {
        Some(Script::Hangul)
    } else {
        None
    }
}

/// Classify a character
pub fn classify(ch: char) -> CharClass {
    if ch.is_ascii_alphanumeric() {
        return CharClass::LatinAlnum;
    }
    if ch == EM_DASH {
        return CharClass::EmDash;
    }
    if CJK_TERMINAL_PUNCTUATION.contains(&ch) {
        return CharClass::CjkTerminalPunctuation;
    }
    if CJK_BRACKETS_OPEN.contains(&ch) {
        return CharClass::CjkBracketOpen;
    }
    if CJK_BRACKETS_CLOSE.contains(&ch) {
        return CharClass::CjkBracketClose;
    }
    if script(ch).is_some() {
        return CharClass::CjkIdeograph;
    }
    CharClass::Other
}

/// Han, kana or Hangul
#[inline]
pub fn is_cjk(ch: char) -> bool {
    script(ch).is_some()
}

/// Characters that pull neighbouring ASCII punctuation to full width.
///
/// Hangul is excluded: Korean typesets with half-width punctuation.
#[inline]
pub fn is_fullwidth_context(ch: char) -> bool {
    matches!(
        script(ch),
        Some(Script::Han | Script::Hiragana | Script::Katakana)
    )
}

/// Opening or closing CJK bracket
#[inline]
pub fn is_cjk_bracket(ch: char) -> bool {
    matches!(
        classify(ch),
        CharClass::CjkBracketOpen | CharClass::CjkBracketClose
    )
}

/// Whether the window starts with the doubled em-dash
pub fn is_em_dash_pair(window: &str) -> bool {
    window.starts_with(EM_DASH_PAIR)
}

/// Whether any CJK character appears in the text
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk)
}

/// Whether any Han ideograph appears in the text
pub fn contains_han(text: &str) -> bool {
    text.chars().any(|c| script(c) == Some(Script::Han))
}

/// Body of a regex character class covering the given ranges
///
/// The result has no surrounding brackets, so callers can combine it
/// with other members: `format!("[{}A-Za-z]", class_body(...))`.
pub fn class_body(tables: &[&[(u32, u32)]]) -> String {
    let mut body = String::new();
    for &(lo, hi) in tables.iter().flat_map(|t| t.iter()) {
        // Writing into a String cannot fail
        let _ = write!(body, "\\x{{{lo:X}}}-\\x{{{hi:X}}}");
    }
    body
}

/// Regex class body for every CJK script
pub fn cjk_class_body() -> String {
    class_body(&[HAN_RANGES, HIRAGANA_RANGES, KATAKANA_RANGES, HANGUL_RANGES])
}
