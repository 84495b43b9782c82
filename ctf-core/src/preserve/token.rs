//! Placeholder tokens built from a private-use alphabet
//!
//! A token is `OPEN hex-digits CLOSE`, where all three kinds of character
//! come from one 32-code-point block of a Private Use Area:
//!
//! ```text
//! base + 0x00        OPEN
//! base + 0x01        CLOSE
//! base + 0x10..0x20  hex digits 0-f
//! ```
//!
//! The block is picked per document so that none of its code points occur
//! in the input. Private-use characters are not CJK, ASCII, whitespace or
//! punctuation, so no rule reacts to them.

use crate::error::PreserveError;
use std::collections::BTreeSet;

const BLOCK: u32 = 0x20;
const DIGITS_OFFSET: u32 = 0x10;

/// Private Use Areas, as `(first block base, one past the last usable base)`
const AREAS: &[(u32, u32)] = &[
    (0xE000, 0xF900),
    (0xF0000, 0xFFFE0),
    (0x100000, 0x10FFE0),
];

/// The 32-code-point block a document's tokens are written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAlphabet {
    base: u32,
}

impl TokenAlphabet {
    /// First block none of whose code points appear in `text`
    pub fn choose(text: &str) -> Result<Self, PreserveError> {
        let used: BTreeSet<u32> = text
            .chars()
            .map(|c| c as u32)
            .filter(|&cp| AREAS.iter().any(|&(lo, hi)| (lo..hi).contains(&cp)))
            .map(|cp| cp - cp % BLOCK)
            .collect();

        AREAS
            .iter()
            .flat_map(|&(lo, hi)| (lo..hi).step_by(BLOCK as usize))
            .find(|base| !used.contains(base))
            .map(|base| Self { base })
            .ok_or(PreserveError::AlphabetExhausted)
    }

    fn char_at(self, offset: u32) -> char {
        // Every offset below BLOCK lands inside a Private Use Area
        char::from_u32(self.base + offset).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    pub fn open(self) -> char {
        self.char_at(0)
    }

    pub fn close(self) -> char {
        self.char_at(1)
    }

    /// Whether `c` belongs to this alphabet's block
    pub fn contains(self, c: char) -> bool {
        (self.base..self.base + BLOCK).contains(&(c as u32))
    }

    /// Hex digit value of `c`, if it is one of this alphabet's digits
    pub fn digit_value(self, c: char) -> Option<usize> {
        let cp = c as u32;
        let lo = self.base + DIGITS_OFFSET;
        (lo..lo + 16).contains(&cp).then(|| (cp - lo) as usize)
    }

    /// Token for region `index`
    pub fn token(self, index: usize) -> String {
        let hex = format!("{index:x}");
        let mut token = String::with_capacity((hex.len() + 2) * 4);
        token.push(self.open());
        for d in hex.chars() {
            let value = d.to_digit(16).unwrap_or(0);
            token.push(self.char_at(DIGITS_OFFSET + value));
        }
        token.push(self.close());
        token
    }
}
