//! Content preservation: shield code and markup from the rules
//!
//! [`protect`] finds the regions of a document that must come out
//! byte-for-byte identical, swaps each for a placeholder token and hands
//! back the remaining text. [`Protected::restore`] puts the regions back
//! after the rules have run. Region detection always works on the original
//! document, so a region never contains another region's token.

mod markdown;
mod markup;
mod token;

pub use token::TokenAlphabet;

use crate::error::PreserveError;
use std::fmt;
use std::ops::Range;
use std::path::Path;

/// How a document's protected regions are found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentFormat {
    /// No regions
    #[default]
    Plain,
    /// Fenced, indented and inline code plus URLs
    Markdown,
    /// Tags, comments, entities and raw-content elements
    Markup,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 3] = [
        DocumentFormat::Plain,
        DocumentFormat::Markdown,
        DocumentFormat::Markup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DocumentFormat::Plain => "plain",
            DocumentFormat::Markdown => "markdown",
            DocumentFormat::Markup => "markup",
        }
    }

    /// File extensions mapped to this format
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            DocumentFormat::Plain => &["txt"],
            DocumentFormat::Markdown => &["md", "markdown"],
            DocumentFormat::Markup => &["html", "htm"],
        }
    }

    /// Format for a file extension, case-insensitive
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }

    /// Format for a path; unknown or missing extensions are plain text
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .unwrap_or_default()
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A document with its protected regions replaced by tokens
#[derive(Debug, Clone)]
pub struct Protected {
    text: String,
    regions: Vec<String>,
    alphabet: Option<TokenAlphabet>,
}

/// Replace protected regions of `text` with placeholder tokens
pub fn protect(text: &str, format: DocumentFormat) -> Result<Protected, PreserveError> {
    let ranges = match format {
        DocumentFormat::Plain => Vec::new(),
        DocumentFormat::Markdown => markdown::regions(text),
        DocumentFormat::Markup => markup::regions(text),
    };
    log::trace!("{format}: {} protected region(s)", ranges.len());

    if ranges.is_empty() {
        return Ok(Protected {
            text: text.to_string(),
            regions: Vec::new(),
            alphabet: None,
        });
    }

    let alphabet = TokenAlphabet::choose(text)?;
    Ok(substitute(text, &ranges, alphabet))
}

fn substitute(text: &str, ranges: &[Range<usize>], alphabet: TokenAlphabet) -> Protected {
    let mut out = String::with_capacity(text.len());
    let mut regions = Vec::with_capacity(ranges.len());
    let mut copied = 0;

    for range in ranges {
        debug_assert!(range.start >= copied, "regions overlap or are unsorted");
        out.push_str(&text[copied..range.start]);
        out.push_str(&alphabet.token(regions.len()));
        regions.push(text[range.clone()].to_string());
        copied = range.end;
    }
    out.push_str(&text[copied..]);

    Protected {
        text: out,
        regions,
        alphabet: Some(alphabet),
    }
}

impl Protected {
    /// Text exposed to the rules
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Original content of each region, in document order
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Whether `c` may appear inside a token
    pub fn is_token_char(&self, c: char) -> bool {
        self.alphabet.is_some_and(|a| a.contains(c))
    }

    /// Swap every token in `transformed` back for its region
    ///
    /// Each token must appear exactly once and intact.
    pub fn restore(&self, transformed: &str) -> Result<String, PreserveError> {
        let Some(alphabet) = self.alphabet else {
            return Ok(transformed.to_string());
        };

        let region_bytes: usize = self.regions.iter().map(String::len).sum();
        let mut out = String::with_capacity(transformed.len() + region_bytes);
        let mut seen = vec![false; self.regions.len()];
        let mut iter = transformed.char_indices().peekable();

        while let Some((offset, c)) = iter.next() {
            if !alphabet.contains(c) {
                out.push(c);
                continue;
            }
            if c != alphabet.open() {
                return Err(PreserveError::MalformedToken { offset });
            }

            let mut index = 0usize;
            let mut digits = 0;
            loop {
                match iter.next() {
                    Some((_, d)) if d == alphabet.close() && digits > 0 => break,
                    Some((_, d)) => match alphabet.digit_value(d) {
                        Some(value) => {
                            index = index
                                .checked_mul(16)
                                .and_then(|i| i.checked_add(value))
                                .ok_or(PreserveError::MalformedToken { offset })?;
                            digits += 1;
                        }
                        None => return Err(PreserveError::MalformedToken { offset }),
                    },
                    None => return Err(PreserveError::MalformedToken { offset }),
                }
            }

            let slot = seen
                .get_mut(index)
                .ok_or(PreserveError::UnknownRegion { index })?;
            if *slot {
                return Err(PreserveError::DuplicateRegion { index });
            }
            *slot = true;
            out.push_str(&self.regions[index]);
        }

        if let Some(index) = seen.iter().position(|&restored| !restored) {
            return Err(PreserveError::MissingRegion { index });
        }
        Ok(out)
    }
}
