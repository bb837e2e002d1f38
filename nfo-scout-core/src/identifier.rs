//! Catalog code extraction and normalization.
//!
//! Filenames carry the same code in many shapes: `sone00638.mp4`,
//! `SONE-638-UncenLeak-1080p.mkv`, `[group] sone_638 (FHD).mp4`. [`extract`]
//! reduces all of them to one [`Identifier`].
//!
//! A candidate is a whole run of 2 to 6 ASCII letters, an optional single
//! separator (`-`, `_` or a space), then a run of 2 to 5 digits. Among all
//! candidates in the input the longest one wins; ties go to the leftmost.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Width the numeric part is zero-padded to in the content-id form.
pub const CONTENT_ID_WIDTH: usize = 5;

/// Minimum width of the numeric part in the canonical form.
pub const CANONICAL_MIN_WIDTH: usize = 3;

const MIN_PREFIX_LEN: usize = 2;
const MAX_PREFIX_LEN: usize = 6;
const MIN_DIGITS: usize = 2;
const MAX_DIGITS: usize = CONTENT_ID_WIDTH;

/// Letter runs that look like a prefix but are encoding or release tags.
const NOISE_PREFIXES: &[&str] = &[
    "fhd", "uhd", "hd", "sd", "hevc", "avc", "aac", "dts", "mp", "web", "part", "cd", "disc",
];

/// Accepted joiners between prefix and digits.
const SEPARATORS: &[u8] = b"-_ ";

/// A normalized catalog code.
///
/// Both string forms are derived once from the prefix and number, so two
/// identifiers compare equal exactly when their canonical forms match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier {
    canonical: String,
    content_id: String,
    prefix: String,
    number: String,
}

impl Identifier {
    /// Build an identifier from an already split prefix and digit string.
    pub fn new(prefix: &str, digits: &str) -> Result<Self, ExtractionError> {
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ExtractionError::invalid_part(format!(
                "prefix must be ASCII letters, got \"{prefix}\""
            )));
        }
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ExtractionError::invalid_part(format!(
                "number must be ASCII digits, got \"{digits}\""
            )));
        }

        let stripped = digits.trim_start_matches('0');
        let stripped = if stripped.is_empty() { "0" } else { stripped };
        if stripped.len() > CONTENT_ID_WIDTH {
            return Err(ExtractionError::invalid_part(format!(
                "number \"{digits}\" is wider than {CONTENT_ID_WIDTH} digits"
            )));
        }

        let prefix = prefix.to_ascii_uppercase();
        let number = format!("{:0>width$}", stripped, width = CANONICAL_MIN_WIDTH);
        let canonical = format!("{prefix}-{number}");
        let content_id = format!(
            "{}{:0>width$}",
            prefix.to_ascii_lowercase(),
            stripped,
            width = CONTENT_ID_WIDTH
        );

        Ok(Self {
            canonical,
            content_id,
            prefix,
            number,
        })
    }

    /// Uppercase prefix, e.g. `SONE`.
    pub fn studio_prefix(&self) -> &str {
        &self.prefix
    }

    /// Normalized number as used in the canonical form, e.g. `638` or `022`.
    pub fn numeric_part(&self) -> &str {
        &self.number
    }

    /// Uppercase hyphenated form, e.g. `SONE-638`.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Lowercase padded form without hyphen, e.g. `sone00638`.
    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    /// The number as an integer.
    pub fn number(&self) -> u32 {
        self.number.parse().unwrap_or(0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for Identifier {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        extract(s)
    }
}

/// One prefix/number match inside the input.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    start: usize,
    len: usize,
    prefix: &'a str,
    digits: &'a str,
}

/// Extract the identifier from a filename or user input.
///
/// A trailing file extension is ignored. Returns `NoMatch` when nothing in
/// the input looks like a catalog code.
pub fn extract(raw: &str) -> Result<Identifier, ExtractionError> {
    let text = strip_extension(raw.trim());

    let best = candidates(text).into_iter().max_by(|a, b| {
        a.len
            .cmp(&b.len)
            .then_with(|| b.start.cmp(&a.start))
    });

    match best {
        Some(c) => Identifier::new(c.prefix, c.digits),
        None => Err(ExtractionError::no_match(raw)),
    }
}

/// Drop a short trailing `.ext` (letters and digits, at least one letter).
fn strip_extension(text: &str) -> &str {
    match text.rfind('.') {
        Some(dot) => {
            let ext = &text[dot + 1..];
            let looks_like_ext = (1..=5).contains(&ext.len())
                && ext.bytes().all(|b| b.is_ascii_alphanumeric())
                && ext.bytes().any(|b| b.is_ascii_alphabetic());
            if looks_like_ext { &text[..dot] } else { text }
        }
        None => text,
    }
}

fn candidates(text: &str) -> Vec<Candidate<'_>> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if !bytes[i].is_ascii_alphabetic() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
            i += 1;
        }
        if let Some(c) = candidate_at(text, start, i) {
            found.push(c);
        }
    }

    found
}

/// Try to read a candidate whose letter run spans `start..prefix_end`.
fn candidate_at(text: &str, start: usize, prefix_end: usize) -> Option<Candidate<'_>> {
    let bytes = text.as_bytes();
    let prefix = &text[start..prefix_end];

    if !(MIN_PREFIX_LEN..=MAX_PREFIX_LEN).contains(&prefix.len()) {
        return None;
    }
    if NOISE_PREFIXES
        .iter()
        .any(|noise| noise.eq_ignore_ascii_case(prefix))
    {
        return None;
    }

    let mut digits_start = prefix_end;
    if digits_start < bytes.len() && SEPARATORS.contains(&bytes[digits_start]) {
        digits_start += 1;
    }
    let mut digits_end = digits_start;
    while digits_end < bytes.len() && bytes[digits_end].is_ascii_digit() {
        digits_end += 1;
    }

    let digit_count = digits_end - digits_start;
    if !(MIN_DIGITS..=MAX_DIGITS).contains(&digit_count) {
        return None;
    }
    if is_resolution_suffix(bytes, digits_end) {
        return None;
    }

    Some(Candidate {
        start,
        len: digits_end - start,
        prefix,
        digits: &text[digits_start..digits_end],
    })
}

/// True when the digits ending at `end` are followed by a lone `p`, `i` or
/// `k` marker, as in `1080p` or `2160P`.
fn is_resolution_suffix(bytes: &[u8], end: usize) -> bool {
    let Some(&marker) = bytes.get(end) else {
        return false;
    };
    if !matches!(marker.to_ascii_lowercase(), b'p' | b'i' | b'k') {
        return false;
    }
    bytes
        .get(end + 1)
        .is_none_or(|next| !next.is_ascii_alphabetic())
}

#[cfg(test)]
#[path = "tests/identifier_tests.rs"]
mod tests;
