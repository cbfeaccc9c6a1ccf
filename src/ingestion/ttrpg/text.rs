//! Text Normalization Module
//!
//! Line splitting, separator handling, and identifier generation shared by
//! every content parser. Dice markup lives in [`super::dice`].

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

// ============================================================================
// Constants
// ============================================================================

/// The reserved character separating a name from its description.
///
/// Doubled it marks a talent group header; in attack lines one, two, or three
/// consecutive copies bracket progressively more specific extra clauses.
pub const SEPARATOR: char = 'º';

/// Talent group header prefix.
pub const GROUP_PREFIX: &str = "ºº";

/// Length of generated record identifiers.
pub const ID_LENGTH: usize = 16;

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Hyphen, en-dash, em-dash, and minus sign.
pub const DASHES: &[char] = &['-', '–', '—', '−'];

/// Zero-width characters plus any whitespace run.
static SPACING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\u{200B}-\u{200D}\u{FEFF}\s]+").expect("Failed to compile spacing regex")
});

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

// ============================================================================
// Line Handling
// ============================================================================

/// Split text into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Split text into lines with zero-width characters removed and every
/// whitespace run collapsed to a single space.
///
/// Spell write-ups pasted from PDFs carry stray zero-width joiners and
/// non-breaking spaces that would otherwise defeat the header pattern.
pub fn split_normalized_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(|line| SPACING_PATTERN.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

// ============================================================================
// Separator Handling
// ============================================================================

/// Split a line at the first separator into `(name, description)`.
///
/// Separators inside the description are kept verbatim. Returns `None` when
/// the line has no separator.
pub fn split_entry(line: &str) -> Option<(&str, &str)> {
    line.split_once(SEPARATOR)
        .map(|(name, rest)| (name.trim(), rest.trim()))
}

/// Remove every separator character.
pub fn strip_separators(text: &str) -> String {
    text.replace(SEPARATOR, "").trim().to_string()
}

/// Whether a token is a bare dash meaning "no value".
pub fn is_dash(token: &str) -> bool {
    let mut chars = token.trim().chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if DASHES.contains(&c))
}

/// Upper-case the first character and lower-case the rest.
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Identifiers
// ============================================================================

/// Generate a random 16-character identifier from `[a-z0-9]`.
///
/// Uniqueness is probabilistic; identifiers only need to be distinct within
/// the records of one import run.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
