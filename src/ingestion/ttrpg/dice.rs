//! Dice Expression Module
//!
//! Rewrites dice notation into inline-roll markup and scans prose for dice
//! expressions and damage-type keywords.
//!
//! # Example
//!
//! ```
//! use sotdl_import::ingestion::ttrpg::dice::make_dice_rollable;
//!
//! let text = make_dice_rollable("takes 2d6 + 3 damage");
//! assert_eq!(text, "takes [[/r 2d6+3]] damage");
//! assert_eq!(make_dice_rollable(&text), text);
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// ============================================================================
// Regex Patterns
// ============================================================================

/// An already-written inline roll: `[[/r 2d6+3]]`.
static ROLL_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[/r [^\]]*\]\]").expect("Failed to compile roll marker regex")
});

/// A chain of dice terms and integers: "2d6", "1d6 + 2", "2d6+1d4-1".
static DICE_CHAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \b
        (?P<chain>
            \d+d\d+                         # Leading dice term
            (?:
                \s*[+\-]\s*                 # Sign with optional spacing
                (?:\d+d\d+|\d+)             # Dice term or flat number
            )*
        )
        \b
        ",
    )
    .expect("Failed to compile dice chain regex")
});

/// A single dice term with an optional flat modifier: "1d6", "3d6 + 2".
static DICE_TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d+d\d+(?:\s*[+\-]\s*\d+)?)\b").expect("Failed to compile dice term regex")
});

/// Spacing around a plus or minus sign.
static SIGN_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*([+\-])\s*").expect("Failed to compile sign spacing regex"));

/// The word "plus" joining two damage terms.
static PLUS_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+plus\s+").expect("Failed to compile plus regex"));

/// Damage types recognised in spell prose.
pub const DAMAGE_TYPES: &[&str] = &[
    "acid",
    "cold",
    "fire",
    "electricity",
    "force",
    "necrotic",
    "poison",
    "psychic",
    "radiant",
    "sound",
    "physical",
];

static DAMAGE_TYPE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b({})\b", DAMAGE_TYPES.join("|")))
        .expect("Failed to compile damage type regex")
});

// ============================================================================
// Markup
// ============================================================================

/// Wrap every dice expression in `[[/r …]]` and tighten spacing around signs.
///
/// Text already inside a roll marker is left untouched, so applying this to
/// its own output changes nothing.
pub fn make_dice_rollable(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let wrapped = map_unmarked(text, |plain| {
        DICE_CHAIN
            .replace_all(plain, |caps: &Captures| {
                format!("[[/r {}]]", tighten_signs(&caps["chain"]))
            })
            .into_owned()
    });

    map_unmarked(&wrapped, tighten_signs)
}

/// Remove whitespace around `+` and `-`.
pub fn tighten_signs(text: &str) -> String {
    SIGN_SPACING.replace_all(text, "$1").into_owned()
}

/// Turn `1d6 plus 2` into `1d6+2`.
pub fn normalize_damage(text: &str) -> String {
    tighten_signs(&PLUS_WORD.replace_all(text.trim(), "+"))
}

/// Apply `f` to every stretch of text outside existing roll markers.
fn map_unmarked<F>(text: &str, f: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;

    for marker in ROLL_MARKER.find_iter(text) {
        out.push_str(&f(&text[last..marker.start()]));
        out.push_str(marker.as_str());
        last = marker.end();
    }
    out.push_str(&f(&text[last..]));

    out
}

// ============================================================================
// Scanning
// ============================================================================

/// Every dice term (with optional flat modifier) in order of appearance.
pub fn extract_dice_rolls(text: &str) -> Vec<String> {
    DICE_TERM
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// The first dice term in `text`, if any.
pub fn first_dice_roll(text: &str) -> Option<String> {
    DICE_TERM
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Known damage types mentioned in `text`, lower-cased, deduplicated, in
/// order of first appearance.
pub fn extract_damage_types(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for caps in DAMAGE_TYPE_PATTERN.captures_iter(text) {
        let damage_type = caps[1].to_lowercase();
        if !found.contains(&damage_type) {
            found.push(damage_type);
        }
    }
    found
}

// ============================================================================
// Tests
// ============================================================================
