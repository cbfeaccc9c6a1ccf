//! Weapon Table Row Parser
//!
//! One weapon per line, laid out as the equipment tables print them:
//!
//! ```text
//! Name  Damage  Hands  Properties                       Price
//! Bow   1d6     Two    Ammunition (arrows), range 100   5 ss
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{BlockError, EntryError};
use super::factory::{self, Hands, TableWeaponSpec};
use super::list_parser::ListOutput;
use super::records::Item;
use super::text::{is_dash, split_lines};

// ============================================================================
// Regex Patterns
// ============================================================================

static PRICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(\d+\s*(?:cp|ss|gc|gp|sp|bp)|[\-–—−])\s*$")
        .expect("Failed to compile price regex")
});

/// Trailing damage in the text before the hands column: `1d6`, `2d6+1`,
/// `3`, optionally followed by one word.
static DAMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)(\d+(?:d\d+)?(?:\s*[+\-]\s*\d+)?(?:\s+[A-Za-z]+)?)\s*$")
        .expect("Failed to compile table damage regex")
});

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+").expect("Failed to compile token regex"));

static RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\brange\s+(\d+)").expect("Failed to compile range regex"));

static TARGETS_AGILITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\btargets\s+agility\b").expect("Failed to compile targets regex")
});

static AMMUNITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bammunition\s*\(").expect("Failed to compile ammunition regex")
});

// ============================================================================
// Row Parsing
// ============================================================================

/// Columns of one table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponRow {
    pub name: String,
    pub damage: String,
    pub hands: Hands,
    pub properties: String,
    pub price: String,
}

/// Split a trailing price off `line`. Dash prices are empty.
fn split_price(line: &str) -> (&str, String) {
    match PRICE.captures(line) {
        Some(caps) => {
            let (Some(whole), Some(price)) = (caps.get(0), caps.get(1)) else {
                return (line, String::new());
            };
            let price = price.as_str().trim();
            let price = if is_dash(price) {
                String::new()
            } else {
                price.to_string()
            };
            (line[..whole.start()].trim_end(), price)
        }
        None => (line, String::new()),
    }
}

/// Parse one row into its columns.
///
/// The hands column is the first hands token preceded by a damage value, so
/// names containing a dash still parse.
pub fn parse_row(line: &str) -> Result<WeaponRow, BlockError> {
    let (rest, price) = split_price(line.trim());

    let mut saw_hands = false;
    for token in TOKEN.find_iter(rest) {
        let (offset, token) = (token.start(), token.as_str());
        let Some(hands) = Hands::from_token(token) else {
            continue;
        };
        saw_hands = true;

        let before = rest[..offset].trim_end();
        let Some(damage) = DAMAGE.captures(before).and_then(|caps| caps.get(1)) else {
            continue;
        };

        return Ok(WeaponRow {
            name: before[..damage.start()].trim().to_string(),
            damage: damage.as_str().trim().to_string(),
            hands,
            properties: rest[offset + token.len()..].trim().to_string(),
            price,
        });
    }

    if saw_hands {
        Err(BlockError::MissingDamage)
    } else {
        Err(BlockError::MissingHands)
    }
}

/// Derive the ranged classification and the rest of the record inputs.
pub fn row_spec(row: WeaponRow) -> TableWeaponSpec {
    let range = RANGE
        .captures(&row.properties)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();
    let ranged = !range.is_empty();

    let against = if TARGETS_AGILITY.is_match(&row.properties) {
        "Agility"
    } else {
        "Defense"
    };
    let ammunition = AMMUNITION.is_match(&row.properties);

    let properties = if row.properties.starts_with("Ranged") || row.properties.starts_with("Melee") {
        row.properties
    } else {
        let kind = if ranged { "Ranged" } else { "Melee" };
        if row.properties.is_empty() {
            kind.to_string()
        } else {
            format!("{kind}, {}", row.properties)
        }
    };

    TableWeaponSpec {
        name: row.name,
        damage: row.damage,
        hands: row.hands,
        properties,
        price: row.price,
        ranged,
        against: against.to_string(),
        range,
        ammunition,
    }
}

fn parse_weapon(line: &str) -> Result<Item, BlockError> {
    let row = parse_row(line)?;
    Ok(factory::table_weapon(row_spec(row))?)
}

/// Parse every row of a weapon table. Failing rows are reported under the
/// row text.
pub fn parse_weapon_table(text: &str) -> ListOutput {
    let mut out = ListOutput::default();

    for line in split_lines(text) {
        match parse_weapon(line) {
            Ok(item) => {
                log::debug!("Parsed weapon '{}'", item.name);
                out.items.push(item);
            }
            Err(err) => out.errors.push(EntryError::from_error(line, &err)),
        }
    }

    log::info!(
        "Weapon table: {} parsed, {} error(s)",
        out.items.len(),
        out.errors.len()
    );
    out
}

// ============================================================================
// Tests
// ============================================================================
