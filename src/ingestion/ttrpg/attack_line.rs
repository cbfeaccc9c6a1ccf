//! Attack-Line Grammar
//!
//! Parses a compact creature attack line such as
//!
//! ```text
//! Claws (melee or reach 2) +1 with 1 boon (1d6+2 fire plus stunned) ºº(knocked prone)ºº
//! ```
//!
//! into one weapon per listed attack type. Text after the damage parentheses
//! carries optional clauses bracketed by one, two, or three separators.

use once_cell::sync::Lazy;
use regex::Regex;

use super::dice::normalize_damage;
use super::error::RecordError;
use super::factory::{self, WeaponSpec};
use super::records::{Attribute, DamageComponent, Item};

// ============================================================================
// Regex Patterns
// ============================================================================

static ATTACK_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        ^
        (?P<name>[^()]+?)\s*
        \((?P<types>[^)]+)\)\s*
        (?P<bonus>[+\-]?\d+)?\s*
        (?:with\s+(?P<boons>\d+)\s+boons?|with\s+(?P<banes>\d+)\s+banes?)?\s*
        \((?P<damage>[^)]+)\)
        (?P<extra>.*)
        ",
    )
    .expect("Failed to compile attack line regex")
});

static TYPE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+or\s+").expect("Failed to compile type separator regex"));

static ATTACK_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(melee|reach|range|short\s+range|medium\s+range|long\s+range|extreme\s+range)(?:\s+(\d+))?",
    )
    .expect("Failed to compile attack type regex")
});

static PLUS_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.*?)\s+plus\s+([^)]+)").expect("Failed to compile plus clause regex")
});

static TRIPLE_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ººº([^º]+?)ººº").expect("Failed to compile triple clause regex"));

static DOUBLE_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ºº([^º]+?)ºº").expect("Failed to compile double clause regex"));

static BONUS_DAMAGE_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"º\(([^)]+)\)º").expect("Failed to compile bonus damage clause regex")
});

static SINGLE_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"º([^º]+?)º").expect("Failed to compile single clause regex"));

// ============================================================================
// Types
// ============================================================================

/// Fixed-distance range tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeTier {
    Short,
    Medium,
    Long,
    Extreme,
}

impl RangeTier {
    pub fn name(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
            Self::Extreme => "extreme",
        }
    }

    /// Distance in yards.
    pub fn distance(self) -> u32 {
        match self {
            Self::Short => 5,
            Self::Medium => 20,
            Self::Long => 100,
            Self::Extreme => 500,
        }
    }
}

/// One attack type from the parenthesized type list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    Melee,
    Reach(u32),
    /// Bare `range`, with an optional distance.
    Range(Option<u32>),
    Tier(RangeTier),
}

impl AttackKind {
    /// Parse one entry of the type list, e.g. `reach 2` or `long range`.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = ATTACK_TYPE.captures(text.trim())?;
        let base = caps[1].to_lowercase();
        let distance = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());

        let kind = if base == "melee" {
            Self::Melee
        } else if base == "reach" {
            Self::Reach(distance.unwrap_or(1))
        } else if base.starts_with("short") {
            Self::Tier(RangeTier::Short)
        } else if base.starts_with("medium") {
            Self::Tier(RangeTier::Medium)
        } else if base.starts_with("long") {
            Self::Tier(RangeTier::Long)
        } else if base.starts_with("extreme") {
            Self::Tier(RangeTier::Extreme)
        } else {
            Self::Range(distance)
        };
        Some(kind)
    }

    /// Strength for melee and reach, Agility for ranged attacks.
    pub fn attribute(self) -> Attribute {
        match self {
            Self::Melee | Self::Reach(_) => Attribute::Strength,
            Self::Range(_) | Self::Tier(_) => Attribute::Agility,
        }
    }

    pub fn properties(self) -> String {
        match self {
            Self::Melee => "Melee".to_string(),
            Self::Reach(n) => format!("Reach ({n})"),
            Self::Range(None) => "Range".to_string(),
            Self::Range(Some(n)) => format!("Range ({n})"),
            Self::Tier(tier) => format!("Range ({}) ({})", tier.name(), tier.distance()),
        }
    }
}

/// Optional clauses peeled from the text after the damage parentheses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraClauses {
    /// `ººº…ººº`
    pub description: Option<String>,
    /// `ºº…ºº`, applied on a roll of 20+.
    pub extra_effect20: Option<String>,
    /// `º(…)º`, bonus damage on a roll of 20+.
    pub plus20_damage: Option<String>,
    /// `º…º`
    pub extra_effect: Option<String>,
}

/// A parsed attack line, before expansion into weapons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackLine {
    pub name: String,
    pub kinds: Vec<AttackKind>,
    pub roll_bonus: String,
    /// Positive for boons, negative for banes, empty when absent.
    pub boons_banes: String,
    pub damage: Vec<DamageComponent>,
    pub extra_effect: String,
    pub clauses: ExtraClauses,
}

// ============================================================================
// Parser
// ============================================================================

/// Parse an attack line. Returns `None` when the line does not have the
/// `Name (types) … (damage)` shape or lists no recognised attack type.
pub fn parse_attack_line(line: &str) -> Option<AttackLine> {
    let caps = ATTACK_LINE.captures(line.trim())?;

    let name = caps["name"].trim().to_string();
    if name.is_empty() {
        return None;
    }

    let kinds: Vec<AttackKind> = TYPE_SEPARATOR
        .split(caps["types"].trim())
        .filter_map(AttackKind::parse)
        .collect();
    if kinds.is_empty() {
        return None;
    }

    let roll_bonus = caps
        .name("bonus")
        .map(|m| m.as_str().trim_start_matches('+').to_string())
        .unwrap_or_default();

    let boons_banes = match (caps.name("boons"), caps.name("banes")) {
        (Some(boons), _) => boons.as_str().to_string(),
        (None, Some(banes)) => format!("-{}", banes.as_str()),
        (None, None) => String::new(),
    };

    let mut damage_spec = caps["damage"].trim().to_string();
    let mut extra_effect = String::new();
    if let Some(plus) = PLUS_CLAUSE.captures(&damage_spec) {
        extra_effect = plus[2].trim().to_string();
        damage_spec = plus[1].trim().to_string();
    }

    let clauses = peel_clauses(caps.name("extra").map_or("", |m| m.as_str()));
    if let Some(effect) = &clauses.extra_effect {
        extra_effect = effect.clone();
    }

    Some(AttackLine {
        name,
        kinds,
        roll_bonus,
        boons_banes,
        damage: decompose_damage(&damage_spec),
        extra_effect,
        clauses,
    })
}

/// Split a damage spec on `+` into components.
///
/// A term without dice folds into the previous component, so `1d6+2 fire`
/// is one component `1d6+2` typed `fire`.
pub fn decompose_damage(spec: &str) -> Vec<DamageComponent> {
    let normalized = normalize_damage(spec);
    let mut parts: Vec<DamageComponent> = Vec::new();

    for term in normalized.split('+').map(str::trim).filter(|t| !t.is_empty()) {
        let (value, damage_type) = match term.split_once(char::is_whitespace) {
            Some((value, rest)) => (value.trim(), rest.trim().to_lowercase()),
            None => (term, String::new()),
        };

        let has_dice = value.contains(['d', 'D']);
        match parts.last_mut() {
            Some(last) if !has_dice => {
                last.damage.push('+');
                last.damage.push_str(value);
                if !damage_type.is_empty() {
                    last.damagetype = damage_type;
                }
            }
            _ => parts.push(DamageComponent::new(value, damage_type)),
        }
    }

    parts
}

/// Peel separator-bracketed clauses, most specific first.
///
/// Each matched clause is removed before the next pattern is tried, so a
/// triple-bracketed clause never reads as single-bracketed ones.
pub fn peel_clauses(extra: &str) -> ExtraClauses {
    let mut rest = extra.trim().to_string();
    let mut clauses = ExtraClauses::default();

    clauses.description = take_clause(&TRIPLE_CLAUSE, &mut rest);
    clauses.extra_effect20 = take_clause(&DOUBLE_CLAUSE, &mut rest);
    clauses.plus20_damage = take_clause(&BONUS_DAMAGE_CLAUSE, &mut rest).map(|d| normalize_damage(&d));
    clauses.extra_effect = SINGLE_CLAUSE
        .captures(&rest)
        .map(|caps| caps[1].trim().to_string());

    clauses
}

fn take_clause(pattern: &Regex, text: &mut String) -> Option<String> {
    let (clause, range) = {
        let caps = pattern.captures(text)?;
        (caps[1].trim().to_string(), caps.get(0)?.range())
    };
    text.replace_range(range, "");
    *text = text.trim().to_string();
    Some(clause)
}

impl AttackLine {
    /// One weapon per attack type, skipping repeats of the same properties.
    pub fn weapons(&self) -> Result<Vec<Item>, RecordError> {
        let mut seen: Vec<String> = Vec::new();
        let mut weapons = Vec::with_capacity(self.kinds.len());

        for kind in &self.kinds {
            let properties = kind.properties();
            if seen.contains(&properties) {
                continue;
            }

            let weapon = factory::weapon(WeaponSpec {
                name: self.name.clone(),
                attack: kind.attribute(),
                roll_bonus: self.roll_bonus.clone(),
                boons_banes: self.boons_banes.clone(),
                damage: self.damage.clone(),
                properties: properties.clone(),
                description: self.clauses.description.clone().unwrap_or_default(),
                extra_effect: self.extra_effect.clone(),
                plus20_damage: self.clauses.plus20_damage.clone().unwrap_or_default(),
                extra_effect20: self.clauses.extra_effect20.clone().unwrap_or_default(),
            })?;
            seen.push(properties);
            weapons.push(weapon);
        }

        log::debug!("Attack line '{}' expanded to {} weapon(s)", self.name, weapons.len());
        Ok(weapons)
    }
}

// ============================================================================
// Tests
// ============================================================================
