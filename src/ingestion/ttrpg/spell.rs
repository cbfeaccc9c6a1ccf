//! Spell Block Parsing
//!
//! Spells start with an all-caps header `NAME TRADITION TYPE RANK` followed
//! by labeled sections:
//!
//! ```text
//! FIREBALL ARCANE ATTACK 3
//! Area A sphere with a 5-yard radius
//! Duration 1 round
//! Make an Intellect attack roll against the target's Agility.
//! º A ball of fire erupts, dealing 3d6 fire damage.
//! Attack Roll 20+ The target also catches fire and takes 1d6 extra damage.
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use super::dice::{extract_damage_types, extract_dice_rolls, first_dice_roll, make_dice_rollable};
use super::error::{BlockError, EntryError, ImportError};
use super::factory::{self, SpellSpec};
use super::list_parser::ListOutput;
use super::records::{Attribute, DamageComponent, HeightenedEffect};
use super::text::{split_normalized_lines, title_case};

// ============================================================================
// Regex Patterns
// ============================================================================

static SPELL_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]+(?:\s+[A-Z]+)*\s+[A-Z]+\s+[A-Z]+\s+\d+$")
        .expect("Failed to compile spell header regex")
});

static UPPERCASE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]+(?:\s+[A-Z]+)*$").expect("Failed to compile spell name regex")
});

static SECTION_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(Casting Time|Duration|Range|Target|Area|Requirements?|Attack Roll 20\+|Attack Roll|Resistance Roll|Aftereffect|Special|Sacrifice|Permanence|Triggered|Heightened)(?::|\s|$)\s*(.*)$",
    )
    .expect("Failed to compile spell section regex")
});

static FLAVOR_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^º\s*(.*)$").expect("Failed to compile flavor regex"));

static DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s+([^.]+)").expect("Failed to compile duration regex"));

static DEFENSE_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(Strength|Agility|Intellect|Will)\b")
        .expect("Failed to compile defense regex")
});

static ATTACK_SENTENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)Make an? (\w+) attack roll against the target(?:'s)? (\w+)(?:.*takes (\d+d\d+(?:\s*[+\-]\s*\d+)?) damage)?",
    )
    .expect("Failed to compile attack sentence regex")
});

static HEIGHTENED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\+(\d+)\):\s*").expect("Failed to compile heightened regex"));

static FIRST_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)").expect("Failed to compile number regex"));

// ============================================================================
// Types
// ============================================================================

/// A labeled section of a spell block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellSection {
    CastingTime,
    Duration,
    Range,
    Target,
    Area,
    Requirement,
    AttackRoll,
    AttackRoll20,
    ResistanceRoll,
    Aftereffect,
    Special,
    Sacrifice,
    Permanence,
    Triggered,
    Heightened,
    /// Introduced by a bare separator.
    Flavor,
}

impl SpellSection {
    fn from_label(label: &str) -> Option<Self> {
        let section = match label {
            "Casting Time" => Self::CastingTime,
            "Duration" => Self::Duration,
            "Range" => Self::Range,
            "Target" => Self::Target,
            "Area" => Self::Area,
            "Requirement" | "Requirements" => Self::Requirement,
            "Attack Roll 20+" => Self::AttackRoll20,
            "Attack Roll" => Self::AttackRoll,
            "Resistance Roll" => Self::ResistanceRoll,
            "Aftereffect" => Self::Aftereffect,
            "Special" => Self::Special,
            "Sacrifice" => Self::Sacrifice,
            "Permanence" => Self::Permanence,
            "Triggered" => Self::Triggered,
            "Heightened" => Self::Heightened,
            _ => return None,
        };
        Some(section)
    }

    /// Recognise a section label at the start of `line`, returning the
    /// section and the rest of the line.
    pub fn detect(line: &str) -> Option<(Self, &str)> {
        if let Some(caps) = FLAVOR_LINE.captures(line) {
            return Some((Self::Flavor, caps.get(1).map_or("", |m| m.as_str())));
        }
        let caps = SECTION_LABEL.captures(line)?;
        let section = Self::from_label(caps.get(1)?.as_str())?;
        Some((section, caps.get(2).map_or("", |m| m.as_str())))
    }
}

/// Text fields collected from one spell block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpellText {
    pub name: String,
    pub tradition: String,
    pub spell_type: String,
    pub rank: u32,
    pub casting_time: String,
    pub duration: String,
    pub range: String,
    pub target: String,
    pub area: String,
    pub requirement: String,
    pub attack_roll: String,
    pub resistance_roll: String,
    pub effect: String,
    pub flavor: String,
    pub aftereffect: String,
    pub special: String,
    pub sacrifice: String,
    pub permanence: String,
    pub triggered: String,
    pub plus20: String,
    pub heightened: Vec<HeightenedEffect>,
    pub raw_text: String,
}

// ============================================================================
// Parser
// ============================================================================

/// Whether `line` is a spell header.
pub fn is_spell_header(line: &str) -> bool {
    SPELL_HEADER.is_match(line)
}

/// Parse every spell block in `text`.
pub fn parse_spells(text: &str) -> Result<ListOutput, ImportError> {
    let lines = split_normalized_lines(text);
    if lines.is_empty() {
        return Err(ImportError::EmptyInput);
    }

    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_spell_header(line))
        .map(|(idx, _)| idx)
        .collect();
    if starts.is_empty() {
        return Err(ImportError::NoSpellHeader);
    }

    let mut out = ListOutput::default();
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(lines.len());
        let block = &lines[start..end];

        let result = parse_spell_text(block)
            .and_then(|spell| factory::spell(build_spec(spell)).map_err(BlockError::from));
        match result {
            Ok(item) => {
                log::debug!("Parsed spell '{}'", item.name);
                out.items.push(item);
            }
            Err(err) => out.errors.push(EntryError::from_error(block[0].clone(), &err)),
        }
    }

    log::info!(
        "Spell import: {} parsed, {} error(s)",
        out.items.len(),
        out.errors.len()
    );
    Ok(out)
}

/// Split a header into name, tradition, type, and rank.
pub fn parse_header(line: &str) -> Result<(String, String, String, u32), BlockError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(BlockError::InvalidHeader(
            "expected NAME TRADITION TYPE RANK".to_string(),
        ));
    }

    let n = parts.len();
    let rank = parts[n - 1]
        .parse::<u32>()
        .map_err(|_| BlockError::InvalidNumber {
            field: "rank",
            value: parts[n - 1].to_string(),
        })?;
    let name = parts[..n - 3].join(" ");
    if !UPPERCASE_NAME.is_match(&name) {
        return Err(BlockError::InvalidHeader(format!(
            "spell name must be uppercase: {name}"
        )));
    }

    Ok((name, parts[n - 3].to_string(), parts[n - 2].to_string(), rank))
}

/// Collect the labeled sections of one spell block.
pub fn parse_spell_text(lines: &[String]) -> Result<SpellText, BlockError> {
    let header = lines
        .first()
        .ok_or_else(|| BlockError::InvalidHeader("empty block".to_string()))?;
    let (name, tradition, spell_type, rank) = parse_header(header)?;

    let mut spell = SpellText {
        name,
        tradition,
        spell_type,
        rank,
        raw_text: lines.join("\n"),
        ..SpellText::default()
    };

    let mut current: Option<(SpellSection, String)> = None;
    for line in &lines[1..] {
        if let Some((section, rest)) = SpellSection::detect(line) {
            if let Some((prev, content)) = current.take() {
                assign_section(&mut spell, prev, content.trim());
            }
            current = Some((section, rest.trim().to_string()));
        } else if let Some((_, content)) = current.as_mut() {
            content.push('\n');
            content.push_str(line);
        } else {
            if !spell.effect.is_empty() {
                spell.effect.push('\n');
            }
            spell.effect.push_str(line);
        }
    }
    if let Some((prev, content)) = current {
        assign_section(&mut spell, prev, content.trim());
    }

    Ok(spell)
}

fn assign_section(spell: &mut SpellText, section: SpellSection, content: &str) {
    if content.is_empty() {
        return;
    }
    let rollable = make_dice_rollable(content);

    match section {
        SpellSection::CastingTime => spell.casting_time = rollable,
        SpellSection::Duration => spell.duration = rollable,
        SpellSection::Range => spell.range = rollable,
        SpellSection::Target => spell.target = rollable,
        SpellSection::Area => spell.area = rollable,
        SpellSection::Requirement => spell.requirement = rollable,
        SpellSection::AttackRoll => spell.attack_roll = rollable,
        SpellSection::AttackRoll20 => spell.plus20 = rollable,
        SpellSection::ResistanceRoll => spell.resistance_roll = rollable,
        SpellSection::Aftereffect => spell.aftereffect = rollable,
        SpellSection::Special => spell.special = rollable,
        SpellSection::Sacrifice => spell.sacrifice = rollable,
        SpellSection::Permanence => spell.permanence = rollable,
        SpellSection::Triggered => spell.triggered = rollable,
        SpellSection::Heightened => spell.heightened.extend(parse_heightened(content)),
        SpellSection::Flavor => spell.flavor = content.to_string(),
    }
}

/// Split heightened text on `(+N):` markers. Text without a marker is one
/// level-0 entry.
pub fn parse_heightened(content: &str) -> Vec<HeightenedEffect> {
    let markers: Vec<(u32, usize, usize)> = HEIGHTENED_MARKER
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let level = caps[1].parse::<u32>().ok()?;
            Some((level, whole.start(), whole.end()))
        })
        .collect();

    if markers.is_empty() {
        return vec![HeightenedEffect {
            level: 0,
            content: make_dice_rollable(content),
        }];
    }

    markers
        .iter()
        .enumerate()
        .map(|(i, &(level, _, body_start))| {
            let body_end = markers.get(i + 1).map_or(content.len(), |next| next.1);
            HeightenedEffect {
                level,
                content: make_dice_rollable(content[body_start..body_end].trim()),
            }
        })
        .collect()
}

// ============================================================================
// Derived Fields
// ============================================================================

/// Split a duration into a leading count and unit.
pub fn parse_duration(content: &str) -> (u32, String) {
    if content.is_empty() {
        return (0, String::new());
    }
    match DURATION.captures(content) {
        Some(caps) => match caps[1].parse::<u32>() {
            Ok(value) => (value, caps[2].trim().to_string()),
            Err(_) => (0, content.trim().to_string()),
        },
        None => (0, content.trim().to_string()),
    }
}

/// First attribute named in an attack-roll description.
pub fn extract_defense(text: &str) -> String {
    DEFENSE_ATTRIBUTE
        .captures(text)
        .and_then(|caps| Attribute::from_name(&caps[1]))
        .map(|attr| attr.to_string())
        .unwrap_or_default()
}

/// Attack attribute, target attribute, and damage from the effect prose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttackInfo {
    pub attack: String,
    pub against: String,
    pub damage: String,
}

pub fn parse_attack_sentence(effect: &str) -> AttackInfo {
    ATTACK_SENTENCE
        .captures(effect)
        .map(|caps| AttackInfo {
            attack: title_case(&caps[1]),
            against: title_case(&caps[2]),
            damage: caps.get(3).map_or(String::new(), |m| m.as_str().to_string()),
        })
        .unwrap_or_default()
}

fn area_shape(area: &str) -> &'static str {
    let lower = area.to_lowercase();
    if lower.contains("sphere") {
        "sphere"
    } else if lower.contains("cube") {
        "cube"
    } else {
        ""
    }
}

/// Derive the record fields from the collected text.
pub fn build_spec(spell: SpellText) -> SpellSpec {
    let (duration_value, duration_unit) = parse_duration(&spell.duration);
    let attack = parse_attack_sentence(&spell.effect);
    let plus20_damage = first_dice_roll(&spell.plus20).unwrap_or_default();

    let dice = extract_dice_rolls(&spell.flavor);
    let types = extract_damage_types(&spell.flavor);

    let primary_dice = dice.first().cloned().unwrap_or_else(|| attack.damage.clone());
    let damage = (!primary_dice.is_empty()).then(|| {
        DamageComponent::new(primary_dice, types.first().cloned().unwrap_or_default())
    });

    let additional_damage = dice
        .iter()
        .skip(1)
        .enumerate()
        .map(|(i, roll)| DamageComponent::new(roll.clone(), types.get(i + 1).cloned().unwrap_or_default()))
        .collect();

    let area_value = FIRST_NUMBER
        .captures(&spell.area)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();

    SpellSpec {
        name: spell.name,
        tradition: title_case(&spell.tradition),
        spell_type: title_case(&spell.spell_type),
        rank: spell.rank,
        casting_time: spell.casting_time,
        duration_value,
        duration_unit,
        duration: spell.duration,
        range: spell.range,
        target: spell.target,
        area_value,
        area_shape: area_shape(&spell.area).to_string(),
        area: spell.area,
        requirement: spell.requirement,
        resistance: spell.resistance_roll,
        defense: extract_defense(&spell.attack_roll),
        has_attack_roll: !spell.attack_roll.is_empty(),
        attack: attack.attack,
        against: attack.against,
        damage,
        additional_damage,
        plus20: spell.plus20,
        plus20_damage,
        heightened: spell.heightened,
        aftereffect: spell.aftereffect,
        special: spell.special,
        sacrifice: spell.sacrifice,
        permanence: spell.permanence,
        triggered: spell.triggered,
        effect: spell.effect,
        flavor: spell.flavor,
        raw_text: spell.raw_text,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        split_normalized_lines(text)
    }

    #[test]
    fn test_header() {
        assert!(is_spell_header("FIREBALL ARCANE ATTACK 3"));
        assert!(is_spell_header("CALL THE LIGHTNING STORM UTILITY 5"));
        assert!(!is_spell_header("Fireball Arcane Attack 3"));
        assert!(!is_spell_header("ARCANE ATTACK 3"));

        let (name, tradition, spell_type, rank) = parse_header("FIREBALL ARCANE ATTACK 3").unwrap();
        assert_eq!(
            (name.as_str(), tradition.as_str(), spell_type.as_str(), rank),
            ("FIREBALL", "ARCANE", "ATTACK", 3)
        );
    }

    #[test]
    fn test_header_errors() {
        assert!(matches!(parse_header("FIRE ATTACK 3"), Err(BlockError::InvalidHeader(_))));
        assert!(matches!(
            parse_header("Fire ball ARCANE ATTACK 3"),
            Err(BlockError::InvalidHeader(_))
        ));
        assert!(matches!(
            parse_header("FIREBALL ARCANE ATTACK 99999999999"),
            Err(BlockError::InvalidNumber { field: "rank", .. })
        ));
    }

    #[test]
    fn test_fireball_spell() {
        let out = parse_spells("FIREBALL ARCANE ATTACK 3\nDuration 1 round").unwrap();
        assert_eq!(out.items.len(), 1);
        let item = &out.items[0];
        assert_eq!(item.name, "FIREBALL");
        let system = item.spell().unwrap();
        assert_eq!(system.tradition, "Arcane");
        assert_eq!(system.spelltype, "Attack");
        assert_eq!(system.rank, 3);
        assert_eq!(system.activated_effect.duration.value, 1);
        assert_eq!(system.activated_effect.duration.unit, "round");
    }

    #[test]
    fn test_sections_and_effect() {
        let text = "\
SHOCK ARCANE ATTACK 0
Make a Will attack roll against the target's Agility.
On a success, the target takes 1d6 + 1 damage.
Target One creature within short range
Attack Roll 20+ The target is dazed.
Attack Roll: Agility
º Lightning
crackles.
Ranged spells are noisy.";
        let spell = parse_spell_text(&lines(text)).unwrap();
        assert!(spell.effect.starts_with("Make a Will attack roll"));
        assert_eq!(spell.target, "One creature within short range");
        assert_eq!(spell.plus20, "The target is dazed.");
        assert_eq!(spell.attack_roll, "Agility");
        assert_eq!(spell.flavor, "Lightning\ncrackles.\nRanged spells are noisy.");
        assert!(spell.range.is_empty());
    }

    #[test]
    fn test_attack_sentence() {
        let info = parse_attack_sentence(
            "Make a will attack roll against the target's Perception. The target takes 2d6 + 2 damage.",
        );
        assert_eq!(info.attack, "Will");
        assert_eq!(info.against, "Perception");
        assert_eq!(info.damage, "2d6 + 2");
        assert_eq!(parse_attack_sentence("No roll needed."), AttackInfo::default());
    }

    #[test]
    fn test_heightened_levels() {
        let entries = parse_heightened("(+1): Deals 1d6 more damage. (+2): Affects two targets.");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, 1);
        assert_eq!(entries[0].content, "Deals [[/r 1d6]] more damage.");
        assert_eq!(entries[1].level, 2);
        assert_eq!(entries[1].content, "Affects two targets.");

        let plain = parse_heightened("Range increases.");
        assert_eq!(plain, vec![HeightenedEffect { level: 0, content: "Range increases.".into() }]);
    }

    #[test]
    fn test_duration_and_defense() {
        assert_eq!(parse_duration("1 minute. Concentration"), (1, "minute".to_string()));
        assert_eq!(parse_duration("Instantaneous"), (0, "Instantaneous".to_string()));
        assert_eq!(parse_duration(""), (0, String::new()));
        assert_eq!(extract_defense("against the target's agility"), "Agility");
        assert_eq!(extract_defense("none"), "");
    }

    #[test]
    fn test_damage_from_flavor() {
        let text = "\
BURN ARCANE ATTACK 1
Area A sphere 5 yards across
º Flames deal 2d6 fire damage, then 1d6 cold damage and 1d4 more.
Attack Roll 20+ The target takes 1d6 extra damage.";
        let out = parse_spells(text).unwrap();
        let system = out.items[0].spell().unwrap();
        assert_eq!(system.action.damage, "2d6");
        assert_eq!(system.action.damagetype, "fire");
        assert_eq!(
            system.action.damagetypes,
            vec![DamageComponent::new("1d6", "cold"), DamageComponent::new("1d4", "")]
        );
        assert_eq!(system.action.plus20damage, "1d6");
        assert!(system.action.plus20active);
        assert_eq!(system.activated_effect.target.value, "5");
        assert_eq!(system.activated_effect.target.shape, "sphere");
        assert!(system.description.contains("<p>—————————</p>"));
        assert!(system.description.ends_with("1d6 extra damage.</p>"));
    }

    #[test]
    fn test_bad_block_recorded_and_others_kept() {
        let out = parse_spells("FIREBALL ARCANE ATTACK 3\nLIGHT ARCANE UTILITY 0").unwrap();
        assert_eq!(out.items.len(), 2);

        assert_eq!(parse_spells("no headers here").unwrap_err(), ImportError::NoSpellHeader);
        assert_eq!(parse_spells("").unwrap_err(), ImportError::EmptyInput);
    }
}
