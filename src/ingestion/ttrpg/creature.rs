//! Creature Statblock Parsing
//!
//! Splits pasted statblocks into one block per `DIFFICULTY` line, reads the
//! labeled stats of each block, and runs the section parsers to collect the
//! creature's items.
//!
//! ```text
//! Ghoul DIFFICULTY 25
//! Size 1 frightening undead
//! Perception 10 (+0); darksight
//! Defense 14; Health 38
//! Strength 12 (+2), Agility 11 (+1), Intellect 8 (–2), Will 10 (+0)
//! Speed 10
//! TRAITS
//! ...
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::error::{BlockError, EntryError, ImportError};
use super::factory::{self, CreatureSpec};
use super::records::{Creature, Item};
use super::sections::{parse_description, parse_magic, parse_section, SeenNames, ENTRY_SECTIONS};
use super::text::{collapse_whitespace, is_dash, split_lines, strip_separators, DASHES};

// ============================================================================
// Constants and Patterns
// ============================================================================

/// Keyword that starts every creature block.
pub const DIFFICULTY_KEYWORD: &str = "DIFFICULTY";

static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)(?:º+)?\s*DIFFICULTY[:\s]+(\d+)").expect("Failed to compile heading regex")
});

static FRIGHTENING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)fright\w*ning").expect("Failed to compile frightening regex"));

static HORRIFYING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)horrifying").expect("Failed to compile horrifying regex"));

/// Labeled stat patterns, matched against the whole block regardless of
/// line order.
struct StatPatterns {
    size: Regex,
    perception: Regex,
    defense: Regex,
    health: Regex,
    insanity: Regex,
    corruption: Regex,
    strength: Regex,
    agility: Regex,
    intellect: Regex,
    will: Regex,
    speed: Regex,
}

/// Signed value or a lone dash.
const SIGNED_VALUE: &str = r"([+\-–—−]?\d+|[\-–—−])";

fn stat_pattern(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Failed to compile stat regex")
}

fn attribute_pattern(label: &str) -> Regex {
    stat_pattern(&format!(r"(?i)\b{label}[ \t]+{SIGNED_VALUE}"))
}

static STATS: Lazy<StatPatterns> = Lazy::new(|| StatPatterns {
    size: stat_pattern(r"(?i)\bSize[ \t]+([\d/]+|[a-zA-Z]+)(?:[ \t]+([^\n]+))?"),
    perception: stat_pattern(
        r"(?i)\bPerception[ \t]+(\d+)(?:[ \t]*\([+\-–—−]?\d+\))?(?:[ \t]*;[ \t]*([^\n]*))?",
    ),
    defense: stat_pattern(r"(?i)\bDefense[ \t]+(\d+)"),
    health: stat_pattern(r"(?i)\bHealth[ \t]+(\d+)"),
    insanity: stat_pattern(r"(?i)\bInsanity[ \t]+(\d+|[\-–—−])"),
    corruption: stat_pattern(r"(?i)\bCorruption[ \t]+(\d+)"),
    strength: attribute_pattern("Strength"),
    agility: attribute_pattern("Agility"),
    intellect: attribute_pattern("Intellect"),
    will: attribute_pattern("Will"),
    speed: stat_pattern(r"(?i)\bSpeed[ \t]+(\d+)(?:[ \t]*;[ \t]*([^\n]*))?"),
});

// ============================================================================
// Types
// ============================================================================

/// Result of a creature import.
#[derive(Debug, Default)]
pub struct CreatureOutput {
    pub creatures: Vec<Creature>,
    pub errors: Vec<EntryError>,
}

// ============================================================================
// Segmentation
// ============================================================================

/// Split lines into blocks, one per line containing the difficulty keyword.
///
/// Each block runs up to the next keyword line. Lines before the first
/// keyword line belong to no block.
pub fn segment_blocks<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(DIFFICULTY_KEYWORD))
        .map(|(idx, _)| idx)
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(lines.len());
            lines[start..end].to_vec()
        })
        .collect()
}

/// Parse every creature in `text`.
///
/// Fails only when the input is empty or has no difficulty line. A block
/// that cannot be parsed is reported as `Creature <n>` and skipped.
pub fn parse_creatures(text: &str, clean_traditions: bool) -> Result<CreatureOutput, ImportError> {
    let lines = split_lines(text);
    if lines.is_empty() {
        return Err(ImportError::EmptyInput);
    }

    let blocks = segment_blocks(&lines);
    if blocks.is_empty() {
        return Err(ImportError::NoDifficulty);
    }

    let mut out = CreatureOutput::default();
    for (idx, block) in blocks.iter().enumerate() {
        let label = format!("Creature {}", idx + 1);
        match parse_block(block, &label, clean_traditions) {
            Ok((creature, errors)) => {
                log::debug!(
                    "Parsed creature '{}' with {} item(s)",
                    creature.name,
                    creature.items.len()
                );
                out.errors.extend(
                    errors
                        .into_iter()
                        .map(|e| EntryError::new(format!("{label} ({})", e.label), e.message)),
                );
                out.creatures.push(creature);
            }
            Err(err) => out.errors.push(EntryError::from_error(label, &err)),
        }
    }

    log::info!(
        "Creature import: {} parsed, {} error(s)",
        out.creatures.len(),
        out.errors.len()
    );
    Ok(out)
}

// ============================================================================
// Block Parsing
// ============================================================================

/// Name and difficulty from a block's first line.
///
/// Without a `DIFFICULTY <n>` pattern the whole line, minus separators, is
/// the name and the difficulty is 0. The name may come back empty.
pub fn parse_heading(line: &str) -> (String, u32) {
    match HEADING.captures(line) {
        Some(caps) => (
            strip_separators(&caps[1]),
            parse_unsigned("difficulty", &caps[2]),
        ),
        None => (strip_separators(line), 0),
    }
}

/// Parse one creature block into a creature and its entry-level errors.
///
/// A heading without a name falls back to `fallback_name`.
pub fn parse_block(
    lines: &[&str],
    fallback_name: &str,
    clean_traditions: bool,
) -> Result<(Creature, Vec<EntryError>), BlockError> {
    let (mut name, difficulty) = lines.first().map(|line| parse_heading(line)).unwrap_or_default();
    if name.is_empty() {
        log::warn!("Creature heading has no name, using '{}'", fallback_name);
        name = fallback_name.to_string();
    }

    let mut spec = CreatureSpec {
        name,
        difficulty,
        ..CreatureSpec::default()
    };
    scan_stats(&lines.join("\n"), &mut spec);

    let mut items: Vec<Item> = Vec::new();
    let mut errors: Vec<EntryError> = Vec::new();
    let mut seen = SeenNames::default();

    for kind in ENTRY_SECTIONS {
        let section = parse_section(lines, kind, seen);
        items.extend(section.items);
        errors.extend(section.errors);
        seen = section.seen;
    }

    let magic = parse_magic(lines, clean_traditions, seen);
    items.extend(magic.items);
    errors.extend(magic.errors);
    if let Some(power) = magic.power {
        spec.power = power;
    }

    let mut description = magic.prose.join(" ");
    if let Some(section) = parse_description(lines) {
        if !description.is_empty() {
            description.push('\n');
        }
        description.push_str(&section);
    }
    spec.description = description;

    let creature = factory::creature(spec, items)?;
    Ok((creature, errors))
}

// ============================================================================
// Stats
// ============================================================================

/// Unsigned stat value. Values too large for the field saturate.
fn parse_unsigned(field: &str, value: &str) -> u32 {
    value.trim().parse::<u32>().unwrap_or_else(|_| {
        log::warn!("{} value '{}' out of range, using {}", field, value, u32::MAX);
        u32::MAX
    })
}

/// Signed attribute value; any dash counts as a minus sign and a lone dash
/// means 0. Values out of range saturate toward their sign.
fn parse_signed(field: &str, value: &str) -> i32 {
    if is_dash(value) {
        return 0;
    }
    let normalized: String = value
        .trim()
        .chars()
        .map(|c| if DASHES.contains(&c) { '-' } else { c })
        .collect();
    normalized.parse::<i32>().unwrap_or_else(|_| {
        let saturated = if normalized.starts_with('-') {
            i32::MIN
        } else {
            i32::MAX
        };
        log::warn!("{} value '{}' out of range, using {}", field, value, saturated);
        saturated
    })
}

fn group<'t>(caps: &Captures<'t>, idx: usize) -> Option<&'t str> {
    caps.get(idx).map(|m| m.as_str().trim())
}

/// Fill `spec` from the labeled stats found anywhere in `text`.
pub fn scan_stats(text: &str, spec: &mut CreatureSpec) {
    let stats = &*STATS;

    if let Some(caps) = stats.size.captures(text) {
        spec.size = caps[1].to_string();
        if let Some(mut descriptor) = group(&caps, 2).map(str::to_string) {
            if FRIGHTENING.is_match(&descriptor) {
                spec.frightening = true;
                descriptor = FRIGHTENING.replace(&descriptor, "").into_owned();
            }
            if HORRIFYING.is_match(&descriptor) {
                spec.horrifying = true;
                descriptor = HORRIFYING.replace(&descriptor, "").into_owned();
            }
            spec.descriptor = collapse_whitespace(&descriptor);
        }
    }

    if let Some(caps) = stats.perception.captures(text) {
        spec.perception = parse_signed("perception", &caps[1]);
        spec.perception_senses = group(&caps, 2).unwrap_or_default().to_string();
    }

    if let Some(caps) = stats.defense.captures(text) {
        spec.defense = parse_unsigned("defense", &caps[1]);
    }
    if let Some(caps) = stats.health.captures(text) {
        spec.health = parse_unsigned("health", &caps[1]);
    }
    if let Some(caps) = stats.insanity.captures(text) {
        spec.insanity = if is_dash(&caps[1]) {
            None
        } else {
            Some(parse_unsigned("insanity", &caps[1]))
        };
    }
    if let Some(caps) = stats.corruption.captures(text) {
        spec.corruption = parse_unsigned("corruption", &caps[1]);
    }

    let attributes = [
        (&stats.strength, "strength", &mut spec.strength),
        (&stats.agility, "agility", &mut spec.agility),
        (&stats.intellect, "intellect", &mut spec.intellect),
        (&stats.will, "will", &mut spec.will),
    ];
    for (pattern, field, slot) in attributes {
        if let Some(caps) = pattern.captures(text) {
            *slot = parse_signed(field, &caps[1]);
        }
    }

    if let Some(caps) = stats.speed.captures(text) {
        spec.speed = parse_unsigned("speed", &caps[1]);
        spec.speed_traits = group(&caps, 2).unwrap_or_default().to_string();
    }
}

// ============================================================================
// Tests
// ============================================================================
