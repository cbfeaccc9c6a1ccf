//! Creature Section Parsing
//!
//! A creature block is divided by header lines (`TRAITS`, `ATTACK OPTIONS`,
//! `SPECIAL ATTACKS`, `SPECIAL ACTIONS`, `END OF THE ROUND`, `REACTIONS`,
//! `MAGIC`, `DESCRIPTION`). The five entry sections share one state machine,
//! configured by the section kind; magic and description have their own
//! collectors.
//!
//! The set of names already materialized is threaded through every section
//! call so that an entry appearing in two sections is created once.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::attack_line::{parse_attack_line, AttackLine};
use super::error::{EntryError, RecordError};
use super::factory::{self, SpellSpec};
use super::records::Item;
use super::text::{split_entry, title_case, SEPARATOR};

// ============================================================================
// Regex Patterns
// ============================================================================

static SECTION_HEADERS: Lazy<Vec<(SectionKind, Regex)>> = Lazy::new(|| {
    [
        (SectionKind::Traits, r"(?i)^traits$"),
        (SectionKind::AttackOptions, r"(?i)^attack\s+options$"),
        (SectionKind::SpecialAttacks, r"(?i)^special\s+attacks$"),
        (SectionKind::SpecialActions, r"(?i)^special\s+actions$"),
        (SectionKind::EndOfRound, r"(?i)^end\s+of\s+(?:the\s+)?round$"),
        (SectionKind::Reactions, r"(?i)^reactions$"),
        (SectionKind::Magic, r"(?i)^magic(?:al)?(?:\s+power\s+\d+)?$"),
        (SectionKind::Description, r"(?i)^description$"),
    ]
    .into_iter()
    .map(|(kind, pattern)| {
        (
            kind,
            Regex::new(pattern).expect("Failed to compile section header regex"),
        )
    })
    .collect()
});

static POWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)power\s+(\d+)").expect("Failed to compile power regex"));

static RANKED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(.+\)").expect("Failed to compile ranked line regex"));

static SPELL_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)\s*\((\d+)\)$").expect("Failed to compile spell entry regex")
});

static TRADITION_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][a-z]*):?\s+(.+)$").expect("Failed to compile tradition prefix regex")
});

// ============================================================================
// Types
// ============================================================================

/// A creature block section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Traits,
    AttackOptions,
    SpecialAttacks,
    SpecialActions,
    EndOfRound,
    /// Recognised only so it terminates the section before it.
    Reactions,
    Magic,
    Description,
}

/// Entry sections in the order they are parsed.
pub const ENTRY_SECTIONS: [SectionKind; 5] = [
    SectionKind::Traits,
    SectionKind::AttackOptions,
    SectionKind::SpecialAttacks,
    SectionKind::SpecialActions,
    SectionKind::EndOfRound,
];

type EntryBuilder = fn(&str, &str) -> Result<Item, RecordError>;

fn attack_option(name: &str, description: &str) -> Result<Item, RecordError> {
    factory::talent(name, description, None)
}

impl SectionKind {
    /// The section a header line opens, if it is one.
    pub fn detect(line: &str) -> Option<Self> {
        let line = line.trim();
        SECTION_HEADERS
            .iter()
            .find(|(_, pattern)| pattern.is_match(line))
            .map(|(kind, _)| *kind)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Traits => "Traits",
            Self::AttackOptions => "Attack Options",
            Self::SpecialAttacks => "Special Attacks",
            Self::SpecialActions => "Special Actions",
            Self::EndOfRound => "End of Round",
            Self::Reactions => "Reactions",
            Self::Magic => "Magic",
            Self::Description => "Description",
        }
    }

    /// Record constructor for entries of this section.
    fn builder(self) -> Option<EntryBuilder> {
        match self {
            Self::Traits => Some(factory::feature),
            Self::AttackOptions | Self::SpecialAttacks => Some(attack_option),
            Self::SpecialActions => Some(factory::special_action),
            Self::EndOfRound => Some(factory::end_of_round),
            Self::Reactions | Self::Magic | Self::Description => None,
        }
    }
}

/// Names already materialized for the current creature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenNames(HashSet<String>);

impl SeenNames {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Record a name; returns false if it was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        self.0.insert(name.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Records and errors produced by one section, plus the updated name set.
#[derive(Debug, Default)]
pub struct SectionOutput {
    pub items: Vec<Item>,
    pub errors: Vec<EntryError>,
    pub seen: SeenNames,
}

// ============================================================================
// Entry Section State Machine
// ============================================================================

/// An entry whose description may continue on following lines.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEntry {
    name: String,
    description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    AwaitingHeader,
    /// Inside the section with no entry open.
    Open,
    Accumulating(PendingEntry),
    /// Just after an attack line; wrapped attack text is discarded.
    AfterAttack,
    Closed,
}

#[derive(Debug)]
enum Event<'a> {
    HeaderSeen(SectionKind),
    AttackLine(AttackLine),
    SeparatorLine { name: &'a str, description: &'a str },
    PlainLine(&'a str),
    EndOfBlock,
}

impl<'a> Event<'a> {
    fn classify(line: &'a str) -> Self {
        if let Some(kind) = SectionKind::detect(line) {
            return Self::HeaderSeen(kind);
        }
        if let Some(attack) = parse_attack_line(line) {
            return Self::AttackLine(attack);
        }
        match split_entry(line) {
            Some((name, description)) => Self::SeparatorLine { name, description },
            None => Self::PlainLine(line),
        }
    }
}

struct SectionMachine {
    kind: SectionKind,
    build: EntryBuilder,
    state: State,
    out: SectionOutput,
}

impl SectionMachine {
    fn new(kind: SectionKind, build: EntryBuilder, seen: SeenNames) -> Self {
        Self {
            kind,
            build,
            state: State::AwaitingHeader,
            out: SectionOutput {
                seen,
                ..SectionOutput::default()
            },
        }
    }

    fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    fn handle(&mut self, event: Event<'_>) {
        let state = std::mem::replace(&mut self.state, State::Closed);
        self.state = match (state, event) {
            (State::Closed, _) => State::Closed,

            (State::AwaitingHeader, Event::HeaderSeen(kind)) if kind == self.kind => State::Open,
            (State::AwaitingHeader, _) => State::AwaitingHeader,

            (state, Event::HeaderSeen(kind)) if kind == self.kind => state,
            (state, Event::HeaderSeen(_)) | (state, Event::EndOfBlock) => {
                self.flush(state);
                State::Closed
            }

            (state, Event::AttackLine(attack)) => {
                self.flush(state);
                self.emit_weapons(&attack);
                State::AfterAttack
            }

            (state, Event::SeparatorLine { name, description }) => {
                self.flush(state);
                State::Accumulating(PendingEntry {
                    name: name.to_string(),
                    description: description.to_string(),
                })
            }

            (State::Accumulating(mut entry), Event::PlainLine(line)) => {
                if !entry.description.is_empty() {
                    entry.description.push(' ');
                }
                entry.description.push_str(line);
                State::Accumulating(entry)
            }

            (State::AfterAttack, Event::PlainLine(line)) => {
                log::debug!("Dropping text after attack line: '{}'", line);
                State::AfterAttack
            }

            (_, Event::PlainLine(line)) => {
                let (name, description) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
                State::Accumulating(PendingEntry {
                    name: name.trim().to_string(),
                    description: description.trim().to_string(),
                })
            }
        };
    }

    fn flush(&mut self, state: State) {
        let State::Accumulating(entry) = state else {
            return;
        };
        if self.out.seen.contains(&entry.name) {
            log::debug!("Skipping repeated entry '{}'", entry.name);
            return;
        }
        match (self.build)(&entry.name, entry.description.trim()) {
            Ok(item) => {
                self.out.seen.insert(&entry.name);
                self.out.items.push(item);
            }
            Err(err) => self
                .out
                .errors
                .push(EntryError::from_error(self.kind.label(), &err)),
        }
    }

    fn emit_weapons(&mut self, attack: &AttackLine) {
        match attack.weapons() {
            Ok(weapons) => self.out.items.extend(weapons),
            Err(err) => self
                .out
                .errors
                .push(EntryError::from_error(self.kind.label(), &err)),
        }
    }
}

/// Run one entry section over a creature block's lines.
///
/// Lines before the section's header are ignored; the section ends at any
/// other section header or at the end of the block. Attack lines become
/// weapons and take precedence over the section's own entry grammar.
/// Sections without entries (magic, description, reactions) produce nothing.
pub fn parse_section(lines: &[&str], kind: SectionKind, seen: SeenNames) -> SectionOutput {
    let Some(build) = kind.builder() else {
        return SectionOutput {
            seen,
            ..SectionOutput::default()
        };
    };

    let mut machine = SectionMachine::new(kind, build, seen);
    for line in lines {
        if machine.is_closed() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event = match machine.state {
            State::AwaitingHeader => match SectionKind::detect(line) {
                Some(found) => Event::HeaderSeen(found),
                None => continue,
            },
            _ => Event::classify(line),
        };
        machine.handle(event);
    }
    machine.handle(Event::EndOfBlock);

    machine.out
}

// ============================================================================
// Magic
// ============================================================================

/// Output of the magic section.
#[derive(Debug, Default)]
pub struct MagicOutput {
    pub items: Vec<Item>,
    pub errors: Vec<EntryError>,
    pub seen: SeenNames,
    pub power: Option<u32>,
    /// Lines without a spell rank, for the creature description.
    pub prose: Vec<String>,
}

/// Lines between `header`'s line and the next other header.
fn section_body<'a>(lines: &[&'a str], kind: SectionKind) -> Option<(&'a str, Vec<&'a str>)> {
    let start = lines
        .iter()
        .position(|line| SectionKind::detect(line) == Some(kind))?;

    let body = lines[start + 1..]
        .iter()
        .copied()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take_while(|line| match SectionKind::detect(line) {
            Some(found) => found == kind,
            None => true,
        })
        .filter(|line| SectionKind::detect(line).is_none())
        .collect();

    Some((lines[start].trim(), body))
}

/// Split `Tradition Spell (1), Other (2)` into an optional tradition and the
/// list text.
fn strip_tradition(line: &str) -> (Option<String>, &str) {
    match TRADITION_PREFIX.captures(line) {
        Some(caps) => {
            let rest = caps.get(2).map_or("", |m| m.as_str());
            if rest.starts_with('(') {
                (None, line)
            } else {
                (Some(title_case(&caps[1])), rest)
            }
        }
        None => (None, line),
    }
}

/// Group spell lines into comma-separated lists with their tradition.
///
/// A line without a tradition prefix continues the previous list when that
/// list stops mid-entry, so `light` / `(0)` is rejoined before splitting.
/// Otherwise it starts a new list under the previous tradition.
fn join_spell_lines(lines: &[&str], clean_traditions: bool) -> Vec<(Option<String>, String)> {
    let mut lists: Vec<(Option<String>, String)> = Vec::new();

    for line in lines {
        let (tradition, text) = if clean_traditions {
            strip_tradition(line)
        } else {
            (None, *line)
        };

        match lists.last_mut() {
            Some((_, list)) if tradition.is_none() && !list.ends_with(')') => {
                list.push(' ');
                list.push_str(text);
            }
            Some((previous, _)) if tradition.is_none() => {
                let previous = previous.clone();
                lists.push((previous, text.to_string()));
            }
            _ => lists.push((tradition, text.to_string())),
        }
    }

    lists
}

/// Parse the magic section: power, spell list, and prose.
///
/// With `clean_traditions`, a leading capitalized word on a spell line is
/// taken as the tradition of that line's spells.
pub fn parse_magic(lines: &[&str], clean_traditions: bool, seen: SeenNames) -> MagicOutput {
    let mut out = MagicOutput {
        seen,
        ..MagicOutput::default()
    };

    let Some((header, body)) = section_body(lines, SectionKind::Magic) else {
        return out;
    };

    out.power = POWER
        .captures(header)
        .and_then(|caps| caps[1].parse::<u32>().ok());

    let mut spell_lines: Vec<&str> = Vec::new();
    for line in body {
        if let Some(attack) = parse_attack_line(line) {
            match attack.weapons() {
                Ok(weapons) => out.items.extend(weapons),
                Err(err) => out.errors.push(EntryError::from_error("Magic", &err)),
            }
            continue;
        }
        if let Some(caps) = POWER.captures(line) {
            out.power = caps[1].parse::<u32>().ok().or(out.power);
            continue;
        }
        if RANKED.is_match(line) {
            spell_lines.push(line);
        } else {
            out.prose.push(line.to_string());
        }
    }

    for (tradition, list) in join_spell_lines(&spell_lines, clean_traditions) {
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let Some(caps) = SPELL_ENTRY.captures(entry) else {
                log::debug!("Ignoring unranked spell entry '{}'", entry);
                continue;
            };
            let name = caps[1].trim();
            if out.seen.contains(name) {
                continue;
            }
            let spec = SpellSpec {
                name: name.to_string(),
                rank: caps[2].parse().unwrap_or(0),
                tradition: tradition.clone().unwrap_or_default(),
                ..SpellSpec::default()
            };
            match factory::spell(spec) {
                Ok(spell) => {
                    out.seen.insert(name);
                    out.items.push(spell);
                }
                Err(err) => out.errors.push(EntryError::from_error("Magic", &err)),
            }
        }
    }

    out
}

// ============================================================================
// Description
// ============================================================================

/// Collect the description section, joining lines with spaces and turning
/// separators into line breaks.
pub fn parse_description(lines: &[&str]) -> Option<String> {
    let (_, body) = section_body(lines, SectionKind::Description)?;
    if body.is_empty() {
        return None;
    }
    Some(body.join(" ").replace(SEPARATOR, "<br>"))
}

// ============================================================================
// Tests
// ============================================================================
