//! Import Dispatch
//!
//! Routes raw text to the parser for the selected content kind and wraps the
//! result in a single outcome value: a success flag, the produced records,
//! and the recoverable errors met along the way.

use std::fmt;
use std::str::FromStr;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::creature::parse_creatures;
use super::error::{EntryError, ImportError};
use super::list_parser::{parse_features, parse_talents, ListOutput};
use super::records::{Creature, Item};
use super::spell::parse_spells;
use super::weapon_table::parse_weapon_table;

// ============================================================================
// Content Kind
// ============================================================================

/// The kind of text being imported.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Creature,
    Feature,
    Spell,
    Talent,
    Weapon,
}

impl ContentKind {
    pub const ALL: [ContentKind; 5] = [
        Self::Creature,
        Self::Feature,
        Self::Spell,
        Self::Talent,
        Self::Weapon,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Creature => "creature",
            Self::Feature => "feature",
            Self::Spell => "spell",
            Self::Talent => "talent",
            Self::Weapon => "weapon",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| format!("Unknown content kind: {s}"))
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Options the host passes alongside the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Strip a leading tradition word from creature spell entries.
    pub normalize_traditions: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            normalize_traditions: true,
        }
    }
}

/// One produced record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImportRecord {
    Item(Item),
    Creature(Box<Creature>),
}

impl ImportRecord {
    pub fn name(&self) -> &str {
        match self {
            Self::Item(item) => &item.name,
            Self::Creature(creature) => &creature.name,
        }
    }
}

/// Result of one import run.
///
/// Serializes as `{success, items|creatures, errors}`; a fatal failure adds
/// an `error` message and carries no records.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub kind: ContentKind,
    pub success: bool,
    pub records: Vec<ImportRecord>,
    pub errors: Vec<EntryError>,
    pub error: Option<String>,
}

impl ImportOutcome {
    fn completed(kind: ContentKind, records: Vec<ImportRecord>, errors: Vec<EntryError>) -> Self {
        if records.is_empty() && errors.is_empty() {
            return Self::failed(kind, ImportError::NoEntries { kind: kind.as_str() });
        }
        Self {
            kind,
            success: !records.is_empty(),
            records,
            errors,
            error: None,
        }
    }

    fn failed(kind: ContentKind, err: ImportError) -> Self {
        log::warn!("{kind} import failed: {err}");
        Self {
            kind,
            success: false,
            records: Vec::new(),
            errors: Vec::new(),
            error: Some(err.to_string()),
        }
    }

    fn from_list(kind: ContentKind, out: ListOutput) -> Self {
        let records = out.items.into_iter().map(ImportRecord::Item).collect();
        Self::completed(kind, records, out.errors)
    }

    /// Key the record list is serialized under.
    pub fn records_key(&self) -> &'static str {
        match self.kind {
            ContentKind::Creature => "creatures",
            _ => "items",
        }
    }
}

impl Serialize for ImportOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("success", &self.success)?;
        if let Some(error) = &self.error {
            map.serialize_entry("error", error)?;
        }
        map.serialize_entry(self.records_key(), &self.records)?;
        map.serialize_entry("errors", &self.errors)?;
        map.end()
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Parse `text` as `kind`.
///
/// Never fails: input-level problems come back as an unsuccessful outcome
/// with a single message.
pub fn run_import(kind: ContentKind, text: &str, options: ImportOptions) -> ImportOutcome {
    if text.trim().is_empty() {
        return ImportOutcome::failed(kind, ImportError::EmptyInput);
    }
    log::info!("Importing {kind} text ({} bytes)", text.len());

    match kind {
        ContentKind::Creature => match parse_creatures(text, options.normalize_traditions) {
            Ok(out) => {
                let records = out
                    .creatures
                    .into_iter()
                    .map(|c| ImportRecord::Creature(Box::new(c)))
                    .collect();
                ImportOutcome::completed(kind, records, out.errors)
            }
            Err(err) => ImportOutcome::failed(kind, err),
        },
        ContentKind::Spell => match parse_spells(text) {
            Ok(out) => ImportOutcome::from_list(kind, out),
            Err(err) => ImportOutcome::failed(kind, err),
        },
        ContentKind::Feature => ImportOutcome::from_list(kind, parse_features(text)),
        ContentKind::Talent => ImportOutcome::from_list(kind, parse_talents(text)),
        ContentKind::Weapon => ImportOutcome::from_list(kind, parse_weapon_table(text)),
    }
}

// ============================================================================
// Tests
// ============================================================================
