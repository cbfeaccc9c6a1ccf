//! Import error types.
//!
//! Errors come in two tiers. [`ImportError`] rejects a whole input and yields
//! an unsuccessful outcome with no records. [`BlockError`] and
//! [`RecordError`] reject one block, row, or entry; they are collected as
//! [`EntryError`] pairs while parsing continues.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input-level failures. Nothing is produced when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("No input provided")]
    EmptyInput,

    #[error("No DIFFICULTY found in text")]
    NoDifficulty,

    #[error("No valid spell header found (expected NAME TRADITION TYPE RANK)")]
    NoSpellHeader,

    #[error("No {kind} entries could be parsed")]
    NoEntries { kind: &'static str },
}

/// Record factory failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("{kind} name cannot be empty")]
    EmptyName { kind: &'static str },
}

/// Failure confined to one creature block, spell block, table row, or entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    #[error("Invalid {field} value: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("No hands indicator found (One/Two/Off/-)")]
    MissingHands,

    #[error("No valid damage pattern found")]
    MissingDamage,

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// A recoverable error reported alongside the produced records.
///
/// The label names what failed (`"Creature 2"`, a spell header line, a table
/// row, `"Feature"`), the message says why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryError {
    pub label: String,
    pub message: String,
}

impl EntryError {
    pub fn new(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            message: message.into(),
        }
    }

    /// Build from any error, logging it at warn level.
    pub fn from_error(label: impl Into<String>, err: &dyn std::error::Error) -> Self {
        let entry = Self::new(label, err.to_string());
        log::warn!("Skipped {}: {}", entry.label, entry.message);
        entry
    }
}

impl std::fmt::Display for EntryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label, self.message)
    }
}
