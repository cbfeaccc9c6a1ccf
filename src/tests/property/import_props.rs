//! Property-based tests for the import parsers
//!
//! Tests invariants:
//! - One creature per `DIFFICULTY` line
//! - Split lines are trimmed and non-empty
//! - Parsers never panic on arbitrary text
//! - Blank input is never a success

use proptest::prelude::*;

use crate::ingestion::ttrpg::creature::parse_creatures;
use crate::ingestion::ttrpg::import::{run_import, ContentKind, ImportOptions};
use crate::ingestion::ttrpg::text::split_lines;

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// Heading names, including empty and separator-only ones.
fn arb_creature_name() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[A-Z][a-z]{2,10}( [A-Z][a-z]{2,10})?",
        1 => Just(String::new()),
        1 => Just("º".to_string()),
    ]
}

/// Stat numbers, some far past `u32`.
fn arb_number() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..500).prop_map(|n| n.to_string()),
        "[1-9][0-9]{10,24}",
    ]
}

/// Statblock body lines that never contain the keyword.
fn arb_body_line() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..5).prop_map(|n| format!("Size {n}")),
        (arb_number(), arb_number()).prop_map(|(d, h)| format!("Defense {d}; Health {h}")),
        arb_number().prop_map(|n| format!("Strength {n}, Agility –{n}")),
        arb_number().prop_map(|n| format!("Insanity {n}; Corruption {n}")),
        Just("Strength 12 (+2), Agility 9 (–1), Intellect 10 (+0), Will 11 (+1)".to_string()),
        Just("TRAITS".to_string()),
        Just("Darksight º Sees in the dark.".to_string()),
        Just("ATTACK OPTIONS".to_string()),
        Just("Claw (melee or reach 2) +1 (1d6 plus poisoned)".to_string()),
        Just("MAGIC Power 1".to_string()),
        Just("Dark Curse (1), Shadow Step (0)".to_string()),
        "[a-z ,.]{0,40}",
    ]
}

fn arb_block() -> impl Strategy<Value = String> {
    (
        arb_creature_name(),
        arb_number(),
        prop::collection::vec(arb_body_line(), 0..8),
    )
        .prop_map(|(name, difficulty, body)| {
            let mut lines = vec![format!("{name} DIFFICULTY {difficulty}").trim().to_string()];
            lines.extend(body);
            lines.join("\n")
        })
}

/// Arbitrary multi-line text, separators included.
fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "\\PC{0,40}",
            Just("º".to_string()),
            Just("ºº Group".to_string()),
            Just("DIFFICULTY".to_string()),
            Just("FIREBALL ARCANE ATTACK 3".to_string()),
            Just("Bow 1d6 Two range 100 5 ss".to_string()),
            Just("Bite (melee) (1d6)".to_string()),
        ],
        0..12,
    )
    .prop_map(|lines| lines.join("\n"))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_one_creature_per_difficulty_line(blocks in prop::collection::vec(arb_block(), 1..5)) {
        let text = blocks.join("\n");
        let out = parse_creatures(&text, true).unwrap();
        prop_assert_eq!(out.creatures.len(), blocks.len());
        prop_assert!(out.creatures.iter().all(|c| !c.name.is_empty()));
    }

    #[test]
    fn prop_split_lines_trimmed_and_non_empty(text in arb_text()) {
        for line in split_lines(&text) {
            prop_assert!(!line.is_empty());
            prop_assert_eq!(line, line.trim());
        }
    }

    #[test]
    fn prop_parsers_never_panic(text in arb_text()) {
        for kind in ContentKind::ALL {
            let outcome = run_import(kind, &text, ImportOptions::default());
            prop_assert_eq!(outcome.success, !outcome.records.is_empty());
            if outcome.error.is_some() {
                prop_assert!(outcome.records.is_empty());
                prop_assert!(outcome.errors.is_empty());
            }
        }
    }

    #[test]
    fn prop_blank_input_never_succeeds(text in "[ \t\r\n]{0,20}") {
        for kind in ContentKind::ALL {
            let outcome = run_import(kind, &text, ImportOptions::default());
            prop_assert!(!outcome.success);
            prop_assert!(outcome.records.is_empty());
        }
    }
}
