//! Property-based tests for dice markup
//!
//! Tests invariants:
//! - Markup is idempotent
//! - Dice expressions are wrapped

use proptest::prelude::*;

use crate::ingestion::ttrpg::dice::{extract_dice_rolls, make_dice_rollable};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// Dice expressions such as `2d6`, `1d6 + 2`, `3d8-1d4`.
fn arb_dice() -> impl Strategy<Value = String> {
    (1u32..10, 2u32..21, prop::option::of((prop_oneof![Just('+'), Just('-')], 1u32..10, any::<bool>())))
        .prop_map(|(count, sides, modifier)| match modifier {
            Some((sign, n, spaced)) if spaced => format!("{count}d{sides} {sign} {n}"),
            Some((sign, n, _)) => format!("{count}d{sides}{sign}{n}"),
            None => format!("{count}d{sides}"),
        })
}

/// Prose with dice expressions, signs, and separators mixed in.
fn arb_prose() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-zA-Z]{1,8}",
            arb_dice(),
            Just("+".to_string()),
            Just(" - ".to_string()),
            Just("º".to_string()),
            Just("[[/r 1d6]]".to_string()),
            "[0-9]{1,3}",
        ],
        0..20,
    )
    .prop_map(|words| words.join(" "))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_markup_is_idempotent(text in arb_prose()) {
        let once = make_dice_rollable(&text);
        let twice = make_dice_rollable(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_arbitrary_text_is_idempotent(text in "\\PC{0,80}") {
        let once = make_dice_rollable(&text);
        prop_assert_eq!(make_dice_rollable(&once), once);
    }

    #[test]
    fn prop_dice_are_wrapped(dice in arb_dice(), word in "[a-z]{1,8}") {
        let text = format!("{word} {dice} {word}");
        let marked = make_dice_rollable(&text);
        prop_assert!(marked.contains("[[/r "), "not wrapped: {}", marked);
        prop_assert_eq!(extract_dice_rolls(&marked).len(), 1);
    }
}
