//! Spell write-up fixtures

use crate::ingestion::ttrpg::records::{icons, DamageComponent, HeightenedEffect, SpellSystem};
use crate::ingestion::ttrpg::spell::parse_spells;

const SPELLS: &str = "\
Lines before the first header are ignored.
FLAME BURST FIRE ATTACK 2
Make an Intellect attack roll against the target's Agility. The target takes 2d6 + 3 damage.
Area A sphere with a 2-yard radius centered on a point within medium range
Duration 1 round
Requirement You must be able to see the target point.
Attack Roll: Agility
Resistance Roll Strength to halve damage
Attack Roll 20+ The target catches fire and takes 1d6 extra damage.
Aftereffect The area burns for 1d3 rounds.
Sacrifice You can sacrifice a casting to deal 1d6 more damage.
Permanence The scorch marks never fade.
Triggered When a creature enters the area.
Special This spell ignores cover.
Heightened (+1): 1d6 more damage. (+2): The sphere doubles in size.
º Searing flames erupt in a roar of fire.
WARD ARCANE UTILITY 0
The target is warded.
Casting Time 1 action
Duration 1 minute
Target One creature within short range";

fn spells() -> Vec<(String, SpellSystem)> {
    let out = parse_spells(SPELLS).unwrap();
    assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
    out.items
        .iter()
        .map(|item| {
            assert_eq!(item.img, icons::SPELL);
            (item.name.clone(), item.spell().unwrap().clone())
        })
        .collect()
}

#[test]
fn test_two_spells_in_order() {
    let spells = spells();
    let names: Vec<&str> = spells.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["FLAME BURST", "WARD"]);
}

#[test]
fn test_attack_spell_fields() {
    let (_, burst) = &spells()[0];
    assert_eq!(burst.tradition, "Fire");
    assert_eq!(burst.spelltype, "Attack");
    assert_eq!(burst.rank, 2);
    assert_eq!(burst.attribute, "intellect");
    assert_eq!(burst.requirements, "You must be able to see the target point.");
    assert_eq!(burst.resistance, "Strength to halve damage");
    assert_eq!(burst.aftereffect, "The area burns for [[/r 1d3]] rounds.");
    assert_eq!(burst.sacrifice, "You can sacrifice a casting to deal [[/r 1d6]] more damage.");
    assert_eq!(burst.permanence, "The scorch marks never fade.");
    assert_eq!(burst.triggered, "When a creature enters the area.");
    assert_eq!(burst.special, "This spell ignores cover.");

    let action = &burst.action;
    assert!(action.active);
    assert_eq!(action.attack, "Intellect");
    assert_eq!(action.against, "Agility");
    assert_eq!(action.defense, "Agility");
    assert_eq!(action.damage, "2d6 + 3");
    assert_eq!(action.damagetype, "fire");
    assert!(action.damageactive);
    assert!(action.damagetypes.is_empty());
    assert_eq!(
        action.plus20,
        "The target catches fire and takes [[/r 1d6]] extra damage."
    );
    assert_eq!(action.plus20damage, "1d6");

    let effect = &burst.activated_effect;
    assert_eq!(effect.duration.value, 1);
    assert_eq!(effect.duration.unit, "round");
    assert_eq!(effect.target.value, "2");
    assert_eq!(effect.target.shape, "sphere");
}

#[test]
fn test_heightened_entries() {
    let (_, burst) = &spells()[0];
    assert_eq!(
        burst.heightened,
        vec![
            HeightenedEffect {
                level: 1,
                content: "[[/r 1d6]] more damage.".into(),
            },
            HeightenedEffect {
                level: 2,
                content: "The sphere doubles in size.".into(),
            },
        ]
    );
}

#[test]
fn test_description_keeps_source_text() {
    let (_, burst) = &spells()[0];
    assert!(burst
        .description
        .starts_with("<p>Searing flames erupt in a roar of fire.</p>\n\n<p>—————————</p>\n<p>FLAME BURST FIRE ATTACK 2\n"));
    assert!(burst.description.contains("Heightened (+1): 1d6 more damage."));
    assert!(burst.enriched_description.starts_with("<p>Make an Intellect attack roll"));
}

#[test]
fn test_utility_spell_defaults() {
    let (_, ward) = &spells()[1];
    assert_eq!(ward.tradition, "Arcane");
    assert_eq!(ward.spelltype, "Utility");
    assert_eq!(ward.rank, 0);
    assert_eq!(ward.attribute, "intellect");
    assert_eq!(ward.target, "One creature within short range");
    assert_eq!(ward.activated_effect.activation.kind, "1 action");
    assert_eq!(ward.activated_effect.duration.unit, "minute");
    assert_eq!(ward.enriched_description, "<p>The target is warded.</p>");

    assert!(!ward.action.active);
    assert!(!ward.action.damageactive);
    assert!(!ward.action.plus20active);
    assert!(ward.heightened.is_empty());
}

#[test]
fn test_flavor_dice_pairing() {
    let text = "\
HAIL STORM WATER ATTACK 4
º Ice deals 3d6 cold damage and then 1d6 force damage.";
    let out = parse_spells(text).unwrap();
    let storm = out.items[0].spell().unwrap();
    assert_eq!(storm.action.damage, "3d6");
    assert_eq!(storm.action.damagetype, "cold");
    assert_eq!(storm.action.damagetypes, vec![DamageComponent::new("1d6", "force")]);
}

#[test]
fn test_bad_header_reported_with_header_line() {
    let text = "FIREBALL ARCANE ATTACK 3\nDuration 1 round\nFIRE BALL ARCANE ATTACK 99999999999";
    let out = parse_spells(text).unwrap();
    assert_eq!(out.items.len(), 1);
    assert_eq!(out.errors.len(), 1);
    assert_eq!(out.errors[0].label, "FIRE BALL ARCANE ATTACK 99999999999");
}
