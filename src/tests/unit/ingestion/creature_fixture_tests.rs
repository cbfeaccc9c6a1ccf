//! Creature statblock fixtures

use crate::ingestion::ttrpg::creature::parse_creatures;
use crate::ingestion::ttrpg::records::{icons, Creature, RecordType};

const WARLORD: &str = "\
Hobgoblin Warlord DIFFICULTY 50
Size 1 frightening goblin
Perception 12 (+2); shadowsight
Defense 17 (mail); Health 60
Strength 14 (+4), Agility 12 (+2), Intellect 11 (+1), Will 12 (+2)
Speed 10; climber
Insanity —; Corruption 2
TRAITS
Iron Discipline º The warlord cannot be frightened.
Iron Discipline º Repeated.
ATTACK OPTIONS
Sword (melee) +4 with 1 boon (2d6+2 plus bleeding) ººOn 20+, the target falls prone.ºº
Spear (melee or short range) +4 (1d6+2)
SPECIAL ATTACKS
Cleave º When the warlord kills a creature, it can attack again.
SPECIAL ACTIONS
Rally º Allies within short range heal 1d6 damage.
END OF THE ROUND
Command º One ally can move.
MAGIC Power 2
Primal: Battle Rage (1), Fortify (0)
The warlord learned battle magic in the pits.
DESCRIPTION
A scarred veteran.º Leads the horde.";

fn warlord(clean_traditions: bool) -> Creature {
    let out = parse_creatures(WARLORD, clean_traditions).unwrap();
    assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
    assert_eq!(out.creatures.len(), 1);
    out.creatures.into_iter().next().unwrap()
}

#[test]
fn test_warlord_stats() {
    let creature = warlord(true);
    assert_eq!(creature.name, "Hobgoblin Warlord");
    assert_eq!(creature.img, icons::CREATURE);

    let system = &creature.system;
    assert_eq!(system.difficulty, 50);
    assert!(system.frightening);
    assert!(!system.horrifying);
    assert_eq!(system.descriptor, "goblin");
    assert_eq!(system.perceptionsenses, "shadowsight");
    assert_eq!(system.speedtraits, "climber");
    assert_eq!(system.attributes.strength.value, 14);
    assert_eq!(system.attributes.agility.value, 12);
    assert_eq!(system.attributes.intellect.value, 11);
    assert_eq!(system.attributes.will.value, 12);
    assert_eq!(system.attributes.perception.value, 12);

    let characteristics = &system.characteristics;
    assert_eq!(characteristics.defense, 17);
    assert_eq!(characteristics.health.max, 60);
    assert_eq!(characteristics.power, 2);
    assert_eq!(characteristics.corruption.value, 2);
    assert!(characteristics.insanity.immune);
    assert_eq!(characteristics.insanity.max, 0);
    assert_eq!(creature.prototype_token.width, 1.0);
}

#[test]
fn test_warlord_items_in_section_order() {
    let creature = warlord(true);
    let summary: Vec<(&str, RecordType)> = creature
        .items
        .iter()
        .map(|item| (item.name.as_str(), item.record_type))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("Iron Discipline", RecordType::Feature),
            ("Sword", RecordType::Weapon),
            ("Spear", RecordType::Weapon),
            ("Spear", RecordType::Weapon),
            ("Cleave", RecordType::Talent),
            ("Rally", RecordType::SpecialAction),
            ("Command", RecordType::EndOfRound),
            ("Battle Rage", RecordType::Spell),
            ("Fortify", RecordType::Spell),
        ]
    );
}

#[test]
fn test_repeated_trait_materialized_once() {
    let creature = warlord(true);
    let features: Vec<_> = creature.items_of(RecordType::Feature).collect();
    assert_eq!(features.len(), 1);
    assert_eq!(
        features[0].system.description(),
        "<p>The warlord cannot be frightened.</p>"
    );
}

#[test]
fn test_warlord_weapons() {
    let creature = warlord(true);
    let weapons: Vec<_> = creature
        .items_of(RecordType::Weapon)
        .filter_map(|item| item.weapon())
        .collect();
    assert_eq!(weapons.len(), 3);

    let sword = weapons[0];
    assert_eq!(sword.properties, "Melee");
    assert_eq!(sword.action.rollbonus, "4");
    assert_eq!(sword.action.boonsbanes, "1");
    assert_eq!(sword.action.damage, "2d6+2");
    assert_eq!(sword.action.extra_effect, "bleeding");
    assert_eq!(sword.action.extra_effect20, "On 20+, the target falls prone.");

    assert_eq!(weapons[1].properties, "Melee");
    assert_eq!(weapons[2].properties, "Range (short) (5)");
    assert_eq!(weapons[2].action.attack, "Agility");
}

#[test]
fn test_magic_traditions() {
    let cleaned = warlord(true);
    let spells: Vec<_> = cleaned.items_of(RecordType::Spell).collect();
    assert_eq!(spells[0].spell().unwrap().tradition, "Primal");
    assert_eq!(spells[0].spell().unwrap().rank, 1);
    assert_eq!(spells[1].spell().unwrap().rank, 0);

    let raw = warlord(false);
    let names: Vec<&str> = raw
        .items_of(RecordType::Spell)
        .map(|item| item.name.as_str())
        .collect();
    assert_eq!(names, vec!["Primal: Battle Rage", "Fortify"]);
}

#[test]
fn test_description_joins_prose_and_section() {
    let creature = warlord(true);
    assert_eq!(
        creature.system.description,
        "<p>The warlord learned battle magic in the pits.\nA scarred veteran.<br> Leads the horde.</p>"
    );

    let rally = creature
        .items_of(RecordType::SpecialAction)
        .next()
        .unwrap();
    assert_eq!(
        rally.system.description(),
        "<p>Allies within short range heal [[/r 1d6]] damage.</p>"
    );
}

#[test]
fn test_items_owned_per_creature() {
    let text = format!("{WARLORD}\nRat DIFFICULTY 1\nSize 1/4\nTRAITS\nSwarm º Moves in packs.");
    let out = parse_creatures(&text, true).unwrap();
    assert_eq!(out.creatures.len(), 2);

    let rat = &out.creatures[1];
    assert_eq!(rat.items.len(), 1);
    assert_eq!(rat.items[0].name, "Swarm");
    assert_eq!(rat.prototype_token.width, 0.25);

    let ids: std::collections::HashSet<&str> = out
        .creatures
        .iter()
        .flat_map(|c| std::iter::once(c.id.as_str()).chain(c.items.iter().map(|i| i.id.as_str())))
        .collect();
    assert_eq!(ids.len(), 2 + 9 + 1);
}
