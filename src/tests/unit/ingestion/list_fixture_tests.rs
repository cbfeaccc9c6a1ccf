//! Talent and feature list fixtures

use crate::ingestion::ttrpg::import::{run_import, ContentKind, ImportOptions, ImportRecord};
use crate::ingestion::ttrpg::list_parser::{parse_features, parse_talents};
use crate::ingestion::ttrpg::records::{icons, RecordType};

const WARRIOR_TALENTS: &str = "\
ºº Warrior Level 1
Weapon Training º When you attack with a weapon, you make the attack roll with
1 boon.
Catch Your Breath º You can use an action to heal damage equal to your healing
rate.
ºº Warrior Level 2
Forceful Strike º When the total of your attack roll is 20 or higher and exceeds
the target number by at least 5, the attack deals 1d6 extra damage.";

#[test]
fn test_warrior_talents_grouped() {
    let out = parse_talents(WARRIOR_TALENTS);
    assert!(out.errors.is_empty());

    let talents: Vec<(&str, &str)> = out
        .items
        .iter()
        .map(|item| (item.name.as_str(), item.talent().unwrap().groupname.as_str()))
        .collect();
    assert_eq!(
        talents,
        vec![
            ("Weapon Training", "Warrior Level 1"),
            ("Catch Your Breath", "Warrior Level 1"),
            ("Forceful Strike", "Warrior Level 2"),
        ]
    );
    assert!(out.items.iter().all(|i| i.img == icons::SKILL));
}

#[test]
fn test_wrapped_lines_joined() {
    let out = parse_talents(WARRIOR_TALENTS);
    assert_eq!(
        out.items[0].system.description(),
        "<p>When you attack with a weapon, you make the attack roll with 1 boon.</p>"
    );
    assert_eq!(
        out.items[2].system.description(),
        "<p>When the total of your attack roll is 20 or higher and exceeds the target number by at least 5, the attack deals [[/r 1d6]] extra damage.</p>"
    );
}

#[test]
fn test_features_ignore_group_lines_as_entries() {
    // Feature lists have no groups; a `ºº` line is an entry with an empty name.
    let out = parse_features("ºº Not a group\nShadowy º Hard to see.");
    assert_eq!(out.items.len(), 1);
    assert_eq!(out.items[0].record_type, RecordType::Feature);
    assert_eq!(out.errors.len(), 1);
}

#[test]
fn test_import_dispatch_for_lists() {
    let outcome = run_import(ContentKind::Talent, WARRIOR_TALENTS, ImportOptions::default());
    assert!(outcome.success);
    assert_eq!(outcome.records.len(), 3);
    assert!(matches!(&outcome.records[0], ImportRecord::Item(item) if item.record_type == RecordType::Talent));

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["items"][2]["system"]["groupname"], "Warrior Level 2");
    assert_eq!(json["items"][2]["effects"], serde_json::json!([]));
    assert_eq!(json["items"][2]["flags"], serde_json::json!({}));
}
