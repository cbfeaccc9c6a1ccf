//! Record Factory
//!
//! Builds fully populated records from already-extracted fields. Every schema
//! field not supplied gets its default. The only validation is a non-empty
//! name; callers skip the record when construction fails.

use super::dice::make_dice_rollable;
use super::error::RecordError;
use super::records::*;
use super::text::generate_id;
use serde_json::Map;

// ============================================================================
// Inputs
// ============================================================================

/// Fields of a weapon parsed from a creature attack line.
#[derive(Debug, Clone, Default)]
pub struct WeaponSpec {
    pub name: String,
    pub attack: Attribute,
    pub roll_bonus: String,
    pub boons_banes: String,
    /// Primary damage first, additional components after.
    pub damage: Vec<DamageComponent>,
    pub properties: String,
    pub description: String,
    pub extra_effect: String,
    pub plus20_damage: String,
    pub extra_effect20: String,
}

/// Hand requirement of a table weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hands {
    One,
    Two,
    Off,
    #[default]
    Unspecified,
}

impl Hands {
    /// Parse a hands column token; dashes mean unspecified.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "one" => Some(Self::One),
            "two" => Some(Self::Two),
            "off" => Some(Self::Off),
            t if super::text::is_dash(t) => Some(Self::Unspecified),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Two => "two",
            Self::Off => "off",
            Self::Unspecified => "",
        }
    }
}

/// Fields of a weapon parsed from an equipment table row.
#[derive(Debug, Clone, Default)]
pub struct TableWeaponSpec {
    pub name: String,
    pub damage: String,
    pub hands: Hands,
    /// Properties, already prefixed with `Ranged`/`Melee`.
    pub properties: String,
    pub price: String,
    pub ranged: bool,
    /// `Agility` or `Defense`.
    pub against: String,
    pub range: String,
    pub ammunition: bool,
}

/// Fields of a spell parsed from a spell block or a creature's magic list.
#[derive(Debug, Clone, Default)]
pub struct SpellSpec {
    pub name: String,
    pub tradition: String,
    pub spell_type: String,
    pub rank: u32,
    pub casting_time: String,
    pub duration: String,
    pub duration_value: u32,
    pub duration_unit: String,
    pub range: String,
    pub target: String,
    pub area: String,
    pub area_value: String,
    pub area_shape: String,
    pub requirement: String,
    pub resistance: String,
    /// Attack attribute named in the effect prose, e.g. `Will`.
    pub attack: String,
    /// Attribute the attack is made against.
    pub against: String,
    /// Defense attribute named in the attack roll section.
    pub defense: String,
    pub has_attack_roll: bool,
    pub damage: Option<DamageComponent>,
    pub additional_damage: Vec<DamageComponent>,
    pub plus20: String,
    pub plus20_damage: String,
    pub heightened: Vec<HeightenedEffect>,
    pub aftereffect: String,
    pub special: String,
    pub sacrifice: String,
    pub permanence: String,
    pub triggered: String,
    /// Unlabeled prose before the first section label.
    pub effect: String,
    /// Flavor text introduced by a bare separator.
    pub flavor: String,
    /// The block as pasted, kept for audit.
    pub raw_text: String,
}

/// Statistics extracted from a creature block.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureSpec {
    pub name: String,
    pub difficulty: u32,
    pub size: String,
    pub perception: i32,
    pub defense: u32,
    pub health: u32,
    /// `None` when the creature is immune to insanity.
    pub insanity: Option<u32>,
    pub corruption: u32,
    pub strength: i32,
    pub agility: i32,
    pub intellect: i32,
    pub will: i32,
    pub speed: u32,
    pub power: u32,
    pub frightening: bool,
    pub horrifying: bool,
    pub perception_senses: String,
    pub speed_traits: String,
    pub descriptor: String,
    pub description: String,
}

impl Default for CreatureSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            difficulty: 0,
            size: "1".to_string(),
            perception: 10,
            defense: 0,
            health: 0,
            insanity: Some(0),
            corruption: 0,
            strength: 10,
            agility: 10,
            intellect: 10,
            will: 10,
            speed: 10,
            power: 0,
            frightening: false,
            horrifying: false,
            perception_senses: String::new(),
            speed_traits: String::new(),
            descriptor: String::new(),
            description: String::new(),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn require_name(name: &str, record_type: RecordType) -> Result<String, RecordError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RecordError::EmptyName {
            kind: record_type.label(),
        });
    }
    Ok(name.to_string())
}

/// Wrap prose in a paragraph after dice markup.
fn paragraph(text: &str) -> String {
    format!("<p>{}</p>", make_dice_rollable(text))
}

fn paragraph_or_empty(text: &str) -> String {
    if text.trim().is_empty() {
        String::new()
    } else {
        paragraph(text)
    }
}

fn item(name: String, record_type: RecordType, img: &str, system: ItemSystem) -> Item {
    Item {
        id: generate_id(),
        name,
        record_type,
        img: img.to_string(),
        system,
        effects: Vec::new(),
        flags: Map::new(),
        stats: RecordStats::now(),
    }
}

fn described(
    name: &str,
    description: &str,
    record_type: RecordType,
    img: &str,
) -> Result<Item, RecordError> {
    let name = require_name(name, record_type)?;
    let system = ItemSystem::Description(DescriptionSystem {
        description: paragraph(description),
        source: String::new(),
        enriched_description: String::new(),
    });
    Ok(item(name, record_type, img, system))
}

/// Resolve a size string to a token footprint.
///
/// Fractions divide, unparsable or non-positive sizes fall back to 1.
pub fn size_footprint(size: &str) -> f64 {
    let size = size.trim();
    let value = match size.split_once('/') {
        Some((num, den)) => match (num.trim().parse::<f64>(), den.trim().parse::<f64>()) {
            (Ok(num), Ok(den)) if den != 0.0 => num / den,
            _ => 0.0,
        },
        None => size.parse::<f64>().unwrap_or(0.0),
    };

    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}

// ============================================================================
// Factories
// ============================================================================

/// A weapon from a creature attack line.
pub fn weapon(spec: WeaponSpec) -> Result<Item, RecordError> {
    let name = require_name(&spec.name, RecordType::Weapon)?;

    let lower = spec.properties.to_lowercase();
    let img = if lower.contains("melee") || lower.contains("reach") {
        icons::MELEE_WEAPON
    } else {
        icons::RANGED_ATTACK
    };

    let mut damage = spec.damage.into_iter();
    let primary = damage.next().unwrap_or_default();

    let action = ActionData {
        against: "Defense".to_string(),
        damageactive: !primary.damage.is_empty(),
        damage: primary.damage,
        damagetype: primary.damagetype,
        boonsbanesactive: !spec.boons_banes.is_empty(),
        boonsbanes: spec.boons_banes,
        plus20damage: spec.plus20_damage,
        damagetypes: damage.collect(),
        attack: spec.attack.to_string(),
        rollbonus: spec.roll_bonus,
        extra_effect: make_dice_rollable(&spec.extra_effect),
        extra_effect20: make_dice_rollable(&spec.extra_effect20),
        ..ActionData::default()
    };

    let system = WeaponSystem {
        description: paragraph_or_empty(&spec.description),
        action,
        hands: String::new(),
        properties: spec.properties,
        wear: true,
        quantity: 1,
        source: String::new(),
        enriched_description: String::new(),
        table: None,
    };

    Ok(item(
        name,
        RecordType::Weapon,
        img,
        ItemSystem::Weapon(Box::new(system)),
    ))
}

/// A weapon from an equipment table row.
pub fn table_weapon(spec: TableWeaponSpec) -> Result<Item, RecordError> {
    let name = require_name(&spec.name, RecordType::Weapon)?;
    let (img, attack) = if spec.ranged {
        (icons::RANGED_WEAPON, Attribute::Agility)
    } else {
        (icons::MELEE_WEAPON, Attribute::Strength)
    };

    let action = ActionData {
        against: spec.against,
        damage: spec.damage.trim().to_string(),
        boonsbanesactive: false,
        attack: attack.to_string(),
        ..ActionData::default()
    };

    let table = TableWeaponFields {
        activated_effect: ActivatedEffect {
            range: spec.range,
            ..ActivatedEffect::default()
        },
        requirement: Requirement::default(),
        availability: String::new(),
        value: spec.price,
        consume: Consume {
            ammorequired: spec.ammunition,
            ..Consume::default()
        },
    };

    let system = WeaponSystem {
        description: String::new(),
        action,
        hands: spec.hands.as_str().to_string(),
        properties: spec.properties,
        wear: true,
        quantity: 1,
        source: String::new(),
        enriched_description: String::new(),
        table: Some(table),
    };

    Ok(item(
        name,
        RecordType::Weapon,
        img,
        ItemSystem::Weapon(Box::new(system)),
    ))
}

pub fn feature(name: &str, description: &str) -> Result<Item, RecordError> {
    described(name, description, RecordType::Feature, icons::SKILL)
}

pub fn special_action(name: &str, description: &str) -> Result<Item, RecordError> {
    described(
        name,
        description,
        RecordType::SpecialAction,
        icons::SPECIAL_ACTION,
    )
}

pub fn end_of_round(name: &str, description: &str) -> Result<Item, RecordError> {
    described(name, description, RecordType::EndOfRound, icons::END_OF_ROUND)
}

/// A talent, optionally filed under a group label.
pub fn talent(name: &str, description: &str, group: Option<&str>) -> Result<Item, RecordError> {
    let name = require_name(name, RecordType::Talent)?;

    let system = TalentSystem {
        description: paragraph(description),
        action: ActionData::default(),
        activated_effect: ActivatedEffect::default(),
        addtonextroll: true,
        multipleoptions: false,
        uses: TalentUses {
            value: String::new(),
            max: String::new(),
        },
        challenge: Challenge {
            active: true,
            attribute: String::new(),
            boonsbanesactive: true,
            boonsbanesselect: String::new(),
            boonsbanes: String::new(),
            attribute_select: BoonsBanesSelect::default(),
        },
        healing: Healing::default(),
        damage: String::new(),
        damagetype: String::new(),
        bonuses: Bonuses {
            defenseactive: true,
            defense: String::new(),
            healthactive: true,
            health: String::new(),
            speedactive: true,
            speed: String::new(),
            poweractive: true,
            power: String::new(),
        },
        groupname: group.unwrap_or_default().trim().to_string(),
        is_active: false,
        source: String::new(),
        enriched_description: String::new(),
    };

    Ok(item(
        name,
        RecordType::Talent,
        icons::SKILL,
        ItemSystem::Talent(Box::new(system)),
    ))
}

pub fn spell(spec: SpellSpec) -> Result<Item, RecordError> {
    let name = require_name(&spec.name, RecordType::Spell)?;

    let description = if spec.raw_text.is_empty() {
        String::new()
    } else {
        format!(
            "{}\n\n<p>—————————</p>\n<p>{}</p>",
            paragraph(&spec.flavor),
            spec.raw_text
        )
    };

    let primary = spec.damage.unwrap_or_default();
    let action = ActionData {
        active: spec.has_attack_roll || !spec.attack.is_empty(),
        against: spec.against,
        damageactive: !primary.damage.is_empty(),
        damage: primary.damage,
        damagetype: primary.damagetype,
        plus20active: !spec.plus20.is_empty(),
        plus20: make_dice_rollable(&spec.plus20),
        plus20damage: spec.plus20_damage,
        defense: spec.defense,
        damagetypes: spec.additional_damage,
        attack: spec.attack.clone(),
        ..ActionData::default()
    };

    let activated_effect = ActivatedEffect {
        activation: Activation {
            kind: spec.casting_time,
            cost: 0,
        },
        duration: DurationValue {
            value: spec.duration_value,
            unit: spec.duration_unit,
        },
        target: TargetArea {
            value: spec.area_value,
            shape: spec.area_shape,
        },
        texture: String::new(),
        range: spec.range,
        uses: EffectUses::default(),
    };

    let attribute = if spec.attack.is_empty() {
        "intellect".to_string()
    } else {
        spec.attack.to_lowercase()
    };

    let system = SpellSystem {
        description,
        action,
        activated_effect,
        tradition: spec.tradition,
        edit: false,
        spelltype: spec.spell_type,
        rank: spec.rank,
        attribute,
        effectdice: String::new(),
        castings: Castings::default(),
        duration: spec.duration,
        target: spec.target,
        area: spec.area,
        requirements: spec.requirement,
        resistance: spec.resistance,
        sacrifice: spec.sacrifice,
        permanence: spec.permanence,
        aftereffect: make_dice_rollable(&spec.aftereffect),
        special: make_dice_rollable(&spec.special),
        triggered: make_dice_rollable(&spec.triggered),
        heightened: spec.heightened,
        roundsleft: 0,
        healing: Healing::default(),
        quantity: 1,
        enriched_description: paragraph_or_empty(&spec.effect),
        source: String::new(),
    };

    Ok(item(
        name,
        RecordType::Spell,
        icons::SPELL,
        ItemSystem::Spell(Box::new(system)),
    ))
}

/// A creature actor owning `items`.
pub fn creature(spec: CreatureSpec, items: Vec<Item>) -> Result<Creature, RecordError> {
    let name = require_name(&spec.name, RecordType::Creature)?;
    let footprint = size_footprint(&spec.size);

    let insanity = match spec.insanity {
        Some(max) => Insanity {
            max,
            value: 0,
            immune: false,
        },
        None => Insanity {
            max: 0,
            value: 0,
            immune: true,
        },
    };

    let system = CreatureSystem {
        description: paragraph_or_empty(&spec.description),
        attributes: Attributes {
            strength: AttributeValue::new(spec.strength),
            agility: AttributeValue::new(spec.agility),
            intellect: AttributeValue::new(spec.intellect),
            will: AttributeValue::new(spec.will),
            perception: AttributeValue::new(spec.perception),
        },
        characteristics: Characteristics {
            health: Health {
                max: spec.health,
                value: spec.health,
                injured: false,
                healingrate: 0,
                max_base: spec.health,
            },
            defense: spec.defense,
            size: spec.size.clone(),
            speed: spec.speed,
            power: spec.power,
            insanity,
            corruption: Corruption {
                value: spec.corruption,
                immune: false,
            },
            defense_base: spec.defense,
            power_base: spec.power,
            size_base: spec.size,
            speed_base: spec.speed,
        },
        difficulty: spec.difficulty,
        difficulty_base: spec.difficulty,
        frightening: spec.frightening,
        horrifying: spec.horrifying,
        descriptor: spec.descriptor,
        perceptionsenses: spec.perception_senses,
        speedtraits: spec.speed_traits,
        armor: String::new(),
        roles: Vec::new(),
    };

    let prototype_token = PrototypeToken {
        name: name.clone(),
        width: footprint,
        height: footprint,
        texture: TokenTexture {
            src: icons::CREATURE.to_string(),
        },
        disposition: -1,
        bar1: TokenBar {
            attribute: "characteristics.health".to_string(),
        },
    };

    Ok(Creature {
        id: generate_id(),
        name,
        record_type: RecordType::Creature,
        img: icons::CREATURE.to_string(),
        system,
        prototype_token,
        items,
        effects: Vec::new(),
        flags: Map::new(),
        stats: RecordStats::now(),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_wraps_description() {
        let item = feature("Fast", "Moves 1d6 extra yards.").unwrap();
        assert_eq!(item.record_type, RecordType::Feature);
        assert_eq!(item.img, icons::SKILL);
        assert_eq!(
            item.system.description(),
            "<p>Moves [[/r 1d6]] extra yards.</p>"
        );
        assert!(item.effects.is_empty());
        assert!(item.flags.is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = feature("  ", "desc").unwrap_err();
        assert_eq!(err, RecordError::EmptyName { kind: "Feature" });
        assert!(talent("", "desc", None).is_err());
        assert!(weapon(WeaponSpec::default()).is_err());
    }

    #[test]
    fn test_weapon_icon_by_properties() {
        let melee = weapon(WeaponSpec {
            name: "Claw".into(),
            properties: "Melee".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(melee.img, icons::MELEE_WEAPON);

        let ranged = weapon(WeaponSpec {
            name: "Spit".into(),
            attack: Attribute::Agility,
            properties: "Range (short) (5)".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ranged.img, icons::RANGED_ATTACK);
        assert_eq!(ranged.weapon().unwrap().action.attack, "Agility");
    }

    #[test]
    fn test_weapon_damage_components() {
        let item = weapon(WeaponSpec {
            name: "Bite".into(),
            damage: vec![
                DamageComponent::new("1d6", "fire"),
                DamageComponent::new("1d4", "cold"),
            ],
            properties: "Melee".into(),
            ..Default::default()
        })
        .unwrap();
        let action = &item.weapon().unwrap().action;
        assert_eq!(action.damage, "1d6");
        assert_eq!(action.damagetype, "fire");
        assert!(action.damageactive);
        assert_eq!(action.damagetypes, vec![DamageComponent::new("1d4", "cold")]);
        assert!(!action.boonsbanesactive);
    }

    #[test]
    fn test_talent_group() {
        let item = talent("Power Attack", "Hit harder.", Some(" Combat ")).unwrap();
        assert_eq!(item.talent().unwrap().groupname, "Combat");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "talent");
        assert_eq!(json["system"]["isActive"], false);
    }

    #[test]
    fn test_table_weapon_fields_serialized() {
        let item = table_weapon(TableWeaponSpec {
            name: "Bow".into(),
            damage: "1d6".into(),
            hands: Hands::Two,
            properties: "Ranged, range 100".into(),
            price: "5 ss".into(),
            ranged: true,
            against: "Defense".into(),
            range: "100".into(),
            ammunition: true,
        })
        .unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["img"], icons::RANGED_WEAPON);
        assert_eq!(json["system"]["hands"], "two");
        assert_eq!(json["system"]["value"], "5 ss");
        assert_eq!(json["system"]["consume"]["ammorequired"], true);
        assert_eq!(json["system"]["activatedEffect"]["range"], "100");
    }

    #[test]
    fn test_attack_line_weapon_has_no_table_fields() {
        let item = weapon(WeaponSpec {
            name: "Claw".into(),
            properties: "Melee".into(),
            ..Default::default()
        })
        .unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert!(json["system"].get("consume").is_none());
        assert!(json["system"].get("activatedEffect").is_none());
    }

    #[test]
    fn test_spell_defaults_for_magic_list() {
        let item = spell(SpellSpec {
            name: "Fireball".into(),
            rank: 2,
            ..Default::default()
        })
        .unwrap();
        let system = item.spell().unwrap();
        assert_eq!(system.rank, 2);
        assert_eq!(system.attribute, "intellect");
        assert!(system.description.is_empty());
        assert!(!system.action.active);
    }

    #[test]
    fn test_size_footprint() {
        assert_eq!(size_footprint("2"), 2.0);
        assert_eq!(size_footprint("1/2"), 0.5);
        assert_eq!(size_footprint("huge"), 1.0);
        assert_eq!(size_footprint("0"), 1.0);
        assert_eq!(size_footprint("1/0"), 1.0);
    }

    #[test]
    fn test_creature_insanity_immune() {
        let creature = creature(
            CreatureSpec {
                name: "Zombie".into(),
                insanity: None,
                size: "1/2".into(),
                ..Default::default()
            },
            Vec::new(),
        )
        .unwrap();
        assert!(creature.system.characteristics.insanity.immune);
        assert_eq!(creature.system.characteristics.insanity.max, 0);
        assert_eq!(creature.prototype_token.width, 0.5);
        assert_eq!(creature.prototype_token.disposition, -1);
    }

    #[test]
    fn test_ids_unique_across_records() {
        let a = feature("A", "").unwrap();
        let b = feature("B", "").unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 16);
    }
}
