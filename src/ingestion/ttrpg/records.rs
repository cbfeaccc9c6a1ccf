//! Record Data Model
//!
//! Typed records matching the document shape of the Shadow of the Demon Lord
//! game system: items (weapons, features, talents, special actions,
//! end-of-round actions, spells) and creature actors owning their items.
//!
//! Records are built once by [`super::factory`] and never mutated afterwards.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Icons
// ============================================================================

/// Image paths assigned to records by type.
pub mod icons {
    pub const MELEE_WEAPON: &str = "systems/demonlord/assets/icons/weapons/fist.webp";
    pub const RANGED_ATTACK: &str = "icons/magic/light/explosion-impact-purple.webp";
    pub const RANGED_WEAPON: &str = "systems/demonlord/assets/icons/weapons/rifle.webp";
    pub const SKILL: &str = "systems/demonlord/assets/icons/skills/fist.webp";
    pub const SPECIAL_ACTION: &str = "systems/demonlord/assets/icons/weapons/fist.webp";
    pub const END_OF_ROUND: &str = "icons/commodities/tech/watch.webp";
    pub const SPELL: &str = "systems/demonlord/assets/icons/skills/spellbook.webp";
    pub const CREATURE: &str = "icons/svg/mystery-man.svg";
}

// ============================================================================
// Shared Types
// ============================================================================

/// Record type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Weapon,
    Feature,
    Talent,
    #[serde(rename = "specialaction")]
    SpecialAction,
    #[serde(rename = "endoftheround")]
    EndOfRound,
    Spell,
    Creature,
}

impl RecordType {
    /// Human-readable label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Weapon => "Weapon",
            Self::Feature => "Feature",
            Self::Talent => "Talent",
            Self::SpecialAction => "Special action",
            Self::EndOfRound => "End of round action",
            Self::Spell => "Spell",
            Self::Creature => "Creature",
        }
    }
}

/// The five creature attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Attribute {
    #[default]
    Strength,
    Agility,
    Intellect,
    Will,
    Perception,
}

impl Attribute {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strength => "Strength",
            Self::Agility => "Agility",
            Self::Intellect => "Intellect",
            Self::Will => "Will",
            Self::Perception => "Perception",
        }
    }

    /// Parse an attribute name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "strength" => Some(Self::Strength),
            "agility" => Some(Self::Agility),
            "intellect" => Some(Self::Intellect),
            "will" => Some(Self::Will),
            "perception" => Some(Self::Perception),
            _ => None,
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creation and modification timestamps in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStats {
    pub created_time: i64,
    pub modified_time: i64,
}

impl RecordStats {
    pub fn now() -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            created_time: now,
            modified_time: now,
        }
    }
}

/// One damage term: a dice or flat expression with an optional type label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageComponent {
    pub damage: String,
    pub damagetype: String,
}

impl DamageComponent {
    pub fn new(damage: impl Into<String>, damagetype: impl Into<String>) -> Self {
        Self {
            damage: damage.into(),
            damagetype: damagetype.into(),
        }
    }
}

/// Per-attribute boons/banes selection flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoonsBanesSelect {
    pub strengthboonsbanesselect: bool,
    pub agilityboonsbanesselect: bool,
    pub intellectboonsbanesselect: bool,
    pub willboonsbanesselect: bool,
    pub perceptionboonsbanesselect: bool,
}

/// Attack roll configuration shared by weapons, talents, and spells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionData {
    pub active: bool,
    pub against: String,
    pub damageactive: bool,
    pub damage: String,
    pub damagetype: String,
    pub boonsbanesactive: bool,
    pub boonsbanes: String,
    pub plus20active: bool,
    pub plus20: String,
    pub plus20damage: String,
    pub defense: String,
    pub defenseboonsbanes: String,
    pub damagetypes: Vec<DamageComponent>,
    #[serde(flatten)]
    pub boonsbanesselect: BoonsBanesSelect,
    pub extraboonsbanes: String,
    pub extradamage: String,
    pub extraplus20damage: String,
    pub attack: String,
    pub rollbonus: String,
    #[serde(rename = "extraEffect")]
    pub extra_effect: String,
    #[serde(rename = "extraEffect20")]
    pub extra_effect20: String,
}

impl Default for ActionData {
    fn default() -> Self {
        Self {
            active: true,
            against: String::new(),
            damageactive: true,
            damage: String::new(),
            damagetype: String::new(),
            boonsbanesactive: true,
            boonsbanes: String::new(),
            plus20active: true,
            plus20: String::new(),
            plus20damage: String::new(),
            defense: String::new(),
            defenseboonsbanes: String::new(),
            damagetypes: Vec::new(),
            boonsbanesselect: BoonsBanesSelect::default(),
            extraboonsbanes: String::new(),
            extradamage: String::new(),
            extraplus20damage: String::new(),
            attack: String::new(),
            rollbonus: String::new(),
            extra_effect: String::new(),
            extra_effect20: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    #[serde(rename = "type")]
    pub kind: String,
    pub cost: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationValue {
    pub value: u32,
    #[serde(rename = "type")]
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetArea {
    pub value: String,
    #[serde(rename = "type")]
    pub shape: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectUses {
    pub value: u32,
    pub max: u32,
    pub per: String,
}

/// Activation, duration, target, and range of an item's effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivatedEffect {
    pub activation: Activation,
    pub duration: DurationValue,
    pub target: TargetArea,
    pub texture: String,
    pub range: String,
    pub uses: EffectUses,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Healing {
    pub healactive: bool,
    pub healing: bool,
    pub rate: String,
}

impl Default for Healing {
    fn default() -> Self {
        Self {
            healactive: true,
            healing: false,
            rate: String::new(),
        }
    }
}

// ============================================================================
// Item Payloads
// ============================================================================

/// Extra fields carried by weapons imported from an equipment table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableWeaponFields {
    #[serde(rename = "activatedEffect")]
    pub activated_effect: ActivatedEffect,
    pub requirement: Requirement,
    pub availability: String,
    /// Price, e.g. `"5 ss"`.
    pub value: String,
    pub consume: Consume,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub attribute: String,
    pub minvalue: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consume {
    pub ammorequired: bool,
    pub amount: u32,
    pub ammoitemid: String,
}

impl Default for Consume {
    fn default() -> Self {
        Self {
            ammorequired: false,
            amount: 1,
            ammoitemid: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponSystem {
    pub description: String,
    pub action: ActionData,
    /// `one`, `two`, `off`, or empty.
    pub hands: String,
    pub properties: String,
    pub wear: bool,
    pub quantity: u32,
    pub source: String,
    #[serde(rename = "enrichedDescription")]
    pub enriched_description: String,
    #[serde(flatten)]
    pub table: Option<TableWeaponFields>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalentUses {
    pub value: String,
    pub max: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub active: bool,
    pub attribute: String,
    pub boonsbanesactive: bool,
    pub boonsbanesselect: String,
    pub boonsbanes: String,
    #[serde(flatten)]
    pub attribute_select: BoonsBanesSelect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonuses {
    pub defenseactive: bool,
    pub defense: String,
    pub healthactive: bool,
    pub health: String,
    pub speedactive: bool,
    pub speed: String,
    pub poweractive: bool,
    pub power: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalentSystem {
    pub description: String,
    pub action: ActionData,
    #[serde(rename = "activatedEffect")]
    pub activated_effect: ActivatedEffect,
    pub addtonextroll: bool,
    pub multipleoptions: bool,
    pub uses: TalentUses,
    pub challenge: Challenge,
    pub healing: Healing,
    pub damage: String,
    pub damagetype: String,
    pub bonuses: Bonuses,
    pub groupname: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    pub source: String,
    #[serde(rename = "enrichedDescription")]
    pub enriched_description: String,
}

/// One heightened-casting entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightenedEffect {
    /// Rank increment, 0 when the text carried no `(+N)` marker.
    pub level: u32,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Castings {
    pub value: String,
    pub max: String,
    #[serde(rename = "ignoreCalculation")]
    pub ignore_calculation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSystem {
    pub description: String,
    pub action: ActionData,
    #[serde(rename = "activatedEffect")]
    pub activated_effect: ActivatedEffect,
    pub tradition: String,
    pub edit: bool,
    pub spelltype: String,
    pub rank: u32,
    pub attribute: String,
    pub effectdice: String,
    pub castings: Castings,
    pub duration: String,
    pub target: String,
    pub area: String,
    pub requirements: String,
    pub resistance: String,
    pub sacrifice: String,
    pub permanence: String,
    pub aftereffect: String,
    pub special: String,
    pub triggered: String,
    pub heightened: Vec<HeightenedEffect>,
    pub roundsleft: u32,
    pub healing: Healing,
    pub quantity: u32,
    #[serde(rename = "enrichedDescription")]
    pub enriched_description: String,
    pub source: String,
}

/// Payload of features, special actions, and end-of-round actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionSystem {
    pub description: String,
    pub source: String,
    #[serde(rename = "enrichedDescription")]
    pub enriched_description: String,
}

/// Type-specific payload of an [`Item`].
///
/// Variant order matters for deserialization: each payload is tried in turn
/// and the bare description shape accepts anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemSystem {
    Weapon(Box<WeaponSystem>),
    Spell(Box<SpellSystem>),
    Talent(Box<TalentSystem>),
    Description(DescriptionSystem),
}

impl ItemSystem {
    pub fn description(&self) -> &str {
        match self {
            Self::Weapon(system) => &system.description,
            Self::Spell(system) => &system.description,
            Self::Talent(system) => &system.description,
            Self::Description(system) => &system.description,
        }
    }

    pub fn as_weapon(&self) -> Option<&WeaponSystem> {
        match self {
            Self::Weapon(system) => Some(&**system),
            _ => None,
        }
    }

    pub fn as_spell(&self) -> Option<&SpellSystem> {
        match self {
            Self::Spell(system) => Some(&**system),
            _ => None,
        }
    }

    pub fn as_talent(&self) -> Option<&TalentSystem> {
        match self {
            Self::Talent(system) => Some(&**system),
            _ => None,
        }
    }
}

// ============================================================================
// Items
// ============================================================================

/// An item record: weapon, feature, talent, special action, end-of-round
/// action, or spell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub img: String,
    pub system: ItemSystem,
    pub effects: Vec<Value>,
    pub flags: Map<String, Value>,
    #[serde(rename = "_stats")]
    pub stats: RecordStats,
}

impl Item {
    pub fn weapon(&self) -> Option<&WeaponSystem> {
        self.system.as_weapon()
    }

    pub fn spell(&self) -> Option<&SpellSystem> {
        self.system.as_spell()
    }

    pub fn talent(&self) -> Option<&TalentSystem> {
        self.system.as_talent()
    }
}

// ============================================================================
// Creatures
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub value: i32,
    pub modifier: i32,
    pub base: i32,
}

impl AttributeValue {
    pub fn new(value: i32) -> Self {
        Self {
            value,
            modifier: 0,
            base: value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: AttributeValue,
    pub agility: AttributeValue,
    pub intellect: AttributeValue,
    pub will: AttributeValue,
    pub perception: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub max: u32,
    pub value: u32,
    pub injured: bool,
    pub healingrate: u32,
    #[serde(rename = "maxBase")]
    pub max_base: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insanity {
    pub max: u32,
    pub value: u32,
    pub immune: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corruption {
    pub value: u32,
    pub immune: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Characteristics {
    pub health: Health,
    pub defense: u32,
    /// Integer or simple fraction, e.g. `"2"` or `"1/2"`.
    pub size: String,
    pub speed: u32,
    pub power: u32,
    pub insanity: Insanity,
    pub corruption: Corruption,
    pub defense_base: u32,
    pub power_base: u32,
    pub size_base: String,
    pub speed_base: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureSystem {
    pub description: String,
    pub attributes: Attributes,
    pub characteristics: Characteristics,
    pub difficulty: u32,
    #[serde(rename = "difficultyBase")]
    pub difficulty_base: u32,
    pub frightening: bool,
    pub horrifying: bool,
    pub descriptor: String,
    pub perceptionsenses: String,
    pub speedtraits: String,
    pub armor: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTexture {
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBar {
    pub attribute: String,
}

/// Token defaults placed on the scene for this creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrototypeToken {
    pub name: String,
    /// Size footprint in grid squares.
    pub width: f64,
    pub height: f64,
    pub texture: TokenTexture,
    /// -1 for hostile.
    pub disposition: i32,
    pub bar1: TokenBar,
}

/// A creature actor and the items parsed from its statblock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub img: String,
    pub system: CreatureSystem,
    #[serde(rename = "prototypeToken")]
    pub prototype_token: PrototypeToken,
    pub items: Vec<Item>,
    pub effects: Vec<Value>,
    pub flags: Map<String, Value>,
    #[serde(rename = "_stats")]
    pub stats: RecordStats,
}

impl Creature {
    /// Items of the given type, in parse order.
    pub fn items_of(&self, record_type: RecordType) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(move |item| item.record_type == record_type)
    }
}
