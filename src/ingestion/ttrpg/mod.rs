//! Shadow of the Demon Lord Text Import
//!
//! Turns pasted tabletop content into typed records for the demonlord
//! system:
//!
//! - **Creatures**: statblocks split on `DIFFICULTY`, with sections for
//!   traits, attacks, special actions, end-of-round actions, and magic
//! - **Features / Talents**: `Name º Description` lists, with `ºº Group`
//!   headers for talents
//! - **Spells**: `NAME TRADITION TYPE RANK` blocks with labeled sections
//! - **Weapons**: equipment table rows
//!
//! # Example
//!
//! ```
//! use sotdl_import::ingestion::ttrpg::{run_import, ContentKind, ImportOptions};
//!
//! let outcome = run_import(
//!     ContentKind::Feature,
//!     "Fast º Moves quickly.\nSlow º Moves slowly.",
//!     ImportOptions::default(),
//! );
//! assert!(outcome.success);
//! assert_eq!(outcome.records.len(), 2);
//! ```

pub mod attack_line;
pub mod creature;
pub mod dice;
pub mod error;
pub mod factory;
pub mod import;
pub mod list_parser;
pub mod records;
pub mod sections;
pub mod spell;
pub mod text;
pub mod weapon_table;

pub use attack_line::{parse_attack_line, AttackKind, AttackLine, RangeTier};
pub use creature::{parse_creatures, CreatureOutput};
pub use dice::{extract_damage_types, extract_dice_rolls, make_dice_rollable};
pub use error::{BlockError, EntryError, ImportError, RecordError};
pub use import::{run_import, ContentKind, ImportOptions, ImportOutcome, ImportRecord};
pub use list_parser::{parse_features, parse_talents, ListOutput};
pub use records::{Creature, Item, ItemSystem, RecordType};
pub use spell::parse_spells;
pub use text::{generate_id, split_lines};
pub use weapon_table::parse_weapon_table;
