pub mod ttrpg;

pub use ttrpg::{
    run_import, ContentKind, Creature, EntryError, ImportError, ImportOptions, ImportOutcome,
    ImportRecord, Item, RecordType,
};
