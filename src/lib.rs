/// sotdl-import - Shadow of the Demon Lord content importer
///
/// Parses pasted statblocks, spells, talents, features, and weapon tables
/// into typed records for the demonlord game system.

pub mod config;
pub mod core;
pub mod ingestion;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
