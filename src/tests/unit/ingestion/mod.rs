//! Import Pipeline Unit Tests
//!
//! Fixture-driven tests that run whole pasted texts through the parsers:
//! - Creature statblocks with every section
//! - Spell write-ups with labeled sections
//! - Talent and feature lists

mod creature_fixture_tests;
mod list_fixture_tests;
mod spell_fixture_tests;
