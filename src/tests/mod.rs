//! Crate-level tests
//!
//! - `unit`: fixture-driven tests for the import pipeline
//! - `property`: proptest invariants

mod property;
mod unit;
