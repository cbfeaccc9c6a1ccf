//! Property-based tests for the importer
//!
//! Property tests verify invariants that should hold for all inputs, rather
//! than testing specific cases.
//!
//! ## Test Modules
//!
//! - `dice_props`: dice markup
//!   - Applying markup twice equals applying it once
//!   - Every generated dice expression ends up inside a roll marker
//!
//! - `import_props`: parsers over arbitrary text
//!   - Creature count equals the number of `DIFFICULTY` lines
//!   - Line splitting yields only trimmed, non-empty lines
//!   - No parser panics, and blank input is never a success
//!
//! By default, proptest runs 256 cases per property. This can be configured
//! via the `PROPTEST_CASES` environment variable.

mod dice_props;
mod import_props;
