//! JSON canonicalization, diffing and variable handling for domain
//! configurations
//!
//! Everything here works on plain `serde_json::Value`s and text; the typed
//! domain schema lives in `domain-meta`.

pub mod canonical;
pub mod diff;
pub mod error;
pub mod variables;

pub use canonical::{canonicalize, sort_value};
pub use diff::{SemanticChange, SemanticDiff, unified_diff};
pub use error::{Error, Result};
pub use variables::{VARIABLES_KEY, migrate_legacy_variables, substitute_variables};
