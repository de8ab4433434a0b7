//! Keyword dictionary for target classification.
//!
//! The dictionary is defined in `keywords.toml` and embedded in the binary
//! at compile time. Group order and entry order within each group are both
//! observable: the classifier walks groups top to bottom and returns the
//! first keyword hit, so the TOML is a versioned artifact, not free-form
//! configuration.

use std::sync::LazyLock;

use serde::Deserialize;

use crate::model::Category;

/// A single keyword-to-canonical-name mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordEntry {
    /// Lowercase substring to look for in the normalized input.
    pub keyword: String,
    /// Canonical entity name returned on a match.
    pub name: String,
}

/// An ordered group of keyword entries for one category.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordGroup {
    pub category: Category,
    pub entries: Vec<KeywordEntry>,
}

/// Container for deserializing the embedded TOML file.
#[derive(Debug, Deserialize)]
struct Dictionary {
    groups: Vec<KeywordGroup>,
}

/// The embedded keyword dictionary TOML.
static KEYWORDS_TOML: &str = include_str!("keywords.toml");

/// Dictionary loaded once per process.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed. This is a compile-time
/// invariant -- if the binary was built, the TOML is valid.
static DICTIONARY: LazyLock<Vec<KeywordGroup>> = LazyLock::new(|| {
    let dict: Dictionary =
        toml::from_str(KEYWORDS_TOML).expect("embedded keywords.toml is invalid");
    dict.groups
});

/// All keyword groups in evaluation-priority order.
pub fn groups() -> &'static [KeywordGroup] {
    &DICTIONARY
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
