//! Free-text target classification.
//!
//! A total, deterministic function: every input maps to exactly one
//! [`CanonicalTarget`]. Category priority comes from the group order in the
//! embedded dictionary (school exams first, skills last); within a group
//! the first declared keyword that appears as a substring of the lowercased
//! input wins.

use tracing::debug;

use crate::lexicon;
use crate::model::{CanonicalTarget, Category};

/// Classify a piece of free text into a canonical target.
///
/// Never fails: inputs matching no dictionary keyword fall back to
/// `Category::General` carrying the original text verbatim (untrimmed,
/// original case).
pub fn classify(text: &str) -> CanonicalTarget {
    let haystack = text.to_lowercase();

    for group in lexicon::groups() {
        for entry in &group.entries {
            if haystack.contains(&entry.keyword) {
                debug!(
                    category = %group.category,
                    keyword = %entry.keyword,
                    name = %entry.name,
                    "classified input"
                );
                return CanonicalTarget {
                    name: entry.name.clone(),
                    category: group.category,
                };
            }
        }
    }

    debug!("no keyword matched, falling back to general");
    CanonicalTarget {
        name: text.to_string(),
        category: Category::General,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
