//! Core data model: categories, canonical targets, and roadmaps.
//!
//! A [`Roadmap`] is created once by the synthesizer with every item
//! incomplete, and is only ever modified through the progress tracker,
//! which recomputes `progress_percent` on each change. The invariant
//! `progress_percent == round(100 * completed / total)` holds after
//! construction and after every toggle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Classification outcome for a piece of free text.
///
/// Variants are listed in evaluation-priority order: when an input matches
/// keywords from several categories, the earliest variant here wins.
/// `General` is the fallback and is never matched from the dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SchoolExam,
    CompetitiveExam,
    Company,
    FinanceCompany,
    Certification,
    Skill,
    General,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SchoolExam => "school_exam",
            Self::CompetitiveExam => "competitive_exam",
            Self::Company => "company",
            Self::FinanceCompany => "finance_company",
            Self::Certification => "certification",
            Self::Skill => "skill",
            Self::General => "general",
        };
        f.write_str(s)
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "school_exam" => Ok(Self::SchoolExam),
            "competitive_exam" => Ok(Self::CompetitiveExam),
            "company" => Ok(Self::Company),
            "finance_company" => Ok(Self::FinanceCompany),
            "certification" => Ok(Self::Certification),
            "skill" => Ok(Self::Skill),
            "general" => Ok(Self::General),
            other => Err(CategoryParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Category`] string.
#[derive(Debug, Clone)]
pub struct CategoryParseError(pub String);

impl fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid category: {:?}", self.0)
    }
}

impl std::error::Error for CategoryParseError {}

// ---------------------------------------------------------------------------

/// Kind of plan being requested.
///
/// Accepted and threaded through template lookup so a future template set
/// can key on it; today it does not branch selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    Exam,
    Placement,
}

impl fmt::Display for PlanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exam => "exam",
            Self::Placement => "placement",
        };
        f.write_str(s)
    }
}

impl FromStr for PlanMode {
    type Err = PlanModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exam" => Ok(Self::Exam),
            "placement" => Ok(Self::Placement),
            other => Err(PlanModeParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`PlanMode`] string.
#[derive(Debug, Clone)]
pub struct PlanModeParseError(pub String);

impl fmt::Display for PlanModeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid plan mode: {:?} (expected exam or placement)", self.0)
    }
}

impl std::error::Error for PlanModeParseError {}

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

/// The resolved (name, category) pair produced by classification.
///
/// Always fully constructed: when no keyword matches, the classifier falls
/// back to the original input text under [`Category::General`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTarget {
    pub name: String,
    pub category: Category,
}

/// The smallest trackable unit of study content within a period.
///
/// Completion is stored on the item itself rather than as label-set
/// membership on the parent, so duplicate labels stay unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubItem {
    pub label: String,
    pub completed: bool,
}

impl SubItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            completed: false,
        }
    }
}

/// One ordered stage (a "week") of a roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// 1-based position, unique within the roadmap.
    pub index: u32,
    pub title: String,
    pub items: Vec<SubItem>,
    /// Derived: true only when `items` is non-empty and all are complete.
    /// Maintained by [`Roadmap::recompute_progress`].
    pub completed: bool,
}

impl Period {
    /// Whether every item in this period is complete (false when empty).
    pub fn all_items_complete(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|i| i.completed)
    }
}

/// The synthesized study plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    pub title: String,
    pub category: Category,
    pub target_name: String,
    pub periods: Vec<Period>,
    /// Always `round(100 * completed_items / total_items)`, 0 when empty.
    pub progress_percent: u8,
}

impl Roadmap {
    /// Total number of sub-items across all periods.
    pub fn total_items(&self) -> usize {
        self.periods.iter().map(|p| p.items.len()).sum()
    }

    /// Number of completed sub-items across all periods.
    pub fn completed_items(&self) -> usize {
        self.periods
            .iter()
            .map(|p| p.items.iter().filter(|i| i.completed).count())
            .sum()
    }

    /// Recompute every period's derived `completed` flag and the overall
    /// `progress_percent` from per-item state.
    pub fn recompute_progress(&mut self) {
        for period in &mut self.periods {
            period.completed = period.all_items_complete();
        }
        let total = self.total_items();
        self.progress_percent = if total == 0 {
            0
        } else {
            let completed = self.completed_items();
            (100.0 * completed as f64 / total as f64).round() as u8
        };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
