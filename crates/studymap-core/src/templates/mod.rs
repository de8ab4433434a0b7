//! The study-plan template library.
//!
//! Templates are curated data embedded at compile time from `plans.toml`.
//! Lookup resolves a [`CanonicalTarget`] to a list of periods in three
//! steps: an entry naming the target exactly, then the category generic,
//! then the single global fallback. The global fallback guarantees lookup
//! is total for every target the classifier can produce.

use std::sync::LazyLock;

use serde::Deserialize;

use crate::model::{CanonicalTarget, Category, PlanMode};

static PLANS_TOML: &str = include_str!("plans.toml");

#[derive(Debug, Deserialize)]
struct TemplateFile {
    templates: Vec<Template>,
}

static LIBRARY: LazyLock<Vec<Template>> = LazyLock::new(|| {
    let file: TemplateFile =
        toml::from_str(PLANS_TOML).expect("embedded plans.toml is invalid");
    let library = file.templates;
    assert!(
        library
            .iter()
            .any(|t| t.category == Category::General && t.names.is_empty()),
        "embedded plans.toml is missing the general fallback template"
    );
    library
});

/// One template entry as declared in the library.
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    pub category: Category,
    /// Canonical names this entry serves; empty means category generic.
    #[serde(default)]
    pub names: Vec<String>,
    pub periods: Vec<PeriodTemplate>,
}

/// The raw shape of one period before it becomes a live [`Period`].
///
/// [`Period`]: crate::model::Period
#[derive(Debug, Clone, Deserialize)]
pub struct PeriodTemplate {
    pub title: String,
    pub items: Vec<String>,
}

/// All templates, in library order.
pub fn all() -> &'static [Template] {
    &LIBRARY
}

/// Resolve the template for a target.
///
/// `mode` is accepted so callers thread it uniformly; the current library
/// does not key on it. The returned periods have `{name}` placeholders
/// already substituted with the target's name.
pub fn resolve(target: &CanonicalTarget, mode: PlanMode) -> Vec<PeriodTemplate> {
    let _ = mode;
    let library = all();

    let entry = library
        .iter()
        .find(|t| t.category == target.category && t.names.iter().any(|n| n == &target.name))
        .or_else(|| {
            library
                .iter()
                .find(|t| t.category == target.category && t.names.is_empty())
        })
        .unwrap_or_else(|| {
            library
                .iter()
                .find(|t| t.category == Category::General && t.names.is_empty())
                .expect("general fallback template exists")
        });

    tracing::debug!(
        category = %entry.category,
        named = !entry.names.is_empty(),
        periods = entry.periods.len(),
        "resolved plan template"
    );

    entry
        .periods
        .iter()
        .map(|p| PeriodTemplate {
            title: substitute(&p.title, &target.name),
            items: p.items.iter().map(|i| substitute(i, &target.name)).collect(),
        })
        .collect()
}

fn substitute(text: &str, name: &str) -> String {
    if text.contains("{name}") {
        text.replace("{name}", name)
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str, category: Category) -> CanonicalTarget {
        CanonicalTarget {
            name: name.to_owned(),
            category,
        }
    }

    #[test]
    fn library_loads() {
        assert!(!all().is_empty());
    }

    #[test]
    fn named_template_beats_category_generic() {
        let periods = resolve(
            &target("10th ICSE Board Exam", Category::SchoolExam),
            PlanMode::Exam,
        );
        assert_eq!(periods.len(), 8);
        assert_eq!(periods[0].title, "Mathematics Fundamentals");
        assert_eq!(periods[0].items.len(), 6);
    }

    #[test]
    fn jee_variants_share_one_template() {
        let main = resolve(&target("JEE Main", Category::CompetitiveExam), PlanMode::Exam);
        let advanced = resolve(
            &target("JEE Advanced", Category::CompetitiveExam),
            PlanMode::Exam,
        );
        assert_eq!(main[0].title, "Physics - Mechanics");
        assert_eq!(main[0].title, advanced[0].title);
    }

    #[test]
    fn company_generic_substitutes_name() {
        let periods = resolve(&target("Google", Category::Company), PlanMode::Placement);
        assert_eq!(periods.len(), 8);
        assert_eq!(periods[0].title, "Data Structures Basics");
        assert_eq!(periods[5].title, "Google-Specific Preparation");
        assert_eq!(periods[5].items[0], "Google Coding Questions");
    }

    #[test]
    fn finance_generic_is_longer() {
        let periods = resolve(
            &target("Goldman Sachs", Category::FinanceCompany),
            PlanMode::Placement,
        );
        assert_eq!(periods.len(), 10);
        assert!(periods.iter().any(|p| p.title == "Goldman Sachs-Specific Preparation"));
    }

    #[test]
    fn unknown_target_gets_general_fallback() {
        let periods = resolve(
            &target("Underwater Basket Weaving", Category::General),
            PlanMode::Exam,
        );
        assert_eq!(periods.len(), 8);
        assert_eq!(periods[0].title, "Week 1: Foundation");
    }

    #[test]
    fn unnamed_category_target_gets_category_generic() {
        // A certification with no dedicated entry resolves to the
        // certification generic, not the global fallback.
        let periods = resolve(&target("AWS Certification", Category::Certification), PlanMode::Exam);
        assert_eq!(periods[0].title, "Exam Blueprint & Fundamentals");
    }

    #[test]
    fn mode_does_not_change_selection() {
        let t = target("NEET", Category::CompetitiveExam);
        let exam = resolve(&t, PlanMode::Exam);
        let placement = resolve(&t, PlanMode::Placement);
        assert_eq!(exam[0].title, placement[0].title);
        assert_eq!(exam.len(), placement.len());
    }
}
