//! Roadmap synthesis: free text in, fully-formed [`Roadmap`] out.

use std::time::Duration;

use crate::classify;
use crate::model::{CanonicalTarget, Category, Period, PlanMode, Roadmap, SubItem};
use crate::templates;

/// Build a roadmap for arbitrary input text.
///
/// Total: every input yields a roadmap, via the general fallback when no
/// keyword matches. The result starts with every item incomplete and
/// `progress_percent` of 0.
pub fn synthesize(raw: &str, mode: PlanMode) -> Roadmap {
    let target = classify::classify(raw);
    from_target(&target, mode)
}

/// Build a roadmap for an already-classified target.
pub fn from_target(target: &CanonicalTarget, mode: PlanMode) -> Roadmap {
    let periods: Vec<Period> = templates::resolve(target, mode)
        .into_iter()
        .enumerate()
        .map(|(i, tpl)| Period {
            index: (i + 1) as u32,
            title: tpl.title,
            items: tpl.items.into_iter().map(SubItem::new).collect(),
            completed: false,
        })
        .collect();

    let roadmap = Roadmap {
        title: title_for(target),
        category: target.category,
        target_name: target.name.clone(),
        periods,
        progress_percent: 0,
    };

    tracing::info!(
        title = %roadmap.title,
        category = %roadmap.category,
        periods = roadmap.periods.len(),
        items = roadmap.total_items(),
        "synthesized roadmap"
    );

    roadmap
}

/// Like [`synthesize`], after a fixed artificial delay.
///
/// Callers that simulate a remote generator use this; the sleep is
/// cancel-safe, so wrapping it in a timeout behaves as expected.
pub async fn synthesize_with_latency(raw: &str, mode: PlanMode, delay: Duration) -> Roadmap {
    tokio::time::sleep(delay).await;
    synthesize(raw, mode)
}

fn title_for(target: &CanonicalTarget) -> String {
    match target.category {
        Category::SchoolExam | Category::CompetitiveExam => {
            format!("{} - Complete Preparation", target.name)
        }
        Category::Certification => format!("{} - Certification Preparation", target.name),
        Category::Company | Category::FinanceCompany => {
            format!("{} - Interview Preparation", target.name)
        }
        Category::Skill | Category::General => format!("{} - Learning Roadmap", target.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn school_exam_title_and_shape() {
        let roadmap = synthesize("10th ICSE board exam", PlanMode::Exam);
        assert_eq!(roadmap.title, "10th ICSE Board Exam - Complete Preparation");
        assert_eq!(roadmap.category, Category::SchoolExam);
        assert_eq!(roadmap.periods.len(), 8);
        assert_eq!(roadmap.total_items(), 48);
        assert_eq!(roadmap.progress_percent, 0);
    }

    #[test]
    fn company_title() {
        let roadmap = synthesize("Google interview preparation roadmap", PlanMode::Placement);
        assert_eq!(roadmap.title, "Google - Interview Preparation");
        assert_eq!(roadmap.category, Category::Company);
        assert_eq!(roadmap.periods.len(), 8);
    }

    #[test]
    fn finance_company_title() {
        let roadmap = synthesize("goldman sachs analyst role", PlanMode::Placement);
        assert_eq!(roadmap.title, "Goldman Sachs - Interview Preparation");
        assert_eq!(roadmap.category, Category::FinanceCompany);
    }

    #[test]
    fn certification_title() {
        let roadmap = synthesize("ccna study plan", PlanMode::Exam);
        assert_eq!(roadmap.title, "CCNA - Certification Preparation");
    }

    #[test]
    fn skill_title() {
        let roadmap = synthesize("learn python fast", PlanMode::Exam);
        assert_eq!(roadmap.title, "Python Programming - Learning Roadmap");
    }

    #[test]
    fn fallback_title_preserves_input() {
        let roadmap = synthesize("Underwater Basket Weaving", PlanMode::Exam);
        assert_eq!(roadmap.title, "Underwater Basket Weaving - Learning Roadmap");
        assert_eq!(roadmap.category, Category::General);
        assert!(!roadmap.periods.is_empty());
    }

    #[test]
    fn periods_are_one_based_and_contiguous() {
        let roadmap = synthesize("jee physics", PlanMode::Exam);
        for (i, period) in roadmap.periods.iter().enumerate() {
            assert_eq!(period.index, (i + 1) as u32);
            assert!(!period.completed);
            assert!(period.items.iter().all(|item| !item.completed));
        }
    }

    #[test]
    fn every_input_yields_a_roadmap() {
        for raw in ["", "   ", "xyzzy", "!!!", "a"] {
            let roadmap = synthesize(raw, PlanMode::Exam);
            assert!(!roadmap.periods.is_empty());
            assert_eq!(roadmap.progress_percent, 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn latency_variant_waits_then_matches_sync() {
        let fut = synthesize_with_latency("NEET", PlanMode::Exam, Duration::from_millis(1000));
        let roadmap = fut.await;
        assert_eq!(roadmap, synthesize("NEET", PlanMode::Exam));
    }
}
