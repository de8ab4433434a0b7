//! End-to-end engine behavior through the public API.

use studymap_core::{
    classify, synthesize, toggle, Category, ItemSelector, PlanMode, Roadmap,
};

#[test]
fn mixed_signal_input_resolves_by_priority() {
    // School-exam keywords outrank company keywords regardless of position.
    let target = classify("10th ICSE Google prep");
    assert_eq!(target.category, Category::SchoolExam);
    assert_eq!(target.name, "10th ICSE Board Exam");
}

#[test]
fn company_request_end_to_end() {
    let roadmap = synthesize("Google interview preparation roadmap", PlanMode::Placement);
    assert_eq!(roadmap.category, Category::Company);
    assert_eq!(roadmap.target_name, "Google");
    assert_eq!(roadmap.title, "Google - Interview Preparation");
    assert_eq!(roadmap.periods.len(), 8);
    assert!(roadmap
        .periods
        .iter()
        .any(|p| p.title == "Google-Specific Preparation"));
}

#[test]
fn synthesis_is_deterministic() {
    let a = synthesize("NEET 2026", PlanMode::Exam);
    let b = synthesize("NEET 2026", PlanMode::Exam);
    assert_eq!(a, b);
}

#[test]
fn progress_lifecycle() {
    let fresh = synthesize("10th icse boards", PlanMode::Exam);
    assert_eq!(fresh.total_items(), 48);
    assert_eq!(fresh.progress_percent, 0);

    let one_done = toggle(&fresh, 1, &ItemSelector::Index(1)).expect("toggle on");
    assert_eq!(one_done.progress_percent, 2);
    assert!(!one_done.periods[0].completed);

    let undone = toggle(&one_done, 1, &ItemSelector::Index(1)).expect("toggle off");
    assert_eq!(undone, fresh);
}

#[test]
fn progress_invariant_holds_under_arbitrary_toggles() {
    let mut roadmap = synthesize("gate cse", PlanMode::Exam);
    let moves = [(1u32, 1usize), (2, 3), (8, 6), (2, 3), (5, 2), (1, 4)];
    for (period, item) in moves {
        roadmap = toggle(&roadmap, period, &ItemSelector::Index(item)).expect("toggle");
        assert_invariant(&roadmap);
    }
}

#[test]
fn every_input_is_plannable() {
    let inputs = [
        "jee advanced",
        "neet",
        "gate",
        "microsoft",
        "jp morgan",
        "aws",
        "rust",
        "completely unheard-of topic 42",
        "",
    ];
    for raw in inputs {
        let roadmap = synthesize(raw, PlanMode::Exam);
        assert!(!roadmap.periods.is_empty(), "no periods for {raw:?}");
        assert!(roadmap.periods.iter().all(|p| !p.items.is_empty()));
        assert_invariant(&roadmap);
    }
}

#[test]
fn serialized_roadmap_round_trips() {
    let roadmap = synthesize("ccna", PlanMode::Exam);
    let json = serde_json::to_string(&roadmap).expect("serialize");
    let back: Roadmap = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, roadmap);
}

fn assert_invariant(roadmap: &Roadmap) {
    let total = roadmap.total_items();
    let completed = roadmap.completed_items();
    let expected = if total == 0 {
        0
    } else {
        (100.0 * completed as f64 / total as f64).round() as u8
    };
    assert_eq!(roadmap.progress_percent, expected);
    for period in &roadmap.periods {
        assert_eq!(
            period.completed,
            !period.items.is_empty() && period.items.iter().all(|i| i.completed)
        );
    }
}
