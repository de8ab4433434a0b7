//! Detecting whether a chat message is asking for a study plan.

/// Substrings that mark a message as a roadmap request. Matching is
/// case-insensitive; one hit anywhere in the message is enough.
const ROADMAP_KEYWORDS: &[&str] = &[
    "roadmap",
    "syllabus",
    "study plan",
    "curriculum",
    "learning path",
    "course outline",
    "preparation plan",
    "study guide",
    "topics to study",
    "what to learn",
    "prepare for",
    "crack",
    "interview",
    "exam",
    "board",
    "entrance",
    "competitive",
];

/// Whether the message should be answered with a full roadmap rather than
/// small talk.
pub fn is_roadmap_request(message: &str) -> bool {
    let haystack = message.to_lowercase();
    ROADMAP_KEYWORDS.iter().any(|k| haystack.contains(k))
}
