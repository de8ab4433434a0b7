//! Rendering a roadmap as a conversational markdown reply.

use crate::model::{Category, PlanMode, Roadmap};
use crate::synthesize;

/// Build a roadmap for the message and render it as markdown.
pub fn reply_for(message: &str) -> String {
    let roadmap = synthesize::synthesize(message, PlanMode::Exam);
    render(&roadmap)
}

/// Render an existing roadmap as a markdown narrative.
pub fn render(roadmap: &Roadmap) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", roadmap.title));
    out.push_str(intro_for(roadmap));
    out.push_str("\n\n");

    for period in &roadmap.periods {
        // Generic templates already carry "Week N:" in their titles.
        if period.title.starts_with("Week ") {
            out.push_str(&format!("**{}**\n", period.title));
        } else {
            out.push_str(&format!("**Week {}: {}**\n", period.index, period.title));
        }
        for item in &period.items {
            out.push_str(&format!("- {}\n", item.label));
        }
        out.push('\n');
    }

    let (resources, tips) = extras_for(roadmap);
    out.push_str("**📚 Recommended Resources:**\n");
    for r in resources {
        out.push_str(&format!("- {r}\n"));
    }
    out.push_str("\n**💡 Tips for Success:**\n");
    for t in tips {
        out.push_str(&format!("- {t}\n"));
    }

    out
}

fn intro_for(roadmap: &Roadmap) -> &'static str {
    match roadmap.category {
        Category::SchoolExam => {
            "Here's a complete week-by-week preparation plan for your board exam. Consistency beats cramming, so revise as you go."
        }
        Category::CompetitiveExam => {
            "Here's a structured preparation plan covering the full syllabus, practice, and revision phases."
        }
        Category::Company | Category::FinanceCompany => {
            "Here's an interview preparation plan taking you from fundamentals through mock interviews."
        }
        Category::Certification => {
            "Here's a certification study plan built around the official exam objectives and hands-on practice."
        }
        Category::Skill | Category::General => {
            "Here's a learning roadmap taking you from the basics to real projects."
        }
    }
}

fn extras_for(roadmap: &Roadmap) -> (&'static [&'static str], &'static [&'static str]) {
    match (roadmap.category, roadmap.target_name.as_str()) {
        (Category::SchoolExam, "10th ICSE Board Exam") => (
            &[
                "Selina Publishers Textbooks",
                "Previous 10 Years Solved Papers",
                "Together with ICSE Sample Papers",
            ],
            &[
                "Solve at least 2 sample papers every week",
                "Keep a separate formula notebook",
                "Practice map work and diagrams daily",
            ],
        ),
        (Category::CompetitiveExam, name) if name.starts_with("JEE") => (
            &[
                "NCERT (Physics, Chemistry, Mathematics)",
                "HC Verma - Concepts of Physics",
                "Previous Year JEE Papers",
            ],
            &[
                "Attempt one full mock every weekend",
                "Maintain an error log and review it weekly",
                "Never skip NCERT for Chemistry",
            ],
        ),
        (Category::Certification, "CCNA") => (
            &[
                "Cisco Official Cert Guide",
                "Packet Tracer Labs",
                "Boson Practice Exams",
            ],
            &[
                "Lab every topic, not just the hard ones",
                "Master subnetting until it's automatic",
                "Do timed practice exams in the final two weeks",
            ],
        ),
        (Category::SchoolExam | Category::CompetitiveExam, _) => (
            &[
                "Standard textbooks for your syllabus",
                "Previous year question papers",
                "A reputable mock test series",
            ],
            &[
                "Study in focused 50-minute blocks",
                "Revise yesterday's topics before starting new ones",
                "Track your mock scores over time",
            ],
        ),
        (Category::Company | Category::FinanceCompany, _) => (
            &[
                "LeetCode / HackerRank problem sets",
                "Cracking the Coding Interview",
                "System Design Primer",
            ],
            &[
                "Solve problems out loud, as in a real interview",
                "Do at least two mock interviews per week",
                "Research the company's products and recent news",
            ],
        ),
        _ => (
            &[
                "Official documentation and guides",
                "Hands-on projects and exercises",
                "Community forums and study groups",
            ],
            &[
                "Practice a little every day",
                "Build projects to cement what you learn",
                "Teach a topic to someone else to test your understanding",
            ],
        ),
    }
}
