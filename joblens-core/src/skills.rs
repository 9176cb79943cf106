//! Skill-frequency extraction over sampled posting text.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{SampleDescription, SkillCount};

/// Fixed vocabulary of tracked technology skills, in tie-break order.
pub const TECH_SKILLS: [&str; 50] = [
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "C#",
    "C++",
    "Go",
    "Rust",
    "Ruby",
    "PHP",
    "Swift",
    "Kotlin",
    "React",
    "Angular",
    "Vue",
    "Next.js",
    "Node.js",
    "Express",
    "Django",
    "Flask",
    "Spring",
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "Terraform",
    "SQL",
    "PostgreSQL",
    "MongoDB",
    "Redis",
    "MySQL",
    "GraphQL",
    "Git",
    "CI/CD",
    "Linux",
    "REST",
    "APIs",
    "HTML",
    "CSS",
    "SCSS",
    "Tailwind",
    "Machine Learning",
    "AI",
    "Data Science",
    "TensorFlow",
    "PyTorch",
    "Agile",
    "Scrum",
    "Jira",
];

// Word boundaries are spelled out because `\b` does not fire after symbols
// like the `#` in "C#" or the `+` in "C++".
static SKILL_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    TECH_SKILLS
        .iter()
        .map(|skill| {
            let pattern = format!(r"(?i)(?:^|[^\w]){}(?:[^\w]|$)", regex::escape(skill));
            (
                *skill,
                Regex::new(&pattern).expect("skill patterns are valid"),
            )
        })
        .collect()
});

/// Skills from the vocabulary mentioned as whole words in `text`.
pub fn skills_in(text: &str) -> impl Iterator<Item = &'static str> + '_ {
    SKILL_PATTERNS
        .iter()
        .filter(move |(_, re)| re.is_match(text))
        .map(|(name, _)| *name)
}

fn posting_text(d: &SampleDescription) -> String {
    let mut text = String::with_capacity(d.description.len());
    text.push_str(&d.description);
    for line in &d.highlights {
        text.push(' ');
        text.push_str(line);
    }
    text
}

/// Rank vocabulary skills by the number of sampled postings mentioning them.
///
/// Each posting counts at most once per skill. Zero-count skills are omitted,
/// ties keep vocabulary order, and at most `top` entries are returned.
/// `percent_of_sampled_listings` is relative to `total_sampled` (0 when it is 0).
pub fn top_skills<'a>(
    samples: impl IntoIterator<Item = &'a SampleDescription>,
    total_sampled: u64,
    top: usize,
) -> Vec<SkillCount> {
    let mut counts = [0_u64; TECH_SKILLS.len()];
    for sample in samples {
        let text = posting_text(sample);
        for (idx, (_, re)) in SKILL_PATTERNS.iter().enumerate() {
            if re.is_match(&text) {
                counts[idx] += 1;
            }
        }
    }

    let mut ranked: Vec<(usize, u64)> = counts
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, c)| *c > 0)
        .collect();
    // stable: equal counts stay in vocabulary order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top);

    ranked
        .into_iter()
        .map(|(idx, count)| SkillCount {
            name: TECH_SKILLS[idx].to_string(),
            count,
            percent_of_sampled_listings: crate::percent(count, total_sampled),
        })
        .collect()
}
