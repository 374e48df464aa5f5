use std::collections::{BTreeMap, HashSet};

use super::domain::{JobId, JobPosting, SeekerProfile};

/// Canonical form used for every skill comparison: trimmed, ASCII-lowercased.
pub fn normalize_skill(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// True iff the two skill sets share at least one skill. Deliberately
/// permissive: a single overlap qualifies, with no scoring or weighting.
pub fn matches(seeker_skills: &[String], job_skills: &[String]) -> bool {
    let seeker: HashSet<String> = seeker_skills
        .iter()
        .map(|skill| normalize_skill(skill))
        .filter(|skill| !skill.is_empty())
        .collect();

    job_skills
        .iter()
        .map(|skill| normalize_skill(skill))
        .any(|skill| !skill.is_empty() && seeker.contains(&skill))
}

/// Jobs matching the seeker's skills, excluding jobs already applied to.
pub fn shortlist(
    profile: &SeekerProfile,
    jobs: &[JobPosting],
    applied: &HashSet<JobId>,
) -> Vec<JobPosting> {
    jobs.iter()
        .filter(|job| !applied.contains(&job.id))
        .filter(|job| matches(&profile.skills, &job.required_skills))
        .cloned()
        .collect()
}

/// True iff any skill contains the keyword as a case-insensitive substring.
pub fn skills_contain_keyword(skills: &[String], keyword: &str) -> bool {
    let needle = normalize_skill(keyword);
    if needle.is_empty() {
        return false;
    }
    skills
        .iter()
        .any(|skill| normalize_skill(skill).contains(&needle))
}

/// Fixed mapping from a category label to keyword substrings. This is
/// configuration data, not an algorithm: a seeker falls into a category when
/// any of their skills contains any of its keywords.
#[derive(Debug, Clone)]
pub struct CategoryKeywords {
    categories: BTreeMap<String, Vec<String>>,
}

impl CategoryKeywords {
    /// Categories shipped with the service.
    pub fn standard() -> Self {
        let seed: [(&str, &[&str]); 4] = [
            (
                "technology",
                &["python", "java", "rust", "sql", "javascript", "cloud"],
            ),
            (
                "marketing",
                &["seo", "content", "social media", "copywriting", "analytics"],
            ),
            (
                "finance",
                &["accounting", "excel", "audit", "bookkeeping", "payroll"],
            ),
            ("design", &["figma", "photoshop", "illustrator", "ui", "ux"]),
        ];

        let categories = seed
            .into_iter()
            .map(|(label, keywords)| {
                let keywords = keywords.iter().map(|keyword| keyword.to_string()).collect();
                (label.to_string(), keywords)
            })
            .collect();

        Self { categories }
    }

    pub fn with_categories(categories: BTreeMap<String, Vec<String>>) -> Self {
        Self { categories }
    }

    pub fn keywords_for(&self, category: &str) -> Option<&[String]> {
        self.categories
            .get(&normalize_skill(category))
            .map(Vec::as_slice)
    }

    pub fn seeker_matches(&self, category: &str, skills: &[String]) -> bool {
        match self.keywords_for(category) {
            Some(keywords) => keywords
                .iter()
                .any(|keyword| skills_contain_keyword(skills, keyword)),
            None => false,
        }
    }
}

impl Default for CategoryKeywords {
    fn default() -> Self {
        Self::standard()
    }
}
