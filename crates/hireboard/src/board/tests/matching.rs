use std::collections::HashSet;

use super::common::*;
use crate::board::domain::JobId;
use crate::board::matching::{
    matches, normalize_skill, shortlist, skills_contain_keyword, CategoryKeywords,
};

fn skills(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn matching_ignores_case_and_whitespace() {
    assert!(matches(&skills(&["python"]), &skills(&["Python", "Go"])));
    assert!(matches(&skills(&["  RUST  "]), &skills(&["rust"])));
    assert!(!matches(&skills(&["java"]), &skills(&["Go"])));
}

#[test]
fn blank_skills_never_match() {
    assert!(!matches(&skills(&["", "  "]), &skills(&["", "go"])));
}

#[test]
fn one_shared_skill_is_enough() {
    assert!(matches(
        &skills(&["python", "sql", "docker"]),
        &skills(&["Kubernetes", "SQL"])
    ));
}

#[test]
fn normalize_collapses_to_trimmed_lowercase() {
    assert_eq!(normalize_skill("  PyTHON "), "python");
}

#[test]
fn shortlist_skips_applied_and_unrelated_jobs() {
    let (service, _, _) = build_service();
    let matching_job = service
        .post_job(&acme(), draft("Data Engineer", &["SQL"]))
        .expect("post");
    let applied_job = service
        .post_job(&mega(), draft("Python Developer", &["python"]))
        .expect("post");
    let unrelated_job = service
        .post_job(&mega(), draft("Welder", &["welding"]))
        .expect("post");

    let profile = seeker("ada", &["Python", "SQL"], true);
    let jobs = vec![
        matching_job.clone(),
        applied_job.clone(),
        unrelated_job.clone(),
    ];
    let applied: HashSet<JobId> = [applied_job.id.clone()].into_iter().collect();

    let picks = shortlist(&profile, &jobs, &applied);
    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0].id, matching_job.id);
}

#[test]
fn keyword_filter_is_substring_based() {
    let pool = skills(&["Advanced SQL tuning", "Excel"]);
    assert!(skills_contain_keyword(&pool, "sql"));
    assert!(skills_contain_keyword(&pool, "EXCEL"));
    assert!(!skills_contain_keyword(&pool, "rust"));
    assert!(!skills_contain_keyword(&pool, "   "));
}

#[test]
fn category_mapping_uses_configured_keywords() {
    let categories = CategoryKeywords::standard();
    assert!(categories.seeker_matches("technology", &skills(&["Python scripting"])));
    assert!(categories.seeker_matches("Design", &skills(&["Figma"])));
    assert!(!categories.seeker_matches("finance", &skills(&["Figma"])));
    assert!(!categories.seeker_matches("astrology", &skills(&["Python"])));
}
