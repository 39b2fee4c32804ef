//! Skill-match scoring between a job's required skills and a candidate's
//! skill set. Pure functions; comparison is trim + lowercase equality.

use serde::Serialize;

fn normalize(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Percentage of required skills present in the candidate's skill set.
///
/// An empty required list or an empty candidate list scores 0. Rounding is
/// half-up, so `1/3` of the skills yields 33 and `1/6` yields 17.
pub fn match_score(required: &[String], candidate: &[String]) -> u8 {
    if required.is_empty() || candidate.is_empty() {
        return 0;
    }

    let candidate: Vec<String> = candidate.iter().map(|skill| normalize(skill)).collect();
    let matching = required
        .iter()
        .filter(|skill| candidate.contains(&normalize(skill)))
        .count();

    ((matching as f64 / required.len() as f64) * 100.0).round() as u8
}

/// Partition of the required skills by candidate coverage, preserving the
/// original casing and order of the required list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillsBreakdown {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

pub fn skills_breakdown(required: &[String], candidate: &[String]) -> SkillsBreakdown {
    let candidate: Vec<String> = candidate.iter().map(|skill| normalize(skill)).collect();
    let (matched, missing) = required
        .iter()
        .cloned()
        .partition(|skill| candidate.contains(&normalize(skill)));

    SkillsBreakdown { matched, missing }
}
