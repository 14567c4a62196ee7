//! Résumé Feature Extractor: pulls skills, years of experience, title and
//! education lines, and suggested roles out of plain résumé text.
//!
//! Pure over its input: empty text gives an empty profile, never an error.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::resume::vocabulary::Vocabulary;

/// Cap on title, education and role lists.
pub const MAX_LIST_LEN: usize = 5;
/// Years assumed per dated position when no explicit figure is stated.
const YEARS_PER_RANGE: u32 = 2;
const MAX_ESTIMATED_YEARS: u32 = 20;
/// Roles must cover more than this share of their skills to be suggested.
const ROLE_SCORE_FLOOR: f64 = 0.2;

static EXPLICIT_YEARS_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\d+)\+?\s*years?\s+(?:of\s+)?experience",
        r"experience[:\s]+(\d+)\+?\s*years?",
        r"(\d+)\+?\s*years?\s+in",
    ]
    .into_iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static YEAR_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:19|20)\d{2}\s*[-–—]\s*(?:(?:19|20)\d{2}|present|current)").unwrap()
});
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:19|20)\d{2}").unwrap());
static DASH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-–—]").unwrap());

/// Everything extracted from one résumé.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub text: String,
    /// Matched vocabulary skills, sorted.
    pub skills: BTreeSet<String>,
    pub experience_years: u32,
    pub job_titles: Vec<String>,
    pub education: Vec<String>,
    pub suggested_roles: Vec<SuggestedRole>,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedRole {
    pub role: String,
    /// Share of the role's skills present in the résumé, (0.2, 1.0].
    pub score: f64,
}

/// Runs every extraction step against a borrowed vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct ResumeExtractor<'v> {
    vocab: &'v Vocabulary,
}

impl Default for ResumeExtractor<'static> {
    fn default() -> Self {
        Self::new(Vocabulary::builtin())
    }
}

impl<'v> ResumeExtractor<'v> {
    pub fn new(vocab: &'v Vocabulary) -> Self {
        Self { vocab }
    }

    pub fn extract(&self, text: &str) -> ResumeProfile {
        if text.trim().is_empty() {
            return ResumeProfile {
                text: text.to_string(),
                ..Default::default()
            };
        }

        let skills = self.extract_skills(text);
        let suggested_roles = self.suggest_roles(&skills);

        ResumeProfile {
            text: text.to_string(),
            experience_years: estimate_experience(text),
            job_titles: self.extract_job_titles(text),
            education: self.extract_education(text),
            word_count: text.split_whitespace().count(),
            skills,
            suggested_roles,
        }
    }

    /// Every vocabulary skill that occurs as a whole word in `text`.
    pub fn extract_skills(&self, text: &str) -> BTreeSet<String> {
        let text_lower = text.to_lowercase();
        self.vocab
            .skills()
            .iter()
            .filter(|s| s.pattern.is_match(&text_lower))
            .map(|s| s.skill.to_string())
            .collect()
    }

    /// Lines naming a job role, with years and dashes scrubbed out.
    /// Kept when the cleaned line is 11..=99 chars; first five win.
    pub fn extract_job_titles(&self, text: &str) -> Vec<String> {
        let keywords = self.vocab.job_role_keywords();
        candidate_lines(text, keywords)
            .filter_map(|line| {
                let no_years = YEAR_RE.replace_all(line, "");
                let no_dashes = DASH_RE.replace_all(&no_years, " ");
                let cleaned = collapse_whitespace(&no_dashes);
                within(&cleaned, 10, 100).then_some(cleaned)
            })
            .take(MAX_LIST_LEN)
            .collect()
    }

    /// Lines naming a degree, school or field; 11..=199 chars; first five win.
    pub fn extract_education(&self, text: &str) -> Vec<String> {
        let keywords = self.vocab.education_keywords();
        candidate_lines(text, keywords)
            .filter_map(|line| {
                let cleaned = collapse_whitespace(line);
                within(&cleaned, 10, 200).then_some(cleaned)
            })
            .take(MAX_LIST_LEN)
            .collect()
    }

    /// Roles ranked by the share of their signal skills present in `skills`.
    pub fn suggest_roles(&self, skills: &BTreeSet<String>) -> Vec<SuggestedRole> {
        let owned: HashSet<&str> = skills.iter().map(String::as_str).collect();

        let mut scored: Vec<SuggestedRole> = self
            .vocab
            .role_mappings()
            .iter()
            .filter(|m| !m.required_skills.is_empty())
            .map(|m| {
                let required: HashSet<&str> = m.required_skills.iter().copied().collect();
                let hits = required.intersection(&owned).count();
                SuggestedRole {
                    role: m.role.to_string(),
                    score: hits as f64 / required.len() as f64,
                }
            })
            .filter(|r| r.score > ROLE_SCORE_FLOOR)
            .collect();

        // stable: equal scores keep mapping order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(MAX_LIST_LEN);
        scored
    }
}

/// Largest explicit "N years of experience" figure; failing that, an estimate
/// of two years per distinct dated range (`2019-2021`, `2021 - present`),
/// capped at 20.
pub fn estimate_experience(text: &str) -> u32 {
    let text_lower = text.to_lowercase();

    let explicit = EXPLICIT_YEARS_RES
        .iter()
        .flat_map(|re| re.captures_iter(&text_lower))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    if explicit > 0 {
        return explicit;
    }

    let ranges: HashSet<String> = YEAR_RANGE_RE
        .find_iter(&text_lower)
        .map(|m| m.as_str().split_whitespace().collect())
        .collect();

    (ranges.len() as u32)
        .saturating_mul(YEARS_PER_RANGE)
        .min(MAX_ESTIMATED_YEARS)
}

/// Trimmed lines containing any of `keywords`, compared case-insensitively.
fn candidate_lines<'t>(
    text: &'t str,
    keywords: &'t [&'static str],
) -> impl Iterator<Item = &'t str> + 't {
    text.split('\n')
        .map(str::trim)
        .filter(move |line| {
            let lower = line.to_lowercase();
            keywords.iter().any(|k| lower.contains(k))
        })
}

fn collapse_whitespace(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Char length strictly between `min` and `max`.
fn within(s: &str, min: usize, max: usize) -> bool {
    let len = s.chars().count();
    min < len && len < max
}
