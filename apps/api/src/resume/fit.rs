//! Job-fit scoring of an extracted résumé profile against a single posting.
//!
//! score = 0.5 * skill overlap + 0.3 * word overlap + 0.2 * title bonus,
//! clamped to 1.0. All three parts are plain case-folded substring / token
//! tests; no regex boundaries here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::job::{JobRecord, ScoredRecord};
use crate::resume::extractor::ResumeProfile;
use crate::resume::vocabulary::Vocabulary;

const SKILL_WEIGHT: f64 = 0.5;
const WORD_WEIGHT: f64 = 0.3;
const TITLE_WEIGHT: f64 = 0.2;
/// Flat title-channel value when any résumé title word appears in the job title.
const TITLE_MATCH_SCORE: f64 = 0.8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitBreakdown {
    /// Résumé skills ∩ job skills, over job skills.
    pub skill_score: f64,
    /// Shared whitespace tokens over job tokens, capped at 1.0.
    pub word_score: f64,
    pub title_score: f64,
    pub overall: f64,
}

/// Scores `profile` against one job posting. Uses the same vocabulary the
/// profile was extracted with to find the job's skills.
#[derive(Debug, Clone, Copy)]
pub struct FitScorer<'v> {
    vocab: &'v Vocabulary,
}

impl Default for FitScorer<'static> {
    fn default() -> Self {
        Self::new(Vocabulary::builtin())
    }
}

impl<'v> FitScorer<'v> {
    pub fn new(vocab: &'v Vocabulary) -> Self {
        Self { vocab }
    }

    /// Overall fit in [0, 1]. A profile with no text scores 0.
    pub fn match_score(&self, profile: &ResumeProfile, job_description: &str, job_title: &str) -> f64 {
        self.breakdown(profile, job_description, job_title).overall
    }

    pub fn breakdown(
        &self,
        profile: &ResumeProfile,
        job_description: &str,
        job_title: &str,
    ) -> FitBreakdown {
        if profile.text.is_empty() {
            return FitBreakdown {
                skill_score: 0.0,
                word_score: 0.0,
                title_score: 0.0,
                overall: 0.0,
            };
        }

        let job_text = format!("{job_description} {job_title}").to_lowercase();

        let job_skills: HashSet<&str> = self
            .vocab
            .skill_names()
            .filter(|skill| job_text.contains(skill))
            .collect();
        let skill_score = if job_skills.is_empty() {
            0.0
        } else {
            let shared = job_skills
                .iter()
                .filter(|s| profile.skills.contains(**s))
                .count();
            shared as f64 / job_skills.len() as f64
        };

        let resume_lower = profile.text.to_lowercase();
        let resume_words: HashSet<&str> = resume_lower.split_whitespace().collect();
        let job_words: HashSet<&str> = job_text.split_whitespace().collect();
        let shared_words = job_words.intersection(&resume_words).count();
        let word_score = (shared_words as f64 / job_words.len().max(1) as f64).min(1.0);

        let job_title_lower = job_title.to_lowercase();
        let title_hit = profile
            .job_titles
            .iter()
            .any(|t| t.split_whitespace().any(|w| job_title_lower.contains(w)));
        let title_score = if title_hit { TITLE_MATCH_SCORE } else { 0.0 };

        let overall = (skill_score * SKILL_WEIGHT + word_score * WORD_WEIGHT + title_score * TITLE_WEIGHT)
            .min(1.0);

        FitBreakdown {
            skill_score,
            word_score,
            title_score,
            overall,
        }
    }

    /// The profile's skills mentioned anywhere in `job_description`, sorted.
    pub fn matching_skills(&self, profile: &ResumeProfile, job_description: &str) -> Vec<String> {
        let job_lower = job_description.to_lowercase();
        profile
            .skills
            .iter()
            .filter(|s| job_lower.contains(&s.to_lowercase()))
            .cloned()
            .collect()
    }

    /// Scores every record by fit (description + title) and returns them best
    /// first. Records with equal fit keep their corpus order.
    pub fn rank(&self, profile: &ResumeProfile, records: &[JobRecord]) -> Vec<ScoredRecord> {
        let mut ranked: Vec<ScoredRecord> = records
            .iter()
            .map(|record| ScoredRecord {
                similarity_score: self.match_score(profile, record.description(), record.title()),
                record: record.clone(),
            })
            .collect();
        ranked.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        ranked
    }
}
