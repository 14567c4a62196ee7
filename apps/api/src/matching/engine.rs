//! Job Match Engine: fuses per-field similarities into one relevance score
//! and filters a corpus of job records against a query.
//!
//! The fused score is the MAXIMUM of the weighted channels, not a sum. Weights
//! exceed 1.0, so the score is unbounded above 1.0 (max 2.0 via the title
//! channel). Thresholds are compared against that raw value; do not normalise.

use serde::{Deserialize, Serialize};

use crate::matching::similarity::{similarity, word_tokens};
use crate::models::job::{JobRecord, ScoredRecord};

// ────────────────────────────────────────────────────────────────────────────
// Channel weights
// ────────────────────────────────────────────────────────────────────────────

pub const TITLE_WEIGHT: f64 = 2.0;
pub const DESCRIPTION_WEIGHT: f64 = 0.5;
pub const JOB_FUNCTION_WEIGHT: f64 = 1.5;
pub const INDUSTRIES_WEIGHT: f64 = 1.0;
pub const KEYWORD_WEIGHT: f64 = 1.2;

/// Largest fused score any record can reach.
pub const MAX_FUSED_SCORE: f64 = TITLE_WEIGHT;

/// Query tokens of this many chars or fewer are ignored by keyword coverage.
const MIN_KEYWORD_LEN: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Title,
    Description,
    JobFunction,
    Industries,
    KeywordCoverage,
}

/// One channel's raw similarity and its weighted contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelScore {
    pub channel: Channel,
    pub raw: f64,
    pub weight: f64,
    pub weighted: f64,
}

/// Per-record explanation of how the fused score came about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub channels: Vec<ChannelScore>,
    pub fused_score: f64,
    /// Channel with the highest weighted value; earliest channel wins ties.
    pub deciding_channel: Channel,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Fraction of qualifying query words found verbatim in `title + " " + description`.
///
/// Only words longer than three chars qualify; shorter ones are skipped, not
/// counted as misses. Matching is a case-folded substring test, so "engineer"
/// also hits "engineering". No qualifying words → 0.0.
pub fn keyword_coverage(query: &str, title: &str, description: &str) -> f64 {
    let query_lower = query.to_lowercase();
    let full_text = format!("{title} {description}").to_lowercase();

    let keywords: Vec<&str> = word_tokens(&query_lower)
        .into_iter()
        .filter(|w| w.chars().count() > MIN_KEYWORD_LEN)
        .collect();

    if keywords.is_empty() {
        return 0.0;
    }

    let hits = keywords.iter().filter(|k| full_text.contains(*k)).count();
    hits as f64 / keywords.len() as f64
}

/// Scores every channel of `record` against `query` and fuses them.
pub fn explain(record: &JobRecord, query: &str) -> ScoreBreakdown {
    let channels = vec![
        weigh(Channel::Title, similarity(record.title(), query), TITLE_WEIGHT),
        weigh(
            Channel::Description,
            similarity(record.description(), query),
            DESCRIPTION_WEIGHT,
        ),
        weigh(
            Channel::JobFunction,
            similarity(record.job_function(), query),
            JOB_FUNCTION_WEIGHT,
        ),
        weigh(
            Channel::Industries,
            similarity(record.industries(), query),
            INDUSTRIES_WEIGHT,
        ),
        weigh(
            Channel::KeywordCoverage,
            keyword_coverage(query, record.title(), record.description()),
            KEYWORD_WEIGHT,
        ),
    ];

    let mut deciding = &channels[0];
    for candidate in &channels[1..] {
        if candidate.weighted > deciding.weighted {
            deciding = candidate;
        }
    }

    ScoreBreakdown {
        fused_score: deciding.weighted,
        deciding_channel: deciding.channel,
        channels,
    }
}

/// Fused relevance score of one record. Not bounded to [0, 1].
pub fn score_record(record: &JobRecord, query: &str) -> f64 {
    explain(record, query).fused_score
}

/// Returns `(is_match, score)`; a record matches when `score >= threshold`.
pub fn matches_query(record: &JobRecord, query: &str, threshold: f64) -> (bool, f64) {
    let score = score_record(record, query);
    (score >= threshold, score)
}

/// Scores each record, drops non-matches, and returns working copies sorted
/// by score descending. Equal scores keep their corpus order.
pub fn filter(records: &[JobRecord], query: &str, threshold: f64) -> Vec<ScoredRecord> {
    let mut matched: Vec<ScoredRecord> = records
        .iter()
        .filter_map(|record| {
            let (is_match, score) = matches_query(record, query, threshold);
            is_match.then(|| ScoredRecord {
                record: record.clone(),
                similarity_score: score,
            })
        })
        .collect();

    matched.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    matched
}

fn weigh(channel: Channel, raw: f64, weight: f64) -> ChannelScore {
    ChannelScore {
        channel,
        raw,
        weight,
        weighted: raw * weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, description: &str, job_function: &str, industries: &str) -> JobRecord {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "descriptionText": description,
            "jobFunction": job_function,
            "industries": industries,
        }))
        .unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_title_containment_dominates() {
        let record = job("Electrical Engineer II", "", "Engineering", "");
        let (is_match, score) = matches_query(&record, "Electrical Engineer", 0.3);
        assert!(is_match);
        assert!(score >= 1.6, "Score was {score}");

        let breakdown = explain(&record, "Electrical Engineer");
        assert_eq!(breakdown.deciding_channel, Channel::Title);
        assert_close(breakdown.fused_score, 1.6);
    }

    #[test]
    fn test_fused_score_can_exceed_one() {
        let record = job("Welder", "", "", "");
        assert_close(score_record(&record, "welder"), 1.6);
        assert!(matches_query(&record, "welder", 1.5).0);
        assert!(!matches_query(&record, "welder", 1.7).0);
    }

    #[test]
    fn test_keyword_coverage_skips_short_words() {
        // "of" and "qa" are ignored entirely; "head" and "testing" qualify
        let coverage = keyword_coverage("head of QA testing", "Head of Product", "");
        assert_close(coverage, 0.5);
    }

    #[test]
    fn test_keyword_coverage_is_substring_based() {
        let coverage = keyword_coverage("engineer", "Engineering Manager", "");
        assert_close(coverage, 1.0);
    }

    #[test]
    fn test_keyword_coverage_zero_when_no_word_qualifies() {
        assert_eq!(keyword_coverage("QA IT", "QA lead", "IT support"), 0.0);
        assert_eq!(keyword_coverage("", "anything", "at all"), 0.0);
    }

    #[test]
    fn test_keyword_channel_reads_description() {
        let record = job(
            "Associate",
            "You will maintain substation relay protection schemes",
            "",
            "",
        );
        let breakdown = explain(&record, "substation relay");
        let keyword = breakdown
            .channels
            .iter()
            .find(|c| c.channel == Channel::KeywordCoverage)
            .unwrap();
        assert_close(keyword.raw, 1.0);
        assert_close(keyword.weighted, KEYWORD_WEIGHT);
        // description containment 0.8 * 0.5 loses to keyword 1.0 * 1.2
        assert_eq!(breakdown.deciding_channel, Channel::KeywordCoverage);
    }

    #[test]
    fn test_empty_record_scores_zero() {
        let record = JobRecord::default();
        let breakdown = explain(&record, "Electrical Engineer");
        assert_eq!(breakdown.fused_score, 0.0);
        assert_eq!(breakdown.deciding_channel, Channel::Title);
    }

    #[test]
    fn test_filter_drops_non_matches_and_sorts_descending() {
        let records = vec![
            job("Accountant", "", "Finance", "Banking"),
            job("Software Engineer", "", "", ""),
            job("Electrical Engineer", "", "", ""),
            job("Electrical Engineering Intern", "", "", ""),
        ];
        let results = filter(&records, "Electrical Engineer", 0.5);

        let titles: Vec<&str> = results.iter().map(|r| r.record.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Electrical Engineer",
                "Electrical Engineering Intern",
                "Software Engineer"
            ]
        );
        assert!(results
            .windows(2)
            .all(|w| w[0].similarity_score >= w[1].similarity_score));
    }

    #[test]
    fn test_filter_ties_keep_corpus_order() {
        let records = vec![
            job("Welder A", "", "", ""),
            job("Welder B", "", "", ""),
            job("Welder C", "", "", ""),
        ];
        let results = filter(&records, "welder", 0.3);
        let titles: Vec<&str> = results.iter().map(|r| r.record.title()).collect();
        assert_eq!(titles, vec!["Welder A", "Welder B", "Welder C"]);
    }

    #[test]
    fn test_filter_is_idempotent_and_leaves_input_untouched() {
        let records = vec![
            job("Electrical Engineer", "power", "Engineering", "Utilities"),
            job("Nurse", "patient care", "Health Care Provider", "Hospitals"),
        ];
        let snapshot = records.clone();

        let first = filter(&records, "Electrical Engineer", 0.3);
        let second = filter(&records, "Electrical Engineer", 0.3);

        assert_eq!(first, second);
        assert_eq!(records, snapshot);
    }
}
