//! Similarity Scorer: tiered pairwise string similarity in [0, 1].
//!
//! Tiers, first applicable wins:
//! 1. either side empty → 0.0
//! 2. case-folded containment (either direction) → flat `CONTAINMENT_SCORE`
//! 3. shared word tokens → |A ∩ B| / max(|A|, |B|)
//! 4. otherwise the character-level sequence ratio
//!
//! Tier 3 normalises by the larger token set, not the union. Scores are kept
//! reproducible against the reference ranking, so do not swap in Jaccard.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::matching::sequence::sequence_ratio;

/// Flat score for one string containing the other.
pub const CONTAINMENT_SCORE: f64 = 0.8;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Which tier produced a similarity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityTier {
    Empty,
    Containment,
    TokenOverlap,
    Sequence,
}

/// Splits text into `\w+` tokens, preserving order and duplicates.
/// Callers case-fold first when they need lowercase tokens.
pub fn word_tokens(text: &str) -> Vec<&str> {
    WORD_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Similarity between two strings. See the module docs for the tiers.
pub fn similarity(a: &str, b: &str) -> f64 {
    similarity_with_tier(a, b).0
}

/// Same as [`similarity`], also reporting which tier decided the score.
pub fn similarity_with_tier(a: &str, b: &str) -> (f64, SimilarityTier) {
    if a.is_empty() || b.is_empty() {
        return (0.0, SimilarityTier::Empty);
    }

    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();

    if a_lower.contains(&b_lower) || b_lower.contains(&a_lower) {
        return (CONTAINMENT_SCORE, SimilarityTier::Containment);
    }

    let a_tokens: HashSet<&str> = word_tokens(&a_lower).into_iter().collect();
    let b_tokens: HashSet<&str> = word_tokens(&b_lower).into_iter().collect();

    let shared = a_tokens.intersection(&b_tokens).count();
    if shared > 0 {
        // shared > 0 implies both sets are non-empty
        let larger = a_tokens.len().max(b_tokens.len());
        return (shared as f64 / larger as f64, SimilarityTier::TokenOverlap);
    }

    (sequence_ratio(&a_lower, &b_lower), SimilarityTier::Sequence)
}
