//! Re-sortable result sets.
//!
//! A `ResultSet` holds one filter run's output and the active sort. Re-sorting
//! always starts from the filter order, so records that compare equal on the
//! active key stay in the order the filter produced them.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::job::{JobRecord, ScoredRecord};

/// "Has the user applied to this job?" Answered by the tracking store,
/// never computed here.
pub trait AppliedLookup {
    fn is_applied(&self, job_id: &str) -> bool;
}

impl AppliedLookup for HashSet<String> {
    fn is_applied(&self, job_id: &str) -> bool {
        !job_id.is_empty() && self.contains(job_id)
    }
}

/// Lookup for callers without tracking data: nothing is applied.
pub struct NoneApplied;

impl AppliedLookup for NoneApplied {
    fn is_applied(&self, _job_id: &str) -> bool {
        false
    }
}

/// Displayed columns a result set can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Similarity,
    Title,
    Company,
    Location,
    EmploymentType,
    JobFunction,
    Seniority,
    Applied,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Similarity => "similarity",
            SortKey::Title => "title",
            SortKey::Company => "company",
            SortKey::Location => "location",
            SortKey::EmploymentType => "employment_type",
            SortKey::JobFunction => "job_function",
            SortKey::Seniority => "seniority",
            SortKey::Applied => "applied",
        }
    }

    /// Direction used the first time this key is selected.
    pub fn initial_direction(&self) -> SortDirection {
        match self {
            SortKey::Similarity => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    fn text_field<'r>(&self, record: &'r JobRecord) -> Option<&'r str> {
        match self {
            SortKey::Title => Some(record.title()),
            SortKey::Company => Some(record.company()),
            SortKey::Location => Some(record.location()),
            SortKey::EmploymentType => Some(record.employment_type()),
            SortKey::JobFunction => Some(record.job_function()),
            SortKey::Seniority => Some(record.seniority()),
            SortKey::Similarity | SortKey::Applied => None,
        }
    }

    /// Ascending comparison of two rows on this key.
    fn compare(&self, a: &ScoredRecord, b: &ScoredRecord, applied: &dyn AppliedLookup) -> Ordering {
        match self {
            SortKey::Similarity => a.similarity_score.total_cmp(&b.similarity_score),
            SortKey::Applied => {
                let flag = |r: &ScoredRecord| u8::from(applied.is_applied(r.record.id()));
                flag(a).cmp(&flag(b))
            }
            _ => self
                .text_field(&a.record)
                .cmp(&self.text_field(&b.record)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Output of one filter run, re-sortable in place.
#[derive(Debug, Clone)]
pub struct ResultSet {
    query: String,
    threshold: f64,
    /// Rows paired with their position in the filter output.
    rows: Vec<(usize, ScoredRecord)>,
    sort: Option<SortState>,
}

impl ResultSet {
    /// Wraps filter output. The rows are already ranked by score, but no key
    /// counts as selected until `sort_by` is called.
    pub fn new(query: impl Into<String>, threshold: f64, records: Vec<ScoredRecord>) -> Self {
        Self {
            query: query.into(),
            threshold,
            rows: records.into_iter().enumerate().collect(),
            sort: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &ScoredRecord> {
        self.rows.iter().map(|(_, r)| r)
    }

    pub fn to_records(&self) -> Vec<ScoredRecord> {
        self.records().cloned().collect()
    }

    /// Source records with the derived score stripped, ready to re-export.
    pub fn export(&self) -> Vec<JobRecord> {
        self.records().map(|r| r.record.clone()).collect()
    }

    /// Re-sorts by `key`. Selecting the active key again flips its direction;
    /// a newly selected key starts at its `initial_direction`.
    pub fn sort_by(&mut self, key: SortKey, applied: &dyn AppliedLookup) -> SortState {
        let direction = match self.sort {
            Some(active) if active.key == key => active.direction.flipped(),
            _ => key.initial_direction(),
        };
        let state = SortState { key, direction };

        self.rows.sort_by(|(pos_a, a), (pos_b, b)| {
            let ord = key.compare(a, b, applied);
            let ord = match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            };
            ord.then(pos_a.cmp(pos_b))
        });

        self.sort = Some(state);
        state
    }

    /// Drops rows the user already applied to. Filter order is preserved.
    pub fn retain_unapplied(&mut self, applied: &dyn AppliedLookup) {
        self.rows.retain(|(_, r)| !applied.is_applied(r.record.id()));
    }
}
