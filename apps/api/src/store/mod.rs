//! Tracking store: query history and applied-job records.
//!
//! The matching code never touches this; handlers read `applied_ids()` and
//! pass the set down as an `AppliedLookup`.

pub mod handlers;
pub mod postgres;

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::tracking::{ApplicationRecord, QueryHistoryEntry};

/// Persistence backend for history and application tracking.
///
/// Carried in `AppState` as `Arc<dyn TrackingStore>`.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    /// Appends `query` unless it is already in the history.
    /// Returns true when a new entry was added.
    async fn record_query(&self, query: &str) -> Result<bool>;

    /// History in first-use order.
    async fn query_history(&self) -> Result<Vec<QueryHistoryEntry>>;

    /// Inserts or replaces the record for `application.job_id`.
    async fn mark_applied(&self, application: ApplicationRecord) -> Result<()>;

    /// Returns true when a record existed and was removed.
    async fn unmark_applied(&self, job_id: &str) -> Result<bool>;

    /// All records, oldest application first.
    async fn applications(&self) -> Result<Vec<ApplicationRecord>>;

    async fn applied_ids(&self) -> Result<HashSet<String>>;
}

/// In-process store. Used when no database is configured, and in tests.
#[derive(Default)]
pub struct MemoryStore {
    history: RwLock<Vec<QueryHistoryEntry>>,
    applications: RwLock<Vec<ApplicationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrackingStore for MemoryStore {
    async fn record_query(&self, query: &str) -> Result<bool> {
        let mut history = self.history.write().await;
        if history.iter().any(|h| h.query == query) {
            return Ok(false);
        }
        history.push(QueryHistoryEntry {
            query: query.to_string(),
            first_used_at: Utc::now(),
        });
        Ok(true)
    }

    async fn query_history(&self) -> Result<Vec<QueryHistoryEntry>> {
        Ok(self.history.read().await.clone())
    }

    async fn mark_applied(&self, application: ApplicationRecord) -> Result<()> {
        let mut applications = self.applications.write().await;
        applications.retain(|a| a.job_id != application.job_id);
        applications.push(application);
        applications.sort_by_key(|a| a.applied_at);
        Ok(())
    }

    async fn unmark_applied(&self, job_id: &str) -> Result<bool> {
        let mut applications = self.applications.write().await;
        let before = applications.len();
        applications.retain(|a| a.job_id != job_id);
        Ok(applications.len() != before)
    }

    async fn applications(&self) -> Result<Vec<ApplicationRecord>> {
        Ok(self.applications.read().await.clone())
    }

    async fn applied_ids(&self) -> Result<HashSet<String>> {
        Ok(self
            .applications
            .read()
            .await
            .iter()
            .map(|a| a.job_id.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn application(job_id: &str, minutes: i64) -> ApplicationRecord {
        ApplicationRecord {
            job_id: job_id.to_string(),
            title: format!("Job {job_id}"),
            company_name: "Acme".to_string(),
            link: String::new(),
            applied_at: Utc.with_ymd_and_hms(2025, 12, 3, 9, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    }

    #[tokio::test]
    async fn test_history_deduplicates_and_keeps_order() {
        let store = MemoryStore::new();
        assert!(store.record_query("Electrical Engineer").await.unwrap());
        assert!(store.record_query("Software Developer").await.unwrap());
        assert!(!store.record_query("Electrical Engineer").await.unwrap());

        let queries: Vec<String> = store
            .query_history()
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.query)
            .collect();
        assert_eq!(queries, vec!["Electrical Engineer", "Software Developer"]);
    }

    #[tokio::test]
    async fn test_mark_applied_upserts_by_job_id() {
        let store = MemoryStore::new();
        store.mark_applied(application("a", 5)).await.unwrap();
        store.mark_applied(application("b", 1)).await.unwrap();
        store.mark_applied(application("a", 10)).await.unwrap();

        let apps = store.applications().await.unwrap();
        let ids: Vec<&str> = apps.iter().map(|a| a.job_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let applied = store.applied_ids().await.unwrap();
        assert!(applied.contains("a") && applied.contains("b"));
    }

    #[tokio::test]
    async fn test_unmark_reports_whether_anything_was_removed() {
        let store = MemoryStore::new();
        store.mark_applied(application("a", 0)).await.unwrap();
        assert!(store.unmark_applied("a").await.unwrap());
        assert!(!store.unmark_applied("a").await.unwrap());
        assert!(store.applied_ids().await.unwrap().is_empty());
    }
}
