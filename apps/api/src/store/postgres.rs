use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::tracking::{ApplicationRecord, QueryHistoryEntry};
use crate::store::TrackingStore;

/// Postgres-backed tracking store. Tables are created by `db::ensure_schema`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackingStore for PgStore {
    async fn record_query(&self, query: &str) -> Result<bool> {
        let inserted = sqlx::query(
            "INSERT INTO query_history (query) VALUES ($1) ON CONFLICT (query) DO NOTHING",
        )
        .bind(query)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(inserted > 0)
    }

    async fn query_history(&self) -> Result<Vec<QueryHistoryEntry>> {
        let rows = sqlx::query_as::<_, QueryHistoryEntry>(
            "SELECT query, first_used_at FROM query_history ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn mark_applied(&self, application: ApplicationRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO applications (job_id, title, company_name, link, applied_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (job_id) DO UPDATE
            SET title = EXCLUDED.title,
                company_name = EXCLUDED.company_name,
                link = EXCLUDED.link,
                applied_at = EXCLUDED.applied_at
            "#,
        )
        .bind(&application.job_id)
        .bind(&application.title)
        .bind(&application.company_name)
        .bind(&application.link)
        .bind(application.applied_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn unmark_applied(&self, job_id: &str) -> Result<bool> {
        let removed = sqlx::query("DELETE FROM applications WHERE job_id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(removed > 0)
    }

    async fn applications(&self) -> Result<Vec<ApplicationRecord>> {
        let rows = sqlx::query_as::<_, ApplicationRecord>(
            "SELECT job_id, title, company_name, link, applied_at FROM applications ORDER BY applied_at, job_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn applied_ids(&self) -> Result<HashSet<String>> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT job_id FROM applications")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }
}
