use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A job the user has applied to, keyed by the posting's stable id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ApplicationRecord {
    pub job_id: String,
    pub title: String,
    pub company_name: String,
    pub link: String,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct QueryHistoryEntry {
    pub query: String,
    pub first_used_at: DateTime<Utc>,
}
