//! PostgreSQL implementation of the mapping store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{MappingStore, StoreSummary};
use crate::error::AppError;

#[derive(FromRow)]
struct MappingRow {
    id: i64,
    original_url: String,
    short_code: String,
    created_at: DateTime<Utc>,
    click_count: i64,
}

impl From<MappingRow> for Mapping {
    fn from(r: MappingRow) -> Self {
        Mapping::new(r.id, r.original_url, r.short_code, r.created_at, r.click_count)
    }
}

/// PostgreSQL store for mappings.
///
/// Every operation is a single statement, so atomicity comes from PostgreSQL
/// row-level guarantees. The connection pool is shared with the rest of the
/// process.
pub struct PgMappingStore {
    pool: Arc<PgPool>,
}

impl PgMappingStore {
    /// Creates a new store over a connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingStore for PgMappingStore {
    async fn find_by_original_url(&self, url: &str) -> Result<Option<Mapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, original_url, short_code, created_at, click_count
            FROM mappings
            WHERE original_url = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Mapping::from))
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<Mapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, original_url, short_code, created_at, click_count
            FROM mappings
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Mapping::from))
    }

    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            INSERT INTO mappings (original_url, short_code, created_at, click_count)
            VALUES ($1, $2, $3, 0)
            RETURNING id, original_url, short_code, created_at, click_count
            "#,
        )
        .bind(&new_mapping.original_url)
        .bind(&new_mapping.short_code)
        .bind(new_mapping.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn increment_click_count(&self, code: &str, delta: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE mappings SET click_count = click_count + $2 WHERE short_code = $1",
        )
        .bind(code)
        .bind(delta)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Short code not found",
                json!({ "code": code }),
            ));
        }

        Ok(())
    }

    async fn summary(&self) -> Result<StoreSummary, AppError> {
        let (mappings, total_clicks): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(click_count), 0)::BIGINT FROM mappings",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(StoreSummary {
            mappings,
            total_clicks,
        })
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
