//! Postgres-backed cache store.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{CacheEntry, CacheStore};
use crate::config::DatabaseConfig;
use crate::error::Result;

// Created on startup so a fresh database works without a migration step.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS cached_results (
        id BIGSERIAL PRIMARY KEY,
        keyword TEXT NOT NULL,
        context TEXT NOT NULL DEFAULT '',
        result TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS cached_results_keyword_context_idx
        ON cached_results (keyword, context)",
];

/// Cache store backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgCacheStore {
    pool: PgPool,
}

impl PgCacheStore {
    /// Connect with the configured pool size and acquire timeout.
    ///
    /// The URL is passed separately because it usually comes from the
    /// secrets file or environment rather than the main config.
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Create the table and index if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CacheStore for PgCacheStore {
    async fn lookup(&self, keyword: &str, context: &str) -> Result<Option<CacheEntry>> {
        let entry = sqlx::query_as::<_, CacheEntry>(
            "SELECT id, keyword, context, result FROM cached_results
             WHERE keyword = $1 AND context = $2
             ORDER BY id
             LIMIT 1",
        )
        .bind(keyword)
        .bind(context)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn insert(&self, keyword: &str, context: &str, result: &str) -> Result<()> {
        sqlx::query("INSERT INTO cached_results (keyword, context, result) VALUES ($1, $2, $3)")
            .bind(keyword)
            .bind(context)
            .bind(result)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
