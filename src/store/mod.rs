//! Cache store: durable storage for generated results.
//!
//! The store is an append-only cache keyed by (keyword, context), not a
//! source of truth. Lookups that find nothing are `Ok(None)`, never an
//! error; real faults (connection loss, timeouts) surface as
//! [`crate::MuninError::Storage`].

use async_trait::async_trait;
use sqlx::FromRow;

use crate::error::Result;

mod postgres;
pub use postgres::PgCacheStore;

/// One cached generation result.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CacheEntry {
    pub id: i64,
    pub keyword: String,
    pub context: String,
    pub result: String,
}

/// Durable cache keyed by (keyword, context).
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Find the cached result for a (keyword, context) pair.
    ///
    /// The empty context is a distinct key, not a wildcard. When
    /// duplicate rows exist the oldest wins, so concurrent writers
    /// cannot flap the answer.
    async fn lookup(&self, keyword: &str, context: &str) -> Result<Option<CacheEntry>>;

    /// Append a generated result. Existing rows are never updated, so a
    /// cached result is immutable once written.
    async fn insert(&self, keyword: &str, context: &str, result: &str) -> Result<()>;
}
