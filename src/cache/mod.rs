//! Time-bounded storage of assembled recommendations.
//!
//! Entries are keyed by the case-folded (brand, model) pair and replaced
//! wholesale on every write. A cache that cannot reach its backing store
//! reports [`CacheError`]; callers treat that as a miss.

mod clock;
mod entry;
mod memory_cache;
mod redis_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use memory_cache::InMemoryRecommendationCache;
pub use redis_cache::RedisRecommendationCache;

use crate::recommendation::RecommendationRecord;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Default lifetime of a cached recommendation.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache store unavailable: {0}")]
    Unavailable(String),

    #[error("Cache operation timed out")]
    Timeout,

    #[error("Corrupt cache value: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait RecommendationCache: Send + Sync {
    /// Returns the live entry for the pair, never an expired one.
    async fn get(
        &self,
        brand: &str,
        model: &str,
    ) -> Result<Option<RecommendationRecord>, CacheError>;

    /// Unconditionally replaces the entry, expiring it one TTL from now.
    async fn set(
        &self,
        brand: &str,
        model: &str,
        record: &RecommendationRecord,
    ) -> Result<(), CacheError>;

    /// Backend name, for logs.
    fn name(&self) -> &str;
}
