//! Redis-backed recommendation cache.
//!
//! Values are the JSON-serialized record stored with `SETEX`, so Redis does
//! the expiry. One [`ConnectionManager`] is opened on first use and shared by
//! all requests; it reconnects on its own after Redis drops. Every round trip
//! is bounded by `op_timeout`, and a slow or absent Redis surfaces as
//! [`CacheError`] rather than stalling the request.

use super::{CacheError, RecommendationCache};
use crate::recommendation::{CacheKey, RecommendationRecord};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::future::Future;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

const KEY_PREFIX: &str = "rec";

pub struct RedisRecommendationCache {
    client: Client,
    manager: OnceCell<ConnectionManager>,
    ttl: Duration,
    op_timeout: Duration,
}

impl RedisRecommendationCache {
    /// Creates the cache. No connection is made until the first operation.
    pub fn new(url: &str, ttl: Duration, op_timeout: Duration) -> Result<Self, CacheError> {
        let client = Client::open(url)
            .map_err(|e| CacheError::Unavailable(format!("Invalid Redis URL: {}", e)))?;
        Ok(Self {
            client,
            manager: OnceCell::new(),
            ttl,
            op_timeout,
        })
    }

    fn storage_key(brand: &str, model: &str) -> String {
        format!("{}:{}", KEY_PREFIX, CacheKey::derive(brand, model))
    }

    /// Redis rejects `SETEX` with a zero TTL.
    fn ttl_seconds(&self) -> u64 {
        self.ttl.as_secs().max(1)
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(CacheError::Unavailable(e.to_string())),
            Err(_) => Err(CacheError::Timeout),
        }
    }

    /// A handle on the shared connection. A failed connect is not cached, so
    /// the next operation tries again.
    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let manager = self
            .manager
            .get_or_try_init(|| async {
                let manager = self
                    .bounded(ConnectionManager::new(self.client.clone()))
                    .await?;
                info!("Connected to Redis cache");
                Ok::<_, CacheError>(manager)
            })
            .await?;
        Ok(manager.clone())
    }
}

#[async_trait]
impl RecommendationCache for RedisRecommendationCache {
    async fn get(
        &self,
        brand: &str,
        model: &str,
    ) -> Result<Option<RecommendationRecord>, CacheError> {
        let key = Self::storage_key(brand, model);
        let mut conn = self.connection().await?;
        let data: Option<String> = self.bounded(conn.get(&key)).await?;

        match data {
            Some(json) => {
                let record = serde_json::from_str(&json)
                    .map_err(|e| CacheError::Corrupt(format!("{}: {}", key, e)))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        brand: &str,
        model: &str,
        record: &RecommendationRecord,
    ) -> Result<(), CacheError> {
        let key = Self::storage_key(brand, model);
        let json = serde_json::to_string(record)
            .map_err(|e| CacheError::Corrupt(format!("Failed to serialize record: {}", e)))?;

        let mut conn = self.connection().await?;
        let ttl = self.ttl_seconds();
        let _: () = self.bounded(conn.set_ex(&key, json, ttl)).await?;
        debug!("Wrote {} with ttl {}s", key, ttl);
        Ok(())
    }

    fn name(&self) -> &str {
        "redis"
    }
}
