use super::{CacheEntry, CacheError, Clock, RecommendationCache, SystemClock, DEFAULT_CACHE_TTL};
use crate::recommendation::{CacheKey, RecommendationRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// Process-local cache, used when no Redis URL is configured and in tests.
///
/// Expired entries are dropped lazily on read.
pub struct InMemoryRecommendationCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl InMemoryRecommendationCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<CacheKey, CacheEntry>>, CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Unavailable("in-memory cache lock poisoned".to_string()))
    }
}

impl Default for InMemoryRecommendationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

#[async_trait]
impl RecommendationCache for InMemoryRecommendationCache {
    async fn get(
        &self,
        brand: &str,
        model: &str,
    ) -> Result<Option<RecommendationRecord>, CacheError> {
        let key = CacheKey::derive(brand, model);
        let now = self.clock.now();
        let mut entries = self.lock()?;

        match entries.get(&key) {
            Some(entry) if entry.is_expired(now) => {
                debug!("Dropping expired entry {}", key);
                entries.remove(&key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.record.clone())),
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        brand: &str,
        model: &str,
        record: &RecommendationRecord,
    ) -> Result<(), CacheError> {
        let key = CacheKey::derive(brand, model);
        let entry = CacheEntry::new(record.clone(), self.clock.now(), self.ttl);
        self.lock()?.insert(key, entry);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
