//! Cache-first recommendation pipeline.
//!
//! A cache miss runs synthesis then resolution, assembles the record and
//! stores it. Only fully assembled records are ever cached; a not-found or a
//! catalog failure leaves the cache untouched so the next call retries.

use super::{CacheKey, RecommendationRecord};
use crate::cache::RecommendationCache;
use crate::resolver::{ResolveError, TrackResolver};
use crate::synthesizer::SpecSynthesizer;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("No matching track for \"{query}\"")]
    NotFound { query: String },

    #[error("Music catalog unavailable: {0}")]
    Provider(String),
}

type KeyLock = tokio::sync::Mutex<()>;

pub struct RecommendationOrchestrator {
    cache: Arc<dyn RecommendationCache>,
    synthesizer: Arc<dyn SpecSynthesizer>,
    resolver: Arc<dyn TrackResolver>,
    in_flight: Mutex<HashMap<CacheKey, Weak<KeyLock>>>,
}

impl RecommendationOrchestrator {
    pub fn new(
        cache: Arc<dyn RecommendationCache>,
        synthesizer: Arc<dyn SpecSynthesizer>,
        resolver: Arc<dyn TrackResolver>,
    ) -> Self {
        Self {
            cache,
            synthesizer,
            resolver,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache_name(&self) -> &str {
        self.cache.name()
    }

    pub async fn recommend(
        &self,
        brand: &str,
        model: &str,
    ) -> Result<RecommendationRecord, RecommendError> {
        let key = CacheKey::derive(brand, model);

        if let Some(record) = self.cached(&key, brand, model).await {
            return Ok(record);
        }

        // Concurrent misses for one key queue here; whoever goes second
        // usually finds the first one's result in the cache.
        let lock = self.key_lock(&key);
        let _guard = lock.lock().await;

        if let Some(record) = self.cached(&key, brand, model).await {
            return Ok(record);
        }

        let record = self.run_pipeline(&key, brand, model).await?;

        if let Err(err) = self.cache.set(brand, model, &record).await {
            warn!("Could not cache recommendation for {}: {}", key, err);
        } else {
            debug!("Cached recommendation for {}", key);
        }

        Ok(record)
    }

    async fn cached(
        &self,
        key: &CacheKey,
        brand: &str,
        model: &str,
    ) -> Option<RecommendationRecord> {
        match self.cache.get(brand, model).await {
            Ok(Some(record)) => {
                info!("Cache hit for {}", key);
                Some(record)
            }
            Ok(None) => {
                debug!("Cache miss for {}", key);
                None
            }
            Err(err) => {
                warn!(
                    "Cache {} unavailable for {}, treating as miss: {}",
                    self.cache.name(),
                    key,
                    err
                );
                None
            }
        }
    }

    async fn run_pipeline(
        &self,
        key: &CacheKey,
        brand: &str,
        model: &str,
    ) -> Result<RecommendationRecord, RecommendError> {
        let synthesis = self.synthesizer.synthesize(brand, model).await;
        info!("Resolving \"{}\" for {}", synthesis.song_query, key);

        match self.resolver.resolve(&synthesis.song_query).await {
            Ok(track) => Ok(RecommendationRecord::assemble(synthesis, track)),
            Err(ResolveError::NotFound(query)) => {
                info!("No catalog match for \"{}\" ({})", query, key);
                Err(RecommendError::NotFound { query })
            }
            Err(err) => {
                error!("Track resolution failed for {}: {}", key, err);
                Err(RecommendError::Provider(err.to_string()))
            }
        }
    }

    fn key_lock(&self, key: &CacheKey) -> Arc<KeyLock> {
        let mut in_flight = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        in_flight.retain(|_, lock| lock.strong_count() > 0);

        if let Some(lock) = in_flight.get(key).and_then(Weak::upgrade) {
            return lock;
        }
        let lock = Arc::new(KeyLock::new(()));
        in_flight.insert(key.clone(), Arc::downgrade(&lock));
        lock
    }
}
