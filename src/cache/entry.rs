use crate::recommendation::RecommendationRecord;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

/// A cached record together with the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub record: RecommendationRecord,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(record: RecommendationRecord, written_at: DateTime<Utc>, ttl: Duration) -> Self {
        let ttl = ChronoDuration::from_std(ttl).unwrap_or(ChronoDuration::MAX);
        let expires_at = written_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { record, expires_at }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
