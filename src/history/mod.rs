//! Append-only log of recommendation searches.
//!
//! Every `POST /recommend` produces one [`SearchEvent`]. Writing it is
//! best-effort: callers log a failure and move on.

mod models;
mod schema;
mod sqlite_search_log;

pub use models::{SearchEvent, SearchOutcome, SEARCH_HEADPHONE_EVENT};
pub use schema::SEARCH_LOG_VERSIONED_SCHEMAS;
pub use sqlite_search_log::SqliteSearchLog;

use anyhow::Result;

pub trait SearchLog: Send + Sync {
    fn record(&self, event: &SearchEvent) -> Result<()>;
}

/// Used when no history database is configured.
pub struct NoOpSearchLog;

impl SearchLog for NoOpSearchLog {
    fn record(&self, _event: &SearchEvent) -> Result<()> {
        Ok(())
    }
}
