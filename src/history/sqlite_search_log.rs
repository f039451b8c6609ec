use super::schema::SEARCH_LOG_VERSIONED_SCHEMAS;
use super::{SearchEvent, SearchLog};
use crate::sqlite_persistence::{VersionedSchema, BASE_DB_VERSION};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

pub struct SqliteSearchLog {
    conn: Arc<Mutex<Connection>>,
}

fn latest_schema() -> Result<&'static VersionedSchema> {
    SEARCH_LOG_VERSIONED_SCHEMAS
        .last()
        .context("No search log schema defined")
}

impl SqliteSearchLog {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let is_new_db = !path.exists();

        let conn = Connection::open(path).context("Failed to open search history database")?;

        if is_new_db {
            info!("Creating new search history database at {:?}", path);
            latest_schema()?.create(&conn)?;
        } else {
            let raw_version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
            let db_version = raw_version - BASE_DB_VERSION as i64;
            if db_version < 1 {
                anyhow::bail!(
                    "Search history database version {} is invalid (expected >= 1)",
                    db_version
                );
            }

            let schema = SEARCH_LOG_VERSIONED_SCHEMAS
                .iter()
                .find(|s| s.version as i64 == db_version)
                .with_context(|| format!("Unknown search history database version {}", db_version))?;
            schema.validate(&conn).with_context(|| {
                format!(
                    "Search history schema validation failed for version {}",
                    db_version
                )
            })?;
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

}

impl SearchLog for SqliteSearchLog {
    fn record(&self, event: &SearchEvent) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Search history connection lock poisoned"))?;
        conn.execute(
            "INSERT INTO search_events (event, brand, model, outcome, track_title, track_artist)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                event.event,
                event.brand,
                event.model,
                event.outcome.as_str(),
                event.track_title,
                event.track_artist,
            ],
        )
        .context("Failed to insert search event")?;
        Ok(())
    }
}
