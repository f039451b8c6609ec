use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP};

const SEARCH_EVENTS_TABLE_V1: Table = Table {
    name: "search_events",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("event", &SqlType::Text, non_null = true),
        sqlite_column!("brand", &SqlType::Text, non_null = true),
        sqlite_column!("model", &SqlType::Text, non_null = true),
        sqlite_column!("outcome", &SqlType::Text, non_null = true),
        sqlite_column!("track_title", &SqlType::Text),
        sqlite_column!("track_artist", &SqlType::Text),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_search_events_created_at", "created_at")],
};

pub const SEARCH_LOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    tables: &[SEARCH_EVENTS_TABLE_V1],
}];
