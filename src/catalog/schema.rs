//! Database schema for the event catalog

/// SQL schema for the catalog database
pub const SCHEMA_SQL: &str = r#"
-- Moment-tensor events; origin is the ordering key and sync cursor source
CREATE TABLE IF NOT EXISTS event (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    event_code TEXT NOT NULL,
    origin TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    depth_km REAL NOT NULL,
    mb REAL NOT NULL,
    ms REAL NOT NULL,
    source_format TEXT NOT NULL,
    source_vendor TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_event_origin ON event(origin);
CREATE INDEX IF NOT EXISTS idx_event_code ON event(event_code);

-- Track synchronization runs
CREATE TABLE IF NOT EXISTS sync_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);
"#;

/// Initializes the catalog schema; safe to call on an already-initialized
/// database.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
