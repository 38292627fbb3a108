//! SQLite-backed catalog store

use crate::catalog::schema::initialize_schema;
use crate::catalog::{EventRow, RunRecord, RunStatus, StoreError, StoreResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Handle on the catalog database
pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    /// Opens the catalog at `path`, creating the file and schema on first
    /// use.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory catalog (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    // ===== High-water mark =====

    /// Maximum `origin` timestamp across all events, or `None` for an empty
    /// catalog. This value defines the synchronization cursor.
    pub fn max_origin(&self) -> StoreResult<Option<String>> {
        let max: Option<String> =
            self.conn
                .query_row("SELECT max(origin) FROM event", [], |row| row.get(0))?;
        Ok(max)
    }

    /// Total number of event rows.
    pub fn count_events(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM event", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Appends =====

    /// Appends rows inside a single transaction: either every row lands or
    /// the catalog is unchanged.
    pub fn append_events(&mut self, rows: &[EventRow]) -> StoreResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO event
                 (event_code, origin, latitude, longitude, depth_km, mb, ms,
                  source_format, source_vendor)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.event_code,
                    row.origin,
                    row.latitude,
                    row.longitude,
                    row.depth_km,
                    row.mb,
                    row.ms,
                    row.source_format,
                    row.source_vendor,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    // ===== Run bookkeeping =====

    /// Records the start of a synchronization run.
    pub fn begin_run(&mut self, config_hash: &str) -> StoreResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO sync_runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Closes a run with its terminal status and finish timestamp.
    pub fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE sync_runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        Ok(())
    }

    /// Most recent run record, if any.
    pub fn latest_run(&self) -> StoreResult<Option<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, finished_at, config_hash, status
             FROM sync_runs ORDER BY id DESC LIMIT 1",
        )?;

        let run = stmt
            .query_row([], |row| {
                Ok(RunRecord {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    finished_at: row.get(2)?,
                    config_hash: row.get(3)?,
                    status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
                        .unwrap_or(RunStatus::Running),
                })
            })
            .optional()?;

        Ok(run)
    }
}

/// Fails with [`StoreError::CatalogMissing`] unless a catalog file exists
/// at `path`.
pub(crate) fn require_existing(path: &Path) -> StoreResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(StoreError::CatalogMissing(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(origin: &str) -> EventRow {
        EventRow {
            event_code: "C201101010000A".to_string(),
            origin: origin.to_string(),
            latitude: 13.78,
            longitude: -88.78,
            depth_km: 193.1,
            mb: 5.0,
            ms: 0.0,
            source_format: "ndk".to_string(),
            source_vendor: "gcmt".to_string(),
        }
    }

    #[test]
    fn test_open_in_memory() {
        assert!(CatalogStore::open_in_memory().is_ok());
    }

    #[test]
    fn test_max_origin_empty_catalog() {
        let store = CatalogStore::open_in_memory().unwrap();
        assert_eq!(store.max_origin().unwrap(), None);
    }

    #[test]
    fn test_append_and_max_origin() {
        let mut store = CatalogStore::open_in_memory().unwrap();
        store
            .append_events(&[
                sample_row("2011-01-02 03:04:05"),
                sample_row("2011-02-10 11:12:13"),
                sample_row("2011-01-20 00:00:00"),
            ])
            .unwrap();

        assert_eq!(store.count_events().unwrap(), 3);
        assert_eq!(
            store.max_origin().unwrap(),
            Some("2011-02-10 11:12:13".to_string())
        );
    }

    #[test]
    fn test_append_empty_slice_is_noop() {
        let mut store = CatalogStore::open_in_memory().unwrap();
        assert_eq!(store.append_events(&[]).unwrap(), 0);
        assert_eq!(store.count_events().unwrap(), 0);
    }

    #[test]
    fn test_run_bookkeeping() {
        let mut store = CatalogStore::open_in_memory().unwrap();
        let run_id = store.begin_run("abc123").unwrap();
        assert!(run_id > 0);

        let latest = store.latest_run().unwrap().unwrap();
        assert_eq!(latest.id, run_id);
        assert_eq!(latest.status, RunStatus::Running);
        assert_eq!(latest.config_hash, "abc123");
        assert!(latest.finished_at.is_none());

        store.finish_run(run_id, RunStatus::Completed).unwrap();
        let latest = store.latest_run().unwrap().unwrap();
        assert_eq!(latest.status, RunStatus::Completed);
        assert!(latest.finished_at.is_some());
    }

    #[test]
    fn test_latest_run_empty() {
        let store = CatalogStore::open_in_memory().unwrap();
        assert!(store.latest_run().unwrap().is_none());
    }
}
