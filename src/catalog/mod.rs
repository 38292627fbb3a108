//! Persistent event catalog
//!
//! This module owns the local SQLite store, including:
//! - Schema initialization for the `event` and `sync_runs` tables
//! - The high-water-mark read the sync cursor is derived from
//! - NDK text parsing and the atomic merge operations that append rows
//! - Run bookkeeping for resumable synchronization

mod ndk;
mod schema;
mod sqlite;

pub use ndk::{append_data_file, create_data_file, parse_ndk, DataFormat, NdkEvent};
pub use schema::initialize_schema;
pub use sqlite::CatalogStore;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the catalog layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Catalog not found at {0}")]
    CatalogMissing(PathBuf),

    #[error("Malformed NDK block at line {line}: {message}")]
    NdkParse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for catalog operations
pub type StoreResult<T> = Result<T, StoreError>;

/// One moment-tensor event row as stored in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub event_code: String,
    /// Origin time in `YYYY-MM-DD HH:MM:SS` form; the maximum across all
    /// rows defines the synchronization cursor.
    pub origin: String,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_km: f64,
    pub mb: f64,
    pub ms: f64,
    pub source_format: String,
    pub source_vendor: String,
}

/// Represents a synchronization run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// Status of a synchronization run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Aborted,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "aborted" => Some(Self::Aborted),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_roundtrip() {
        for status in &[
            RunStatus::Running,
            RunStatus::Completed,
            RunStatus::Aborted,
            RunStatus::Failed,
        ] {
            let db_str = status.to_db_string();
            let parsed = RunStatus::from_db_string(db_str);
            assert_eq!(Some(*status), parsed);
        }
    }

    #[test]
    fn test_run_status_invalid() {
        assert_eq!(RunStatus::from_db_string("invalid"), None);
    }
}
