//! Gcmt-Sync: an incremental moment-tensor catalog synchronizer
//!
//! This crate maintains a local SQLite catalog of GCMT moment-tensor events
//! by reconciling the catalog's high-water mark against the remote archive's
//! per-year directory listings and merging any monthly data files published
//! since the last run.

pub mod catalog;
pub mod config;
pub mod cursor;
pub mod remote;
pub mod sync;

use thiserror::Error;

/// Main error type for Gcmt-Sync operations
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog timestamp '{0}' is not in 'YYYY-MM-DD HH:MM:SS' form")]
    MalformedTimestamp(String),

    #[error("Catalog contains no events to derive a cursor from")]
    EmptyCatalog,

    #[error("Monthly listing for {year} unavailable at {url}: {message}")]
    IndexUnavailable {
        year: i32,
        url: String,
        message: String,
    },

    #[error("Fetch failed for {url}: {message}")]
    FetchFailed { url: String, message: String },

    #[error("Corrupt archive from {url}: {message}")]
    CorruptArchive { url: String, message: String },

    #[error("Catalog error: {0}")]
    Store(#[from] catalog::StoreError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Gcmt-Sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use cursor::SyncCursor;
pub use remote::MonthlyUnit;
pub use sync::{run_sync, SyncDriver, SyncOutcome, SyncReport};
