//! Error types for the treadlog core library.

/// Top-level error enum for the treadlog core library.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Required columns are missing or misnamed.
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller broke a usage contract (e.g. a year at or before 2020).
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("No store handle: {0}")]
    NoHandle(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
