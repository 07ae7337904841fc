use leet_tracker_libs::cache::CacheError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Failure taxonomy exposed by the core services. Callers branch on the
/// variant, never on message text.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Malformed input, rejected before any storage access.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Missing row, or a list owned by someone else; the two are reported
    /// identically so callers cannot probe for other users' lists.
    #[error("{0} not found")]
    NotFound(String),

    #[error("conflicting state: {0}")]
    Conflict(String),

    /// Aggregate ingestion failure; callers retry the full run and rely on
    /// upsert idempotence.
    #[error("catalog ingestion failed: {0}")]
    Ingest(String),

    #[error("catalog source unavailable")]
    Upstream(#[from] reqwest::Error),

    #[error("database operation failed")]
    Database(#[from] sqlx::Error),

    #[error("cache backend failed")]
    Cache(#[from] CacheError),
}

impl TrackerError {
    /// Maps unique-constraint violations to `Conflict`; everything else
    /// stays a `Database` error.
    pub fn from_sqlx(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                TrackerError::Conflict(db.message().to_string())
            }
            _ => TrackerError::Database(error),
        }
    }
}
