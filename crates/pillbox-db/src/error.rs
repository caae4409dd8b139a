use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key (document id or username) is already taken.
    #[error("record already exists")]
    Duplicate,

    #[error("database connection is closed")]
    Closed,

    #[error("database lock poisoned: {0}")]
    Poisoned(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("document encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
