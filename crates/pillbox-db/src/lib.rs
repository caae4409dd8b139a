pub mod error;
pub mod filter;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod repository;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use serde_json::Value;
use tracing::info;

pub use error::{Result, StoreError};
pub use filter::{Collection, Field, Filter, PrescriptionFilter, UserFilter};
pub use repository::{PrescriptionRepository, UserRepository};

/// Operations every document store backend provides.
///
/// Documents are JSON objects. Each one carries its own `id`, which is also
/// the store key within its collection.
pub trait DocumentStore: Send + Sync {
    /// Generate a fresh, unique document id.
    fn new_id(&self) -> String;

    fn find_one(&self, filter: &Filter) -> Result<Option<Value>>;

    fn find_all(&self, filter: &Filter) -> Result<Vec<Value>>;

    /// Fails with [`StoreError::Duplicate`] when the id or another unique key
    /// is already taken.
    fn insert(&self, collection: Collection, id: &str, doc: &Value) -> Result<()>;

    /// Set `changes` on every document matching `filter`.
    /// Returns whether anything matched.
    fn update(&self, filter: &Filter, changes: &[(Field, Value)]) -> Result<bool>;

    /// Returns whether anything was removed.
    fn remove(&self, filter: &Filter) -> Result<bool>;

    /// Release the underlying connection. Later calls fail with
    /// [`StoreError::Closed`].
    fn close(&self) -> Result<()>;
}

/// SQLite-backed document store. One connection, shared by every request.
pub struct Database {
    conn: Mutex<Option<Connection>>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;

        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;
        f(conn)
    }

    pub(crate) fn take_conn(&self) -> Result<Option<Connection>> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(guard.take())
    }
}
