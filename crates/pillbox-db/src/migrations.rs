use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

/// Every collection lives in one table of JSON documents keyed by
/// `(collection, id)`. Lookups by owner and by username go through
/// expression indexes on the JSON body.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS documents (
            collection  TEXT NOT NULL,
            id          TEXT NOT NULL,
            body        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (collection, id)
        );

        CREATE INDEX IF NOT EXISTS idx_documents_owner
            ON documents(collection, json_extract(body, '$.owner'));

        CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username
            ON documents(json_extract(body, '$.username'))
            WHERE collection = 'users';
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
