use rusqlite::{ErrorCode, params, params_from_iter};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::filter::{Collection, Field, Filter};
use crate::{Database, DocumentStore};

impl DocumentStore for Database {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn find_one(&self, filter: &Filter) -> Result<Option<Value>> {
        let (clause, params) = filter.where_clause(1);
        let sql = format!(
            "SELECT body FROM documents WHERE {} ORDER BY rowid LIMIT 1",
            clause
        );

        self.with_conn(|conn| {
            let body: Option<String> = conn
                .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))
                .optional()?;

            match body {
                Some(body) => Ok(Some(serde_json::from_str(&body)?)),
                None => Ok(None),
            }
        })
    }

    fn find_all(&self, filter: &Filter) -> Result<Vec<Value>> {
        let (clause, params) = filter.where_clause(1);
        let sql = format!("SELECT body FROM documents WHERE {} ORDER BY rowid", clause);

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let bodies = stmt
                .query_map(params_from_iter(params.iter()), |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            bodies
                .iter()
                .map(|body| serde_json::from_str(body).map_err(StoreError::from))
                .collect()
        })
    }

    fn insert(&self, collection: Collection, id: &str, doc: &Value) -> Result<()> {
        let body = serde_json::to_string(doc)?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
                params![collection.as_str(), id, body],
            )
            .map_err(constraint_as_duplicate)?;

            debug!("Inserted {} document {}", collection.as_str(), id);
            Ok(())
        })
    }

    fn update(&self, filter: &Filter, changes: &[(Field, Value)]) -> Result<bool> {
        if changes.is_empty() {
            return Ok(self.find_one(filter)?.is_some());
        }

        // json_set(body, '$.a', json(?1), '$.b', json(?2), ...)
        let mut assignments = Vec::with_capacity(changes.len());
        let mut params = Vec::with_capacity(changes.len() + filter.clauses().len() + 1);
        for (field, value) in changes {
            params.push(serde_json::to_string(value)?);
            assignments.push(format!("'{}', json(?{})", field.json_path(), params.len()));
        }

        let (clause, where_params) = filter.where_clause(params.len() + 1);
        params.extend(where_params);

        let sql = format!(
            "UPDATE documents SET body = json_set(body, {}) WHERE {}",
            assignments.join(", "),
            clause
        );

        self.with_conn(|conn| {
            let changed = conn
                .execute(&sql, params_from_iter(params.iter()))
                .map_err(constraint_as_duplicate)?;
            Ok(changed > 0)
        })
    }

    fn remove(&self, filter: &Filter) -> Result<bool> {
        let (clause, params) = filter.where_clause(1);
        let sql = format!("DELETE FROM documents WHERE {}", clause);

        self.with_conn(|conn| {
            let removed = conn.execute(&sql, params_from_iter(params.iter()))?;
            Ok(removed > 0)
        })
    }

    fn close(&self) -> Result<()> {
        if let Some(conn) = self.take_conn()? {
            conn.close().map_err(|(_, e)| StoreError::from(e))?;
            info!("Database closed");
        }
        Ok(())
    }
}

fn constraint_as_duplicate(e: rusqlite::Error) -> StoreError {
    match e.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => StoreError::Duplicate,
        _ => StoreError::Sqlite(e),
    }
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
