use serde::{Deserialize, Serialize};

use pillbox_types::models::User;

/// Stored user document. Distinct from `pillbox_types::models::User` so the
/// password hash stays inside the db layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            username: record.username,
        }
    }
}

/// Client-controlled fields of a new prescription.
#[derive(Debug, Clone, Default)]
pub struct PrescriptionDraft {
    pub name: String,
    pub directions: Option<String>,
    pub time: Option<String>,
}

/// Fields to overwrite on an existing prescription. `None` keeps the stored
/// value.
#[derive(Debug, Clone, Default)]
pub struct PrescriptionChanges {
    pub name: Option<String>,
    pub directions: Option<String>,
    pub time: Option<String>,
}
