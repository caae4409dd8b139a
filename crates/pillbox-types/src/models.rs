use serde::{Deserialize, Serialize};

/// A prescription as stored and as returned to its owner.
///
/// `id` and `owner` are always assigned by the server; clients never set them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub owner: String,
}

/// Public view of a registered account. The password hash never leaves the
/// db crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}
