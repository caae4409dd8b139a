use std::sync::OnceLock;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use tracing::error;

use crate::error::ApiError;

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Password hashing failed: {}", e);
            ApiError::Internal
        })
}

/// Check `password` against a stored PHC string.
pub fn verify_password(password: &str, stored: &str) -> Result<(), ApiError> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!("Stored password hash is unreadable: {}", e);
        ApiError::Internal
    })?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ApiError::InvalidCredentials)
}

/// Spend the same work as a real verification when the username is unknown,
/// so response timing does not reveal which usernames exist.
pub fn verify_against_dummy(password: &str) {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();

    let dummy = DUMMY.get_or_init(|| hash_password("pillbox-dummy-password").ok());
    if let Some(dummy) = dummy {
        let _ = verify_password(password, dummy);
    }
}
