use std::fmt;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

use crate::error::ApiError;

/// A `username:password` pair taken from an `Authorization: Basic` header.
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
        let value = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::MalformedCredentials)?;

        let (scheme, encoded) = value
            .split_once(' ')
            .ok_or(ApiError::MalformedCredentials)?;
        if !scheme.eq_ignore_ascii_case("Basic") {
            return Err(ApiError::MalformedCredentials);
        }

        let decoded = B64
            .decode(encoded.trim())
            .map_err(|_| ApiError::MalformedCredentials)?;
        let decoded = String::from_utf8(decoded).map_err(|_| ApiError::MalformedCredentials)?;

        // The username ends at the first colon; the password may contain more.
        let (username, password) = decoded
            .split_once(':')
            .ok_or(ApiError::MalformedCredentials)?;
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::MalformedCredentials);
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl<S> FromRequestParts<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
