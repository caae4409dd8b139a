use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use time::{Duration, OffsetDateTime};

use pillbox_types::api::Claims;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "username";

/// Sessions last one hour from issuance.
pub const SESSION_TTL: Duration = Duration::hours(1);

/// Identity resolved from a verified session cookie. Inserted into request
/// extensions by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
}

/// A freshly signed session token and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires: OffsetDateTime,
}

impl IssuedSession {
    pub fn cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, self.token.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .expires(self.expires)
            .build()
    }
}

pub fn issue(secret: &str, username: &str) -> anyhow::Result<IssuedSession> {
    issue_at(secret, username, OffsetDateTime::now_utc())
}

fn issue_at(secret: &str, username: &str, now: OffsetDateTime) -> anyhow::Result<IssuedSession> {
    let expires = now + SESSION_TTL;
    let claims = Claims {
        sub: username.to_string(),
        exp: expires.unix_timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(IssuedSession { token, expires })
}

/// Check signature and expiry. Any failure means "no session".
pub fn verify(secret: &str, token: &str) -> Option<Session> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()?;

    Some(Session {
        username: data.claims.sub,
    })
}
