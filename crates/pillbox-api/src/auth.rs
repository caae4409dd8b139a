use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use tracing::{error, info, warn};

use pillbox_db::{DocumentStore, PrescriptionRepository, UserRepository};
use pillbox_types::models::User;

use crate::credentials::Credentials;
use crate::error::ApiError;
use crate::password::{hash_password, verify_against_dummy, verify_password};
use crate::run_blocking;
use crate::session;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub users: UserRepository,
    pub prescriptions: PrescriptionRepository,
    pub session_secret: String,
}

impl AppStateInner {
    pub fn new(store: Arc<dyn DocumentStore>, session_secret: impl Into<String>) -> AppState {
        Arc::new(Self {
            users: UserRepository::new(store.clone()),
            prescriptions: PrescriptionRepository::new(store),
            session_secret: session_secret.into(),
        })
    }
}

/// POST /register with `Authorization: Basic`. Creates the account and
/// starts a session.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    credentials: Credentials,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let record = run_blocking(move || {
        let password_hash = hash_password(&credentials.password)?;
        Ok(db.users.create(&credentials.username, &password_hash)?)
    })
    .await
    .inspect_err(|e| {
        if matches!(e, ApiError::Conflict) {
            warn!("Registration refused: username already taken");
        }
    })?;

    info!("Registered user {}", record.username);
    start_session(&state, jar, record.into())
}

/// POST /login with `Authorization: Basic`. Starts a session when the
/// password matches.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    credentials: Credentials,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let username = credentials.username.clone();
    let record = run_blocking(move || {
        let Some(record) = db.users.find_by_username(&credentials.username)? else {
            verify_against_dummy(&credentials.password);
            return Err(ApiError::InvalidCredentials);
        };

        verify_password(&credentials.password, &record.password_hash)?;
        Ok(record)
    })
    .await
    .inspect_err(|e| {
        if matches!(e, ApiError::InvalidCredentials) {
            warn!("Failed login for {}", username);
        }
    })?;

    info!("User {} logged in", record.username);
    start_session(&state, jar, record.into())
}

fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: User,
) -> Result<(CookieJar, Json<User>), ApiError> {
    let issued = session::issue(&state.session_secret, &user.username).map_err(|e| {
        error!("Failed to sign session token: {}", e);
        ApiError::Internal
    })?;

    Ok((jar.add(issued.cookie()), Json(user)))
}
