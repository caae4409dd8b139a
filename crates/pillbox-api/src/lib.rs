pub mod auth;
pub mod credentials;
pub mod error;
pub mod middleware;
pub mod password;
pub mod prescriptions;
pub mod session;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tracing::error;

use crate::auth::AppState;
use crate::error::ApiError;

/// All routes behind the session gate. `/register` and `/login` are the only
/// paths the gate lets through without a session.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/prescription", post(prescriptions::create_prescription))
        .route(
            "/prescription/{id}",
            get(prescriptions::get_prescription)
                .put(prescriptions::update_prescription)
                .delete(prescriptions::delete_prescription),
        )
        .route("/prescriptions", get(prescriptions::list_prescriptions))
        .layer(from_fn_with_state(state.clone(), middleware::require_session))
        .with_state(state)
}

/// Run blocking store work (and password hashing) off the async runtime.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal
    })?
}
