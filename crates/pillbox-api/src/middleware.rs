use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::session::{self, SESSION_COOKIE};

/// Paths reachable without a session: the two that issue one.
pub const PUBLIC_PATHS: [&str; 2] = ["/register", "/login"];

/// Gate decision for one request.
pub fn admits(path: &str, has_session: bool) -> bool {
    has_session || PUBLIC_PATHS.contains(&path)
}

/// Reject requests without a valid session cookie unless they target a
/// public path. A verified session is attached as a `Session` extension.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| session::verify(&state.session_secret, cookie.value()));

    if !admits(req.uri().path(), session.is_some()) {
        debug!("Rejected {} {} without session", req.method(), req.uri().path());
        return Err(ApiError::Unauthenticated);
    }

    if let Some(session) = session {
        req.extensions_mut().insert(session);
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths_pass_without_session() {
        assert!(admits("/register", false));
        assert!(admits("/login", false));
    }

    #[test]
    fn protected_paths_need_session() {
        for path in ["/prescription", "/prescription/abc", "/prescriptions", "/", "/register/extra"] {
            assert!(!admits(path, false), "{} should be gated", path);
            assert!(admits(path, true));
        }
    }
}
