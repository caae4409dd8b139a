use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use pillbox_db::models::{PrescriptionChanges, PrescriptionDraft};
use pillbox_types::api::{CreatePrescriptionRequest, UpdatePrescriptionRequest};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::run_blocking;
use crate::session::Session;

/// POST /prescription: id and owner are assigned here, never taken from the
/// body.
pub async fn create_prescription(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<CreatePrescriptionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    if req.name.trim().is_empty() {
        return Err(ApiError::Decode("name must not be empty".into()));
    }

    let draft = PrescriptionDraft {
        name: req.name,
        directions: req.directions,
        time: req.time,
    };

    let db = state.clone();
    let owner = session.username;
    let created = run_blocking(move || Ok(db.prescriptions.create(&owner, draft)?)).await?;

    info!("Created prescription {} for {}", created.id, created.owner);
    Ok(Json(created))
}

/// GET /prescription/{id}
pub async fn get_prescription(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let prescription = run_blocking(move || {
        db.prescriptions
            .find_owned(&id, &session.username)?
            .ok_or(ApiError::NotFound)
    })
    .await?;

    Ok(Json(prescription))
}

/// PUT /prescription/{id}: replaces the supplied fields and re-stamps the
/// owner. A body that fails to decode aborts before anything is written.
pub async fn update_prescription(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePrescriptionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    if req.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(ApiError::Decode("name must not be empty".into()));
    }

    let changes = PrescriptionChanges {
        name: req.name,
        directions: req.directions,
        time: req.time,
    };

    let db = state.clone();
    let updated = run_blocking(move || {
        db.prescriptions
            .update_owned(&id, &session.username, changes)?
            .ok_or(ApiError::NotFound)
    })
    .await?;

    info!("Updated prescription {}", updated.id);
    Ok(Json(updated))
}

/// DELETE /prescription/{id}
pub async fn delete_prescription(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let removed_id = id.clone();
    let removed = run_blocking(move || Ok(db.prescriptions.delete_owned(&id, &session.username)?)).await?;

    if !removed {
        return Err(ApiError::NotFound);
    }

    info!("Deleted prescription {}", removed_id);
    Ok(StatusCode::OK)
}

/// GET /prescriptions: every record owned by the caller, in store order.
pub async fn list_prescriptions(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let prescriptions = run_blocking(move || Ok(db.prescriptions.list_owned(&session.username)?)).await?;

    Ok(Json(prescriptions))
}
