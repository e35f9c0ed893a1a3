use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use hunt_core::{ClueService, UnlockEngine};
use hunt_types::api::{UnlockRequest, VerifyPasswordRequest, VerifyPasswordResponse};

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::{AppState, blocking};

/// GET /clues: the whole hunt, with this user's locked/unlocked status.
pub async fn list_clues(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let clues = blocking(&state, move |db| ClueService::new(db).clues_for_user(&user_id)).await?;
    Ok(Json(clues))
}

/// GET /clues/{id}: content of an already unlocked clue.
pub async fn get_clue(
    State(state): State<AppState>,
    Path(clue_id): Path<String>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let clue = blocking(&state, move |db| {
        ClueService::new(db).view_clue(&user_id, &clue_id)
    })
    .await?;
    Ok(Json(clue))
}

/// POST /clues/{id}/unlock
pub async fn unlock_clue(
    State(state): State<AppState>,
    Path(clue_id): Path<String>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    body: Result<Json<UnlockRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let unlocked = blocking(&state, move |db| {
        UnlockEngine::new(db).attempt_unlock(&user_id, &clue_id, &req.password)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(unlocked.clue)))
}

/// POST /clues/{id}/verify: check a tag without unlocking.
pub async fn verify_password(
    State(state): State<AppState>,
    Path(clue_id): Path<String>,
    body: Result<Json<VerifyPasswordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let valid = blocking(&state, move |db| {
        ClueService::new(db).verify_password(&clue_id, &req.password)
    })
    .await?;
    Ok(Json(VerifyPasswordResponse { valid }))
}
