use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use hunt_core::UserService;
use hunt_types::api::{ProfileResponse, RegisterRequest, UpdateProfileRequest};
use hunt_types::models::User;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::{AppState, blocking};

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let user_id = Uuid::new_v4().to_string();

    let user = blocking(&state, move |db| {
        UserService::new(db).register(&user_id, &req.username)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(profile(user))))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = blocking(&state, move |db| UserService::new(db).profile(&user_id)).await?;
    Ok(Json(profile(user)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let user = blocking(&state, move |db| {
        UserService::new(db).rename(&user_id, &req.username)
    })
    .await?;
    Ok(Json(profile(user)))
}

fn profile(user: User) -> ProfileResponse {
    ProfileResponse {
        id: user.id,
        username: user.name,
        created_at: user.created_at,
    }
}
