use axum::{Extension, Json, extract::State, response::IntoResponse};

use hunt_core::RankEngine;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::{AppState, blocking};

pub async fn leaderboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let board = blocking(&state, |db| RankEngine::new(db).compute_leaderboard()).await?;
    Ok(Json(board))
}

pub async fn rank(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let rank = blocking(&state, move |db| RankEngine::new(db).get_user_rank(&user_id)).await?;
    Ok(Json(rank))
}
