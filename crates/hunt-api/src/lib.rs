pub mod clues;
pub mod error;
pub mod health;
pub mod leaderboard;
pub mod middleware;
pub mod users;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tracing::error;

use hunt_core::HuntResult;
use hunt_db::Database;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

impl AppStateInner {
    pub fn new(db: Database) -> AppState {
        Arc::new(Self { db })
    }
}

/// All routes, without transport layers (CORS, tracing) which the binary adds.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/users/register", post(users::register))
        .route("/leaderboard", get(leaderboard::leaderboard));

    let protected_routes = Router::new()
        .route("/users/profile", get(users::get_profile).post(users::update_profile))
        .route("/clues", get(clues::list_clues))
        .route("/clues/{id}", get(clues::get_clue))
        .route("/clues/{id}/unlock", post(clues::unlock_clue))
        .route("/clues/{id}/verify", post(clues::verify_password))
        .route("/leaderboard/rank", get(leaderboard::rank))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_user,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

/// Runs a storage-bound operation off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> HuntResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}
