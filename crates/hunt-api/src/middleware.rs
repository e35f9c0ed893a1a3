use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use hunt_core::{HuntError, UserService};

use crate::error::ApiError;
use crate::{AppState, blocking};

pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller, as identified by the `x-user-id` header.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

/// Resolve the `x-user-id` header to an existing user.
///
/// The identifier is taken at face value; there is no credential behind it.
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingUser)?
        .to_string();

    let id = user_id.clone();
    let exists = blocking(&state, move |db| UserService::new(db).exists(&id)).await?;
    if !exists {
        return Err(HuntError::NotFound("User not found".to_string()).into());
    }

    req.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(req).await)
}
