use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use hunt_core::HuntError;
use hunt_types::api::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Hunt(#[from] HuntError),

    #[error("User ID required")]
    MissingUser,

    #[error("Invalid request body: {0}")]
    BadBody(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Hunt(err) => match err {
                HuntError::NotFound(_) => StatusCode::NOT_FOUND,
                HuntError::Conflict(_) => StatusCode::CONFLICT,
                HuntError::Unauthorized => StatusCode::UNAUTHORIZED,
                HuntError::Forbidden(_) => StatusCode::FORBIDDEN,
                HuntError::Locked => StatusCode::LOCKED,
                HuntError::Validation(_) => StatusCode::BAD_REQUEST,
                HuntError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::MissingUser => StatusCode::UNAUTHORIZED,
            Self::BadBody(_) => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Storage failures are logged here and never echoed to the client.
        let message = match &self {
            Self::Hunt(HuntError::Internal(e)) => {
                error!("Internal error: {:#}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
