use thiserror::Error;

use crate::store::StoreError;

/// Every way a hunt operation can be refused. None of these are retryable
/// without the caller changing its input or first meeting a precondition.
#[derive(Debug, Error)]
pub enum HuntError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("The password you entered is incorrect")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("You must unlock all previous clues before unlocking this one")]
    Locked,

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(anyhow::Error),
}

pub type HuntResult<T> = Result<T, HuntError>;

impl From<StoreError> for HuntError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Backend(e) => Self::Internal(e),
            // Callers that expect a duplicate map it themselves before `?`.
            StoreError::Duplicate(what) => {
                Self::Internal(anyhow::anyhow!("unexpected duplicate: {}", what))
            }
        }
    }
}
