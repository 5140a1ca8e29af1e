use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ApiResponse;

/// StoreError
///
/// Faults raised by the record store. These never reach a client verbatim; the workflow
/// boundary converts them into `ApiError::Internal`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store was torn down and no longer serves requests.
    #[error("record store is closed")]
    Closed,
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// ApiError
///
/// The request-level error taxonomy. Every variant is terminal for the request:
/// nothing is retried, and guard or validation failures never touch the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Login credentials did not match any user.
    #[error("Invalid username or password.")]
    AuthFailed,
    /// Missing, malformed, tampered or expired bearer token.
    #[error("{0}")]
    Unauthenticated(String),
    /// Role or ownership mismatch.
    #[error("{0}")]
    Forbidden(String),
    /// First schema violation found in the request.
    #[error("{0}")]
    ValidationFailed(String),
    #[error("{0}")]
    NotFound(String),
    /// Duplicate relationship.
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status code this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::AuthFailed | ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "record store fault");
        ApiError::Internal("Something is wrong, please try again".to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ValidationFailed(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body: ApiResponse<()> = match &self {
            ApiError::ValidationFailed(reason) => ApiResponse {
                success: false,
                message: Some("Validation failed".to_string()),
                data: None,
                error: Some(reason.clone()),
            },
            other => ApiResponse::failure(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
