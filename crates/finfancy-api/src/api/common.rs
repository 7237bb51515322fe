// Common DTOs and the HTTP error type
//
// These types are shared across multiple API endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use finfancy_core::AuthError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body rendered for every session failure
pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Login successful")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// HTTP error: a status plus an `ErrorResponse` body
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, NOT_AUTHENTICATED)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.error))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            // Gate failures are indistinguishable to the client
            AuthError::NotAuthenticated
            | AuthError::InvalidSession
            | AuthError::SessionExpired
            | AuthError::UserNotFound => {
                tracing::debug!(reason = %err, "Rejected unauthenticated request");
                ApiError::unauthorized()
            }
            AuthError::InvalidCredentials => {
                ApiError::new(StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            AuthError::DuplicateUser => {
                ApiError::new(StatusCode::BAD_REQUEST, "Email already registered")
            }
            AuthError::Validation(msg) => ApiError::unprocessable(msg),
            AuthError::Unavailable(source) => {
                tracing::error!("Store unavailable: {:#}", source);
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Service unavailable")
            }
            AuthError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}
