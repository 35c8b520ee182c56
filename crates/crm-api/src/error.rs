//! HTTP error type

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crm_core::DomainError;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            DomainError::InvalidCredentials | DomainError::UserNotActive => {
                ApiError::Unauthorized(error.to_string())
            }
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),
            DomainError::EmailAlreadyExists(_)
            | DomainError::DocumentAlreadyExists(_)
            | DomainError::Conflict(_) => ApiError::Conflict(error.to_string()),
            DomainError::PasswordTooShort
            | DomainError::PasswordTooLong
            | DomainError::PasswordTooWeak
            | DomainError::ValidationError(_) => ApiError::BadRequest(error.to_string()),
            DomainError::AiError(msg) => ApiError::ServiceUnavailable(msg),
            DomainError::DatabaseError(msg) => ApiError::DatabaseError(msg),
            DomainError::PasswordHashError(_)
            | DomainError::TokenGenerationError(_)
            | DomainError::TemplateError(_)
            | DomainError::InternalError(_) => ApiError::InternalError(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
            }
            ApiError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, "CONFLICT", msg)
            }
            ApiError::TooManyRequests(msg) => {
                tracing::warn!("Rate limited: {}", msg);
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", msg)
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!("Upstream unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", msg)
            }
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", "Database error".to_string())
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal server error".to_string())
            }
        };

        (status, Json(ApiResponse::<()>::error(code, &message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: DomainError) -> StatusCode {
        ApiError::from(error).into_response().status()
    }

    #[test]
    fn test_domain_error_status_mapping() {
        assert_eq!(status_of(DomainError::ValidationError("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(DomainError::PasswordTooWeak), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(DomainError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(DomainError::UserNotActive), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(DomainError::Forbidden("x".into())), StatusCode::FORBIDDEN);
        assert_eq!(status_of(DomainError::NotFound("Lead")), StatusCode::NOT_FOUND);
        assert_eq!(status_of(DomainError::EmailAlreadyExists("a@b.c".into())), StatusCode::CONFLICT);
        assert_eq!(status_of(DomainError::DocumentAlreadyExists("1".into())), StatusCode::CONFLICT);
        assert_eq!(status_of(DomainError::AiError("down".into())), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_of(DomainError::DatabaseError("boom".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
