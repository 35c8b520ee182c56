//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not active")]
    UserNotActive,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Document already exists: {0}")]
    DocumentAlreadyExists(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Password too short")]
    PasswordTooShort,

    #[error("Password too long")]
    PasswordTooLong,

    #[error("Password too weak")]
    PasswordTooWeak,

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("AI provider error: {0}")]
    AiError(String),

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}

impl From<crm_security::password::PasswordError> for DomainError {
    fn from(error: crm_security::password::PasswordError) -> Self {
        use crm_security::password::PasswordError;
        match error {
            PasswordError::TooShort => DomainError::PasswordTooShort,
            PasswordError::TooLong => DomainError::PasswordTooLong,
            PasswordError::TooWeak => DomainError::PasswordTooWeak,
            other => DomainError::PasswordHashError(other.to_string()),
        }
    }
}
