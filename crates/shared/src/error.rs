//! Application-wide error types.
//!
//! Every module error in `budgetwise-core` converts into one of these
//! variants, which fixes the HTTP status and the stable error code that
//! the API renders.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error (bad input shape or range).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation (e.g. an inconsistent category hierarchy).
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Approval state machine violation.
    #[error("Illegal transition: {0}")]
    IllegalTransition(String),

    /// Edit attempted on a version that is not editable.
    #[error("Version locked: {0}")]
    Locked(String),

    /// Conflict (e.g., stale optimistic lock).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// External service error (category or actuals source).
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule(_) => 422,
            Self::IllegalTransition(_) | Self::Conflict(_) => 409,
            Self::Locked(_) => 423,
            Self::ExternalService(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "INVALID_HIERARCHY",
            Self::IllegalTransition(_) => "ILLEGAL_TRANSITION",
            Self::Locked(_) => "VERSION_LOCKED",
            Self::Conflict(_) => "CONFLICT",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
