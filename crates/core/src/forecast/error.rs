//! Forecast error types.

use budgetwise_shared::AppError;
use thiserror::Error;

/// Forecast calculation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    /// A derived ratio would divide by zero.
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// A parameter is outside its allowed range.
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The actuals source failed.
    #[error("Actuals source error: {0}")]
    Source(String),
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::DivisionByZero(_) | ForecastError::InvalidParameter { .. } => {
                Self::Validation(err.to_string())
            }
            ForecastError::Source(_) => Self::ExternalService(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_division_by_zero_is_validation() {
        let app: AppError =
            ForecastError::DivisionByZero("base driver value is zero".into()).into();
        assert_eq!(app.status_code(), 400);
        assert!(app.to_string().contains("base driver value"));
    }

    #[test]
    fn test_source_error_is_external() {
        let app: AppError = ForecastError::Source("ledger unavailable".into()).into();
        assert_eq!(app.status_code(), 502);
        assert_eq!(app.error_code(), "EXTERNAL_SERVICE_ERROR");
    }
}
