//! Variance error types.

use budgetwise_shared::AppError;
use budgetwise_shared::types::BudgetVersionId;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::category::CategoryError;
use crate::workflow::VersionStatus;

/// Variance analysis errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VarianceError {
    /// Thresholds violate `0 <= warning <= critical`.
    #[error("Invalid alert thresholds: warning {warning}, critical {critical}")]
    InvalidThresholds {
        /// Warning threshold.
        warning: Decimal,
        /// Critical threshold.
        critical: Decimal,
    },

    /// Variance is only computed for approved plans.
    #[error("Version {version_id} is {status}; variance needs an approved version")]
    VersionNotApproved {
        /// Version.
        version_id: BudgetVersionId,
        /// Its status.
        status: VersionStatus,
    },

    /// The category snapshot is inconsistent.
    #[error(transparent)]
    Hierarchy(#[from] CategoryError),

    /// The actuals or category source failed.
    #[error("Source error: {0}")]
    Source(String),

    /// Version not found.
    #[error("Budget version not found: {0}")]
    VersionNotFound(BudgetVersionId),
}

impl From<VarianceError> for AppError {
    fn from(err: VarianceError) -> Self {
        match err {
            VarianceError::InvalidThresholds { .. } => Self::Validation(err.to_string()),
            VarianceError::VersionNotApproved { .. } => Self::Conflict(err.to_string()),
            VarianceError::Hierarchy(inner) => inner.into(),
            VarianceError::Source(_) => Self::ExternalService(err.to_string()),
            VarianceError::VersionNotFound(_) => Self::NotFound(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_thresholds_is_validation() {
        let app: AppError = VarianceError::InvalidThresholds {
            warning: dec!(20),
            critical: dec!(10),
        }
        .into();
        assert_eq!(app.status_code(), 400);
        assert!(app.to_string().contains("warning 20"));
    }

    #[test]
    fn test_not_approved_is_conflict() {
        let app: AppError = VarianceError::VersionNotApproved {
            version_id: BudgetVersionId::new(),
            status: VersionStatus::Draft,
        }
        .into();
        assert_eq!(app.status_code(), 409);
        assert!(app.to_string().contains("DRAFT"));
    }
}
