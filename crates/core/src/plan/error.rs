//! Plan error types.

use budgetwise_shared::AppError;
use budgetwise_shared::types::{BudgetVersionId, CategoryId, PlanDetailId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::category::CategoryError;
use crate::workflow::VersionStatus;

/// Plan detail and version errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Amount cannot be negative.
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// Month outside 1..=12.
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u8),

    /// Plan amounts may only be entered on leaf categories.
    #[error("Category {0} has active children; plan amounts belong on leaf categories")]
    NotLeaf(CategoryId),

    /// The category or one of its ancestors is inactive.
    #[error("Category {0} is inactive")]
    InactiveCategory(CategoryId),

    /// The version is not editable in its current status.
    #[error("Version {version_id} is locked in status {status}")]
    VersionLocked {
        /// Locked version.
        version_id: BudgetVersionId,
        /// Its status.
        status: VersionStatus,
    },

    /// Version not found.
    #[error("Budget version not found: {0}")]
    VersionNotFound(BudgetVersionId),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Plan detail not found.
    #[error("Plan detail not found: {0}")]
    DetailNotFound(PlanDetailId),

    /// The version cannot be deleted in its current status.
    #[error("Version {version_id} cannot be deleted in status {status}")]
    VersionNotDeletable {
        /// Version.
        version_id: BudgetVersionId,
        /// Its status.
        status: VersionStatus,
    },

    /// Version name is blank.
    #[error("Version name cannot be empty")]
    EmptyName,

    /// The category snapshot is inconsistent.
    #[error(transparent)]
    Hierarchy(#[from] CategoryError),
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::NegativeAmount(_)
            | PlanError::InvalidMonth(_)
            | PlanError::NotLeaf(_)
            | PlanError::InactiveCategory(_)
            | PlanError::EmptyName => Self::Validation(err.to_string()),
            PlanError::VersionLocked { .. } => Self::Locked(err.to_string()),
            PlanError::VersionNotDeletable { .. } => Self::Conflict(err.to_string()),
            PlanError::VersionNotFound(_)
            | PlanError::CategoryNotFound(_)
            | PlanError::DetailNotFound(_) => Self::NotFound(err.to_string()),
            PlanError::Hierarchy(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(PlanError::NegativeAmount(dec!(-1)), 400)]
    #[case(PlanError::InvalidMonth(13), 400)]
    #[case(PlanError::NotLeaf(CategoryId::new()), 400)]
    #[case(PlanError::InactiveCategory(CategoryId::new()), 400)]
    #[case(PlanError::EmptyName, 400)]
    #[case(PlanError::VersionNotFound(BudgetVersionId::new()), 404)]
    #[case(PlanError::CategoryNotFound(CategoryId::new()), 404)]
    #[case(PlanError::DetailNotFound(PlanDetailId::new()), 404)]
    #[case(
        PlanError::VersionLocked { version_id: BudgetVersionId::new(), status: VersionStatus::InReview },
        423
    )]
    #[case(
        PlanError::VersionNotDeletable { version_id: BudgetVersionId::new(), status: VersionStatus::Approved },
        409
    )]
    fn test_status_mapping(#[case] err: PlanError, #[case] status: u16) {
        let app: AppError = err.into();
        assert_eq!(app.status_code(), status);
    }

    #[test]
    fn test_hierarchy_error_keeps_category_mapping() {
        let id = CategoryId::new();
        let err: PlanError = CategoryError::SelfParent(id).into();
        let app: AppError = err.into();
        assert_eq!(app.error_code(), "INVALID_HIERARCHY");
    }
}
