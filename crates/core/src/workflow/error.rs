//! Workflow error types for budget version lifecycle management.

use budgetwise_shared::AppError;
use budgetwise_shared::types::BudgetVersionId;
use thiserror::Error;

use crate::workflow::types::{ApprovalAction, VersionStatus};

/// Errors that can occur during workflow operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Attempted a transition the state machine does not allow.
    #[error("Illegal status transition from {from} to {to}")]
    IllegalTransition {
        /// The current status.
        from: VersionStatus,
        /// The attempted target status.
        to: VersionStatus,
    },

    /// The action needs non-blank reviewer comments.
    #[error("Comments are required to record {0}")]
    CommentsRequired(ApprovalAction),

    /// Plan edits attempted outside an editable status.
    #[error("Version is locked in status {0}")]
    VersionLocked(VersionStatus),

    /// Version not found.
    #[error("Budget version not found: {0}")]
    VersionNotFound(BudgetVersionId),

    /// Optimistic lock check failed.
    #[error("Version was modified concurrently: expected row version {expected}, found {actual}")]
    StaleVersion {
        /// Row version the caller last saw.
        expected: u64,
        /// Row version currently stored.
        actual: u64,
    },
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::IllegalTransition { .. } => Self::IllegalTransition(err.to_string()),
            WorkflowError::CommentsRequired(_) => Self::Validation(err.to_string()),
            WorkflowError::VersionLocked(_) => Self::Locked(err.to_string()),
            WorkflowError::VersionNotFound(_) => Self::NotFound(err.to_string()),
            WorkflowError::StaleVersion { .. } => Self::Conflict(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_transition_error() {
        let err = WorkflowError::IllegalTransition {
            from: VersionStatus::Approved,
            to: VersionStatus::InReview,
        };
        assert!(err.to_string().contains("APPROVED"));
        assert!(err.to_string().contains("IN_REVIEW"));

        let app: AppError = err.into();
        assert_eq!(app.status_code(), 409);
        assert_eq!(app.error_code(), "ILLEGAL_TRANSITION");
    }

    #[test]
    fn test_comments_required_is_validation() {
        let app: AppError = WorkflowError::CommentsRequired(ApprovalAction::Rejected).into();
        assert_eq!(app.status_code(), 400);
        assert!(app.to_string().contains("REJECTED"));
    }

    #[test]
    fn test_locked_error() {
        let app: AppError = WorkflowError::VersionLocked(VersionStatus::InReview).into();
        assert_eq!(app.status_code(), 423);
        assert_eq!(app.error_code(), "VERSION_LOCKED");
    }

    #[test]
    fn test_stale_version_is_conflict() {
        let app: AppError = WorkflowError::StaleVersion {
            expected: 3,
            actual: 4,
        }
        .into();
        assert_eq!(app.status_code(), 409);
        assert_eq!(app.error_code(), "CONFLICT");
    }

    #[test]
    fn test_not_found_error() {
        let app: AppError = WorkflowError::VersionNotFound(BudgetVersionId::new()).into();
        assert_eq!(app.status_code(), 404);
    }
}
