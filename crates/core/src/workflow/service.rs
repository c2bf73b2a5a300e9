//! Workflow service for budget version state transitions.
//!
//! This module implements the core state machine logic for moving a
//! version through review. Every function is pure: it validates the
//! requested transition against the current status and returns the
//! `WorkflowAction` to persist, or an error leaving state untouched.

use budgetwise_shared::types::UserId;
use chrono::Utc;

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{ApprovalAction, VersionStatus, WorkflowAction};

/// Stateless service for managing budget version workflow transitions.
pub struct WorkflowService;

impl WorkflowService {
    /// Submit a draft or revised version for review.
    ///
    /// Opens a new review iteration: the returned action carries
    /// `current_iteration + 1`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::IllegalTransition` unless the version is in
    /// `Draft` or `RevisionRequested`.
    pub fn submit(
        current_status: VersionStatus,
        current_iteration: u32,
        submitted_by: UserId,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::guard(current_status, VersionStatus::InReview)?;
        Ok(WorkflowAction::Submit {
            new_status: VersionStatus::InReview,
            iteration: current_iteration.saturating_add(1),
            submitted_by,
            submitted_at: Utc::now(),
        })
    }

    /// Approve a version under review.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::IllegalTransition` unless the version is in
    /// `InReview`.
    pub fn approve(
        current_status: VersionStatus,
        current_iteration: u32,
        approved_by: UserId,
        comments: Option<String>,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::guard(current_status, VersionStatus::Approved)?;
        Ok(WorkflowAction::Approve {
            new_status: VersionStatus::Approved,
            iteration: current_iteration,
            approved_by,
            approved_at: Utc::now(),
            comments: non_blank(comments),
        })
    }

    /// Reject a version under review.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::IllegalTransition` unless the version is in `InReview`
    /// - `WorkflowError::CommentsRequired` if `comments` is blank
    pub fn reject(
        current_status: VersionStatus,
        current_iteration: u32,
        rejected_by: UserId,
        comments: String,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::guard(current_status, VersionStatus::Rejected)?;
        let comments = required(comments, ApprovalAction::Rejected)?;
        Ok(WorkflowAction::Reject {
            new_status: VersionStatus::Rejected,
            iteration: current_iteration,
            rejected_by,
            rejected_at: Utc::now(),
            comments,
        })
    }

    /// Send a version under review back to its author.
    ///
    /// The iteration is unchanged; the next submit opens a new one.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::IllegalTransition` unless the version is in `InReview`
    /// - `WorkflowError::CommentsRequired` if `comments` is blank
    pub fn request_changes(
        current_status: VersionStatus,
        current_iteration: u32,
        requested_by: UserId,
        comments: String,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::guard(current_status, VersionStatus::RevisionRequested)?;
        let comments = required(comments, ApprovalAction::RevisionRequested)?;
        Ok(WorkflowAction::RequestChanges {
            new_status: VersionStatus::RevisionRequested,
            iteration: current_iteration,
            requested_by,
            requested_at: Utc::now(),
            comments,
        })
    }

    /// Retire an approved or rejected version.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::IllegalTransition` unless the version is in
    /// `Approved` or `Rejected`.
    pub fn archive(
        current_status: VersionStatus,
        current_iteration: u32,
        archived_by: UserId,
        comments: Option<String>,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::guard(current_status, VersionStatus::Archived)?;
        Ok(WorkflowAction::Archive {
            new_status: VersionStatus::Archived,
            iteration: current_iteration,
            archived_by,
            archived_at: Utc::now(),
            comments: non_blank(comments),
        })
    }

    /// Check that plan details of a version in `status` may be edited.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::VersionLocked` outside `Draft` and
    /// `RevisionRequested`.
    pub fn ensure_editable(status: VersionStatus) -> Result<(), WorkflowError> {
        if status.is_editable() {
            Ok(())
        } else {
            Err(WorkflowError::VersionLocked(status))
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Draft → InReview (submit)
    /// - RevisionRequested → InReview (submit)
    /// - InReview → Approved | Rejected | RevisionRequested
    /// - Approved → Archived
    /// - Rejected → Archived
    #[must_use]
    pub fn is_valid_transition(from: VersionStatus, to: VersionStatus) -> bool {
        matches!(
            (from, to),
            (
                VersionStatus::Draft | VersionStatus::RevisionRequested,
                VersionStatus::InReview
            ) | (
                VersionStatus::InReview,
                VersionStatus::Approved | VersionStatus::Rejected | VersionStatus::RevisionRequested
            ) | (
                VersionStatus::Approved | VersionStatus::Rejected,
                VersionStatus::Archived
            )
        )
    }

    fn guard(from: VersionStatus, to: VersionStatus) -> Result<(), WorkflowError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(WorkflowError::IllegalTransition { from, to })
        }
    }
}

fn required(comments: String, action: ApprovalAction) -> Result<String, WorkflowError> {
    let trimmed = comments.trim();
    if trimmed.is_empty() {
        Err(WorkflowError::CommentsRequired(action))
    } else {
        Ok(trimmed.to_string())
    }
}

fn non_blank(comments: Option<String>) -> Option<String> {
    comments
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
