//! Workflow domain types for budget version lifecycle management.
//!
//! This module defines the version status state machine, the audit
//! actions recorded in the approval log, and the transition value the
//! service hands back to the persistence layer.

use budgetwise_shared::types::{ApprovalLogId, BudgetVersionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Budget version status in the approval workflow.
///
/// The valid transitions are:
/// - Draft → InReview (submit)
/// - RevisionRequested → InReview (submit)
/// - InReview → Approved (approve)
/// - InReview → Rejected (reject)
/// - InReview → RevisionRequested (request changes)
/// - Approved → Archived (archive)
/// - Rejected → Archived (archive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionStatus {
    /// Being drafted; plan details can be edited.
    Draft,
    /// Submitted and awaiting a reviewer decision.
    InReview,
    /// Accepted by a reviewer (immutable).
    Approved,
    /// Turned down by a reviewer.
    Rejected,
    /// Sent back to the author for changes; editable again.
    RevisionRequested,
    /// Retired (terminal).
    Archived,
}

impl VersionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::InReview => "IN_REVIEW",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::RevisionRequested => "REVISION_REQUESTED",
            Self::Archived => "ARCHIVED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Some(Self::Draft),
            "IN_REVIEW" => Some(Self::InReview),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            "REVISION_REQUESTED" => Some(Self::RevisionRequested),
            "ARCHIVED" => Some(Self::Archived),
            _ => None,
        }
    }

    /// Returns true if plan details of the version may be edited.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::RevisionRequested)
    }

    /// Returns true if the version may be deleted.
    #[must_use]
    pub const fn is_deletable(&self) -> bool {
        matches!(self, Self::Draft | Self::Rejected)
    }

    /// Returns true if the version carries a final, approved plan.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self, Self::Approved | Self::Archived)
    }
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action recorded in the approval log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalAction {
    /// Version submitted for review.
    Submitted,
    /// Version approved.
    Approved,
    /// Version rejected.
    Rejected,
    /// Reviewer asked for changes.
    RevisionRequested,
    /// Version retired.
    Archived,
}

impl ApprovalAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "SUBMITTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::RevisionRequested => "REVISION_REQUESTED",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only row of a version's approval history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalLogEntry {
    /// Log entry ID.
    pub id: ApprovalLogId,
    /// Version the action applied to.
    pub version_id: BudgetVersionId,
    /// What happened.
    pub action: ApprovalAction,
    /// Review iteration the action belongs to.
    pub iteration: u32,
    /// Who performed the action.
    pub reviewer: UserId,
    /// When it happened.
    pub created_at: DateTime<Utc>,
    /// Reviewer comments.
    pub comments: Option<String>,
}

/// Workflow action representing a state transition with audit data.
///
/// Each variant captures the resulting status, the review iteration the
/// log entry belongs to, and who acted when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowAction {
    /// Submit a draft or revised version for review.
    Submit {
        /// The new status after submission.
        new_status: VersionStatus,
        /// The iteration opened by this submission.
        iteration: u32,
        /// The user who submitted.
        submitted_by: UserId,
        /// When the version was submitted.
        submitted_at: DateTime<Utc>,
    },
    /// Approve a version under review.
    Approve {
        /// The new status after approval.
        new_status: VersionStatus,
        /// Current iteration.
        iteration: u32,
        /// The reviewer.
        approved_by: UserId,
        /// When the version was approved.
        approved_at: DateTime<Utc>,
        /// Optional reviewer comments.
        comments: Option<String>,
    },
    /// Reject a version under review.
    Reject {
        /// The new status after rejection.
        new_status: VersionStatus,
        /// Current iteration.
        iteration: u32,
        /// The reviewer.
        rejected_by: UserId,
        /// When the version was rejected.
        rejected_at: DateTime<Utc>,
        /// The reason for rejection.
        comments: String,
    },
    /// Send a version under review back for changes.
    RequestChanges {
        /// The new status after the request.
        new_status: VersionStatus,
        /// Current iteration; the next submit opens a new one.
        iteration: u32,
        /// The reviewer.
        requested_by: UserId,
        /// When changes were requested.
        requested_at: DateTime<Utc>,
        /// What needs to change.
        comments: String,
    },
    /// Retire an approved or rejected version.
    Archive {
        /// The new status after archiving.
        new_status: VersionStatus,
        /// Current iteration.
        iteration: u32,
        /// The user who archived.
        archived_by: UserId,
        /// When the version was archived.
        archived_at: DateTime<Utc>,
        /// Optional comments.
        comments: Option<String>,
    },
}

impl WorkflowAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> VersionStatus {
        match self {
            Self::Submit { new_status, .. }
            | Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. }
            | Self::RequestChanges { new_status, .. }
            | Self::Archive { new_status, .. } => *new_status,
        }
    }

    /// Returns the review iteration after this action.
    #[must_use]
    pub fn iteration(&self) -> u32 {
        match self {
            Self::Submit { iteration, .. }
            | Self::Approve { iteration, .. }
            | Self::Reject { iteration, .. }
            | Self::RequestChanges { iteration, .. }
            | Self::Archive { iteration, .. } => *iteration,
        }
    }

    /// Returns the action recorded in the approval log.
    #[must_use]
    pub fn log_action(&self) -> ApprovalAction {
        match self {
            Self::Submit { .. } => ApprovalAction::Submitted,
            Self::Approve { .. } => ApprovalAction::Approved,
            Self::Reject { .. } => ApprovalAction::Rejected,
            Self::RequestChanges { .. } => ApprovalAction::RevisionRequested,
            Self::Archive { .. } => ApprovalAction::Archived,
        }
    }

    /// Returns who performed the action and when.
    #[must_use]
    pub fn actor(&self) -> (UserId, DateTime<Utc>) {
        match self {
            Self::Submit {
                submitted_by: by,
                submitted_at: at,
                ..
            }
            | Self::Approve {
                approved_by: by,
                approved_at: at,
                ..
            }
            | Self::Reject {
                rejected_by: by,
                rejected_at: at,
                ..
            }
            | Self::RequestChanges {
                requested_by: by,
                requested_at: at,
                ..
            }
            | Self::Archive {
                archived_by: by,
                archived_at: at,
                ..
            } => (*by, *at),
        }
    }

    /// Returns the reviewer comments, if any.
    #[must_use]
    pub fn comments(&self) -> Option<&str> {
        match self {
            Self::Submit { .. } => None,
            Self::Approve { comments, .. } | Self::Archive { comments, .. } => comments.as_deref(),
            Self::Reject { comments, .. } | Self::RequestChanges { comments, .. } => {
                Some(comments.as_str())
            }
        }
    }

    /// Builds the log entry recording this action against a version.
    #[must_use]
    pub fn to_log_entry(&self, version_id: BudgetVersionId) -> ApprovalLogEntry {
        let (reviewer, created_at) = self.actor();
        ApprovalLogEntry {
            id: ApprovalLogId::new(),
            version_id,
            action: self.log_action(),
            iteration: self.iteration(),
            reviewer,
            created_at,
            comments: self.comments().map(str::to_string),
        }
    }
}
