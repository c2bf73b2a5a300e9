//! Workflow repository for budget version state transitions.
//!
//! Each transition reads the status, validates it with `WorkflowService`,
//! writes the new status and row version, and appends the approval log
//! entry while holding the write lock. Two racing transitions on one
//! version therefore never both succeed from the same source state.

use budgetwise_core::plan::BudgetVersion;
use budgetwise_core::workflow::{
    ApprovalLogEntry, VersionStatus, WorkflowAction, WorkflowError, WorkflowService,
};
use budgetwise_shared::types::{BudgetVersionId, UserId};
use serde::Deserialize;
use tracing::info;

use crate::store::MemoryStore;

/// Who performs a transition, with optional comments and lock check.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionInput {
    /// Acting user.
    pub actor: UserId,
    /// Review comments. Required to reject or request changes.
    #[serde(default)]
    pub comments: Option<String>,
    /// Fails with `StaleVersion` unless the version's row version matches.
    #[serde(default)]
    pub expected_row_version: Option<u64>,
}

impl TransitionInput {
    /// A transition by `actor` without comments or lock check.
    #[must_use]
    pub const fn by(actor: UserId) -> Self {
        Self {
            actor,
            comments: None,
            expected_row_version: None,
        }
    }

    /// Adds comments.
    #[must_use]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    /// Adds an optimistic lock check.
    #[must_use]
    pub const fn expecting(mut self, row_version: u64) -> Self {
        self.expected_row_version = Some(row_version);
        self
    }
}

/// Workflow repository for budget version state transitions.
#[derive(Debug, Clone)]
pub struct WorkflowRepository {
    store: MemoryStore,
}

impl WorkflowRepository {
    /// Creates a new workflow repository.
    #[must_use]
    pub const fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Submits a `DRAFT` or `REVISION_REQUESTED` version for review.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::VersionNotFound` if the version does not exist
    /// - `WorkflowError::StaleVersion` if the lock check fails
    /// - `WorkflowError::IllegalTransition` from any other status
    pub async fn submit(
        &self,
        version_id: BudgetVersionId,
        input: TransitionInput,
    ) -> Result<BudgetVersion, WorkflowError> {
        let actor = input.actor;
        self.transition(version_id, input.expected_row_version, |status, iteration| {
            WorkflowService::submit(status, iteration, actor)
        })
        .await
    }

    /// Approves an `IN_REVIEW` version.
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit`], from any status but `IN_REVIEW`.
    pub async fn approve(
        &self,
        version_id: BudgetVersionId,
        input: TransitionInput,
    ) -> Result<BudgetVersion, WorkflowError> {
        let TransitionInput {
            actor,
            comments,
            expected_row_version,
        } = input;
        self.transition(version_id, expected_row_version, |status, iteration| {
            WorkflowService::approve(status, iteration, actor, comments)
        })
        .await
    }

    /// Rejects an `IN_REVIEW` version.
    ///
    /// # Errors
    ///
    /// Same as [`Self::approve`], plus `WorkflowError::CommentsRequired` if
    /// the comments are missing or blank.
    pub async fn reject(
        &self,
        version_id: BudgetVersionId,
        input: TransitionInput,
    ) -> Result<BudgetVersion, WorkflowError> {
        let TransitionInput {
            actor,
            comments,
            expected_row_version,
        } = input;
        self.transition(version_id, expected_row_version, |status, iteration| {
            WorkflowService::reject(status, iteration, actor, comments.unwrap_or_default())
        })
        .await
    }

    /// Sends an `IN_REVIEW` version back for revision.
    ///
    /// # Errors
    ///
    /// Same as [`Self::reject`].
    pub async fn request_changes(
        &self,
        version_id: BudgetVersionId,
        input: TransitionInput,
    ) -> Result<BudgetVersion, WorkflowError> {
        let TransitionInput {
            actor,
            comments,
            expected_row_version,
        } = input;
        self.transition(version_id, expected_row_version, |status, iteration| {
            WorkflowService::request_changes(status, iteration, actor, comments.unwrap_or_default())
        })
        .await
    }

    /// Archives an `APPROVED` or `REJECTED` version.
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit`], from any other status.
    pub async fn archive(
        &self,
        version_id: BudgetVersionId,
        input: TransitionInput,
    ) -> Result<BudgetVersion, WorkflowError> {
        let TransitionInput {
            actor,
            comments,
            expected_row_version,
        } = input;
        self.transition(version_id, expected_row_version, |status, iteration| {
            WorkflowService::archive(status, iteration, actor, comments)
        })
        .await
    }

    /// Approval log of a version, oldest first.
    ///
    /// Entries outlive the version they describe.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::VersionNotFound` if the version never
    /// existed.
    pub async fn history(
        &self,
        version_id: BudgetVersionId,
    ) -> Result<Vec<ApprovalLogEntry>, WorkflowError> {
        let tables = self.store.read().await;
        let mut entries: Vec<ApprovalLogEntry> = tables
            .approval_log
            .iter()
            .filter(|e| e.version_id == version_id)
            .cloned()
            .collect();
        if entries.is_empty() && !tables.versions.contains_key(&version_id) {
            return Err(WorkflowError::VersionNotFound(version_id));
        }
        entries.sort_by_key(|e| e.created_at);
        Ok(entries)
    }

    async fn transition(
        &self,
        version_id: BudgetVersionId,
        expected_row_version: Option<u64>,
        decide: impl FnOnce(VersionStatus, u32) -> Result<WorkflowAction, WorkflowError>,
    ) -> Result<BudgetVersion, WorkflowError> {
        let mut tables = self.store.write().await;
        let version = tables
            .versions
            .get_mut(&version_id)
            .ok_or(WorkflowError::VersionNotFound(version_id))?;

        if let Some(expected) = expected_row_version
            && expected != version.row_version
        {
            return Err(WorkflowError::StaleVersion {
                expected,
                actual: version.row_version,
            });
        }

        let from = version.status;
        let action = decide(from, version.review_iteration)?;
        let (_, at) = action.actor();
        version.status = action.new_status();
        version.review_iteration = action.iteration();
        version.row_version += 1;
        version.updated_at = at;
        let updated = version.clone();

        let entry = action.to_log_entry(version_id);
        info!(
            version_id = %version_id,
            from = %from,
            to = %updated.status,
            iteration = entry.iteration,
            reviewer = %entry.reviewer,
            "Budget version transitioned"
        );
        tables.approval_log.push(entry);
        Ok(updated)
    }
}
