//! Property-based tests for WorkflowService.

use budgetwise_shared::types::{BudgetVersionId, UserId};
use proptest::prelude::*;

use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{ApprovalAction, ApprovalLogEntry, VersionStatus};

/// A workflow command as a caller would issue it.
#[derive(Debug, Clone)]
enum Command {
    Submit,
    Approve(Option<String>),
    Reject(String),
    RequestChanges(String),
    Archive,
}

fn arb_status() -> impl Strategy<Value = VersionStatus> {
    prop_oneof![
        Just(VersionStatus::Draft),
        Just(VersionStatus::InReview),
        Just(VersionStatus::Approved),
        Just(VersionStatus::Rejected),
        Just(VersionStatus::RevisionRequested),
        Just(VersionStatus::Archived),
    ]
}

/// Comments that are sometimes blank.
fn arb_comments() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just("  ".to_string()), "[a-z ]{1,40}"]
}

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Submit),
        prop::option::of("[a-z ]{0,20}").prop_map(Command::Approve),
        arb_comments().prop_map(Command::Reject),
        arb_comments().prop_map(Command::RequestChanges),
        Just(Command::Archive),
    ]
}

/// Version state as the persistence layer would hold it.
struct Version {
    status: VersionStatus,
    iteration: u32,
    log: Vec<ApprovalLogEntry>,
}

impl Version {
    fn apply(&mut self, command: Command) -> Result<(), WorkflowError> {
        let user = UserId::new();
        let action = match command {
            Command::Submit => WorkflowService::submit(self.status, self.iteration, user),
            Command::Approve(c) => WorkflowService::approve(self.status, self.iteration, user, c),
            Command::Reject(c) => WorkflowService::reject(self.status, self.iteration, user, c),
            Command::RequestChanges(c) => {
                WorkflowService::request_changes(self.status, self.iteration, user, c)
            }
            Command::Archive => WorkflowService::archive(self.status, self.iteration, user, None),
        }?;
        self.status = action.new_status();
        self.iteration = action.iteration();
        self.log.push(action.to_log_entry(BudgetVersionId::new()));
        Ok(())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A successful action always moves along a valid edge.
    #[test]
    fn prop_success_implies_valid_edge(
        status in arb_status(),
        iteration in 0u32..50,
        command in arb_command(),
    ) {
        let mut version = Version { status, iteration, log: Vec::new() };
        if version.apply(command).is_ok() {
            prop_assert!(WorkflowService::is_valid_transition(status, version.status));
        }
    }

    /// A failed action leaves status, iteration and log untouched.
    #[test]
    fn prop_failure_leaves_state_untouched(
        status in arb_status(),
        iteration in 0u32..50,
        command in arb_command(),
    ) {
        let mut version = Version { status, iteration, log: Vec::new() };
        if version.apply(command).is_err() {
            prop_assert_eq!(version.status, status);
            prop_assert_eq!(version.iteration, iteration);
            prop_assert!(version.log.is_empty());
        }
    }

    /// The iteration always equals the number of successful submissions,
    /// and every log entry after a submission carries that submission's
    /// iteration.
    #[test]
    fn prop_iteration_counts_submissions(commands in prop::collection::vec(arb_command(), 0..30)) {
        let mut version = Version {
            status: VersionStatus::Draft,
            iteration: 0,
            log: Vec::new(),
        };
        for command in commands {
            let _ = version.apply(command);
        }

        let submissions = version
            .log
            .iter()
            .filter(|e| e.action == ApprovalAction::Submitted)
            .count();
        prop_assert_eq!(version.iteration as usize, submissions);

        let mut current = 0;
        for entry in &version.log {
            if entry.action == ApprovalAction::Submitted {
                current += 1;
            }
            prop_assert_eq!(entry.iteration, current);
        }
    }

    /// Reject and request-changes entries always carry non-blank comments.
    #[test]
    fn prop_review_comments_never_blank(commands in prop::collection::vec(arb_command(), 0..30)) {
        let mut version = Version {
            status: VersionStatus::Draft,
            iteration: 0,
            log: Vec::new(),
        };
        for command in commands {
            let _ = version.apply(command);
        }

        for entry in &version.log {
            if matches!(entry.action, ApprovalAction::Rejected | ApprovalAction::RevisionRequested) {
                prop_assert!(entry.comments.as_deref().is_some_and(|c| !c.trim().is_empty()));
            }
        }
    }

    /// Only Draft and RevisionRequested are editable.
    #[test]
    fn prop_editable_iff_draft_or_revision(status in arb_status()) {
        let editable = WorkflowService::ensure_editable(status).is_ok();
        prop_assert_eq!(
            editable,
            matches!(status, VersionStatus::Draft | VersionStatus::RevisionRequested)
        );
    }
}
