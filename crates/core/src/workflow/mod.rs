//! Budget version approval workflow.
//!
//! This module implements the version lifecycle state machine and the
//! audit actions recorded in the append-only approval log.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (VersionStatus, ApprovalAction, WorkflowAction)
//! - `error` - Workflow-specific error types
//! - `service` - State transition logic

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use service::WorkflowService;
pub use types::{ApprovalAction, ApprovalLogEntry, VersionStatus, WorkflowAction};
