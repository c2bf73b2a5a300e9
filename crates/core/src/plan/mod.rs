//! Budget versions and their plan details.
//!
//! Validation of plan writes, edit command logs and OPEX/CAPEX totals.
//! Storage lives in `budgetwise-db`; everything here is pure.

pub mod error;
pub mod service;
pub mod types;

pub use error::PlanError;
pub use service::PlanService;
pub use types::{
    BudgetVersion, BulkFailure, BulkResult, CalculationMethod, CreateVersionInput, EditCommand,
    EditLog, PlanDetail, PlanTotals, UpsertPlanDetailInput, ValidatedEdit, VersionTotals,
};
