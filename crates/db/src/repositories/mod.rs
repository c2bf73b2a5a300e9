//! Repository abstractions for data access.
//!
//! Repositories orchestrate the pure services of `budgetwise-core` over
//! the in-memory store, hiding the table layout from the rest of the
//! application.

pub mod category;
pub mod forecast;
pub mod plan_detail;
pub mod variance;
pub mod version;
pub mod workflow;

pub use category::CategoryRepository;
pub use forecast::ForecastRepository;
pub use plan_detail::{PlanDetailRepository, RollUpRow};
pub use variance::VarianceRepository;
pub use version::VersionRepository;
pub use workflow::{TransitionInput, WorkflowRepository};
