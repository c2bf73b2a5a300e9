//! Budget versus actual variance analysis.
//!
//! Execution and variance percentages per category and month, with
//! threshold-based alerts.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::VarianceError;
pub use service::VarianceEngine;
pub use types::{
    AlertLevel, AlertThresholds, CategoryVariance, MonthlyVariance, Percent, VarianceFigures,
    VarianceReport,
};
