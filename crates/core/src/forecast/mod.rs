//! Forecasted category baselines.
//!
//! Planned annual and monthly figures derived from historical actuals
//! using one of three methods: average, growth-adjusted or driver-based.
//!
//! # Modules
//!
//! - `types` - Requests, baselines and calculation results
//! - `error` - Forecast-specific error types
//! - `service` - The calculator
//! - `cache` - In-memory baseline cache

pub mod cache;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use cache::BaselineCache;
pub use error::ForecastError;
pub use service::ForecastCalculator;
pub use types::{
    BaselineSummary, CalculationResult, DriverType, ForecastMethod, ForecastRequest,
    MonthlyActual, MonthlySpread,
};
