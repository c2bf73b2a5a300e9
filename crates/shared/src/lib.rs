//! Shared types, errors, and configuration for Budgetwise.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Calendar months and fixed 12-month amount arrays
//! - Currency-aware presentation rounding
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, PlanningConfig, ServerConfig};
pub use error::{AppError, AppResult};
