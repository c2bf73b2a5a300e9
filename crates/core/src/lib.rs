//! Core planning and approval logic for Budgetwise.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `category` - Category hierarchy, leaf sets and roll-ups
//! - `plan` - Budget versions, plan detail rules and totals
//! - `forecast` - Baselines and the three forecast methods
//! - `variance` - Planned versus actual, execution percent and alerts
//! - `workflow` - Version approval state machine

pub mod category;
pub mod forecast;
pub mod plan;
pub mod variance;
pub mod workflow;
