//! Common types used across the application.

pub mod id;
pub mod money;
pub mod month;

pub use id::*;
pub use money::Currency;
pub use month::{Month, MonthlyAmounts};
