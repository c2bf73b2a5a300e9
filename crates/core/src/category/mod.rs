//! Category hierarchy: nodes, leaf detection and monthly roll-ups.

pub mod error;
pub mod tree;
pub mod types;

#[cfg(test)]
mod tree_props;

pub use error::CategoryError;
pub use tree::CategoryTree;
pub use types::{
    Category, CategoryFilter, CategoryType, CreateCategoryInput, OutlineEntry, UpdateCategoryInput,
};
