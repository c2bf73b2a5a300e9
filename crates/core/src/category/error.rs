//! Category error types.

use budgetwise_shared::AppError;
use budgetwise_shared::types::CategoryId;
use thiserror::Error;

/// Category hierarchy errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    /// The parent graph is cyclic or otherwise inconsistent.
    #[error("Invalid category hierarchy at {category_id}: {reason}")]
    InvalidHierarchy {
        /// A category on the offending path.
        category_id: CategoryId,
        /// What is wrong.
        reason: String,
    },

    /// A category was given itself as parent.
    #[error("Category {0} cannot be its own parent")]
    SelfParent(CategoryId),

    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(CategoryId),

    /// Parent category not found.
    #[error("Parent category not found: {0}")]
    ParentNotFound(CategoryId),

    /// Category name is blank.
    #[error("Category name cannot be empty")]
    EmptyName,
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) | CategoryError::ParentNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            CategoryError::EmptyName => Self::Validation(err.to_string()),
            CategoryError::InvalidHierarchy { .. } | CategoryError::SelfParent(_) => {
                Self::BusinessRule(err.to_string())
            }
        }
    }
}
