//! Category data types.

use budgetwise_shared::types::{CategoryId, DepartmentId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expenditure classification of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryType {
    /// Operating expenditure.
    Opex,
    /// Capital expenditure.
    Capex,
}

impl CategoryType {
    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Opex => "OPEX",
            Self::Capex => "CAPEX",
        }
    }

    /// Parses a type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "OPEX" => Some(Self::Opex),
            "CAPEX" => Some(Self::Capex),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expense/revenue category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// OPEX or CAPEX.
    pub category_type: CategoryType,
    /// Parent category, `None` for roots.
    pub parent_id: Option<CategoryId>,
    /// Owning department, if any.
    pub department_id: Option<DepartmentId>,
    /// Inactive categories never make their parent a non-leaf.
    pub is_active: bool,
}

/// Filter accepted by the category source.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CategoryFilter {
    /// Only categories with this active flag.
    pub is_active: Option<bool>,
    /// Only categories of this department.
    pub department_id: Option<DepartmentId>,
}

impl CategoryFilter {
    /// Returns true if the category passes the filter.
    #[must_use]
    pub fn matches(&self, category: &Category) -> bool {
        self.is_active.is_none_or(|active| category.is_active == active)
            && self
                .department_id
                .is_none_or(|dept| category.department_id == Some(dept))
    }
}

/// Input for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryInput {
    /// Display name.
    pub name: String,
    /// OPEX or CAPEX.
    pub category_type: CategoryType,
    /// Parent category.
    pub parent_id: Option<CategoryId>,
    /// Owning department.
    pub department_id: Option<DepartmentId>,
}

/// Input for editing a category. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategoryInput {
    /// New name.
    pub name: Option<String>,
    /// New parent; `Some(None)` moves the category to root level.
    #[serde(default, with = "double_option")]
    pub parent_id: Option<Option<CategoryId>>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// One row of a pre-order listing of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    /// Category ID.
    pub category_id: CategoryId,
    /// Display name.
    pub name: String,
    /// OPEX or CAPEX.
    pub category_type: CategoryType,
    /// Resolved parent (absent parents resolve to `None`).
    pub parent_id: Option<CategoryId>,
    /// Distance from the root, roots are 0.
    pub depth: usize,
    /// Whether the category may hold plan amounts.
    pub is_leaf: bool,
}

/// Distinguishes an absent field from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
