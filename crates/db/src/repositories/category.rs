//! Category repository.
//!
//! Parent changes are checked against a fresh tree snapshot inside the
//! write lock, so the stored hierarchy stays acyclic.

use budgetwise_core::category::{
    Category, CategoryError, CategoryFilter, CategoryTree, CreateCategoryInput, OutlineEntry,
    UpdateCategoryInput,
};
use budgetwise_shared::types::CategoryId;
use tracing::info;

use crate::store::MemoryStore;

/// Category repository.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    store: MemoryStore,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Creates an active category.
    ///
    /// # Errors
    ///
    /// - `CategoryError::EmptyName` if the name is blank
    /// - `CategoryError::ParentNotFound` if the parent does not exist
    pub async fn create(&self, input: CreateCategoryInput) -> Result<Category, CategoryError> {
        let name = non_blank(&input.name)?;
        let mut tables = self.store.write().await;
        let id = CategoryId::new();
        tables.tree()?.validate_parent(id, input.parent_id)?;

        let category = Category {
            id,
            name,
            category_type: input.category_type,
            parent_id: input.parent_id,
            department_id: input.department_id,
            is_active: true,
        };
        tables.categories.insert(id, category.clone());

        info!(
            category_id = %id,
            name = %category.name,
            category_type = %category.category_type,
            "Category created"
        );
        Ok(category)
    }

    /// Edits a category.
    ///
    /// # Errors
    ///
    /// - `CategoryError::NotFound` if the category does not exist
    /// - `CategoryError::EmptyName` if a blank name is given
    /// - `CategoryError::SelfParent` / `InvalidHierarchy` if the new parent
    ///   would create a cycle
    /// - `CategoryError::ParentNotFound` if the new parent does not exist
    pub async fn update(
        &self,
        id: CategoryId,
        input: UpdateCategoryInput,
    ) -> Result<Category, CategoryError> {
        let mut tables = self.store.write().await;
        if !tables.categories.contains_key(&id) {
            return Err(CategoryError::NotFound(id));
        }

        let name = input.name.as_deref().map(non_blank).transpose()?;
        if let Some(parent_id) = input.parent_id {
            tables.tree()?.validate_parent(id, parent_id)?;
        }

        let category = tables
            .categories
            .get_mut(&id)
            .ok_or(CategoryError::NotFound(id))?;
        if let Some(name) = name {
            category.name = name;
        }
        if let Some(parent_id) = input.parent_id {
            category.parent_id = parent_id;
        }
        if let Some(is_active) = input.is_active {
            category.is_active = is_active;
        }

        info!(category_id = %id, "Category updated");
        Ok(category.clone())
    }

    /// Gets a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the category does not exist.
    pub async fn get(&self, id: CategoryId) -> Result<Category, CategoryError> {
        self.store
            .read()
            .await
            .categories
            .get(&id)
            .cloned()
            .ok_or(CategoryError::NotFound(id))
    }

    /// Lists categories passing `filter`, sorted by name.
    pub async fn list(&self, filter: CategoryFilter) -> Vec<Category> {
        self.store.read().await.categories(filter)
    }

    /// Snapshot of the whole hierarchy.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::InvalidHierarchy` if the stored parent
    /// graph is inconsistent.
    pub async fn tree(&self) -> Result<CategoryTree, CategoryError> {
        self.store.read().await.tree()
    }

    /// Pre-order listing of the hierarchy with depth and leaf flags.
    ///
    /// # Errors
    ///
    /// Same as [`Self::tree`].
    pub async fn outline(&self) -> Result<Vec<OutlineEntry>, CategoryError> {
        Ok(self.tree().await?.outline())
    }
}

fn non_blank(name: &str) -> Result<String, CategoryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CategoryError::EmptyName);
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetwise_core::category::CategoryType;

    fn input(name: &str, parent_id: Option<CategoryId>) -> CreateCategoryInput {
        CreateCategoryInput {
            name: name.to_string(),
            category_type: CategoryType::Opex,
            parent_id,
            department_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name_and_unknown_parent() {
        let repo = CategoryRepository::new(MemoryStore::new());

        let err = repo.create(input("   ", None)).await.unwrap_err();
        assert_eq!(err, CategoryError::EmptyName);

        let missing = CategoryId::new();
        let err = repo.create(input("Cloud", Some(missing))).await.unwrap_err();
        assert_eq!(err, CategoryError::ParentNotFound(missing));
    }

    #[tokio::test]
    async fn test_update_rejects_cycle() {
        let repo = CategoryRepository::new(MemoryStore::new());
        let root = repo.create(input("Infrastructure", None)).await.unwrap();
        let child = repo.create(input("Compute", Some(root.id))).await.unwrap();
        let grandchild = repo.create(input("Servers", Some(child.id))).await.unwrap();

        let err = repo
            .update(
                root.id,
                UpdateCategoryInput {
                    parent_id: Some(Some(grandchild.id)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CategoryError::InvalidHierarchy { .. }));

        let err = repo
            .update(
                child.id,
                UpdateCategoryInput {
                    parent_id: Some(Some(child.id)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, CategoryError::SelfParent(child.id));

        // Stored hierarchy is unchanged.
        assert_eq!(repo.get(root.id).await.unwrap().parent_id, None);
    }

    #[tokio::test]
    async fn test_update_moves_to_root_and_deactivates() {
        let repo = CategoryRepository::new(MemoryStore::new());
        let root = repo.create(input("Software", None)).await.unwrap();
        let child = repo.create(input("  Licences ", Some(root.id))).await.unwrap();
        assert_eq!(child.name, "Licences");
        assert!(!repo.tree().await.unwrap().is_leaf(root.id));

        let moved = repo
            .update(
                child.id,
                UpdateCategoryInput {
                    parent_id: Some(None),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.parent_id, None);
        assert!(!moved.is_active);

        let outline = repo.outline().await.unwrap();
        assert_eq!(outline.len(), 2);
        assert!(outline.iter().all(|e| e.depth == 0 && e.is_leaf));

        let active = repo
            .list(CategoryFilter {
                is_active: Some(true),
                department_id: None,
            })
            .await;
        assert_eq!(active.len(), 1);
    }
}
