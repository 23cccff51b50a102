//! Category Repository

use super::{RepoError, RepoResult, next_position, sort_by_position, swap_with_neighbour};
use crate::db::storage::{CATEGORIES_TABLE, Storage};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::types::MoveDirection;
use shared::util::snowflake_id;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    storage: Storage,
}

impl CategoryRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// All categories ordered by `(sort_order, id)`, hidden ones included
    pub fn find_all(&self) -> RepoResult<Vec<Category>> {
        let mut categories: Vec<Category> = self.storage.list(CATEGORIES_TABLE)?;
        sort_by_position(&mut categories);
        Ok(categories)
    }

    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<Category>> {
        Ok(self.storage.get(CATEGORIES_TABLE, id)?)
    }

    /// Create a category at the end of the list, active
    pub fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let txn = self.storage.begin_write()?;
        let existing: Vec<Category> = Storage::list_in(&txn, CATEGORIES_TABLE)?;

        let category = Category {
            id: snowflake_id(),
            name: data.name.trim().to_string(),
            sort_order: next_position(&existing),
            is_active: true,
        };
        Storage::put_in(&txn, CATEGORIES_TABLE, category.id, &category)?;
        txn.commit().map_err(crate::db::StorageError::from)?;

        Ok(category)
    }

    /// Partial update
    pub fn update(&self, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
        let txn = self.storage.begin_write()?;
        let mut category: Category =
            Storage::get_in(&txn, CATEGORIES_TABLE, id)?.ok_or(RepoError::CategoryNotFound(id))?;

        if let Some(name) = data.name {
            category.name = name.trim().to_string();
        }
        if let Some(sort_order) = data.sort_order {
            category.sort_order = sort_order;
        }
        if let Some(is_active) = data.is_active {
            category.is_active = is_active;
        }

        Storage::put_in(&txn, CATEGORIES_TABLE, id, &category)?;
        txn.commit().map_err(crate::db::StorageError::from)?;
        Ok(category)
    }

    /// Hard delete. Dishes pointing at it fall back to "General" on the menu.
    pub fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.storage.remove(CATEGORIES_TABLE, id)?)
    }

    /// Swap position with the neighbour above/below; returns the reordered list
    pub fn move_category(&self, id: i64, direction: MoveDirection) -> RepoResult<Vec<Category>> {
        let txn = self.storage.begin_write()?;
        let mut categories: Vec<Category> = Storage::list_in(&txn, CATEGORIES_TABLE)?;
        if !categories.iter().any(|c| c.id == id) {
            return Err(RepoError::CategoryNotFound(id));
        }
        sort_by_position(&mut categories);

        if let Some((moved, other)) = swap_with_neighbour(&categories, id, direction) {
            Storage::put_in(&txn, CATEGORIES_TABLE, moved.id, &moved)?;
            Storage::put_in(&txn, CATEGORIES_TABLE, other.id, &other)?;
            txn.commit().map_err(crate::db::StorageError::from)?;
            tracing::debug!(id, other = other.id, ?direction, "Category moved");
        } else {
            txn.abort().map_err(crate::db::StorageError::from)?;
        }

        self.find_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> CategoryRepository {
        CategoryRepository::new(Storage::open_in_memory().unwrap())
    }

    fn create(repo: &CategoryRepository, name: &str) -> Category {
        repo.create(CategoryCreate {
            name: name.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_create_appends_after_max() {
        let repo = repo();
        let first = create(&repo, "Entradas");
        assert_eq!(first.sort_order, 1);

        repo.update(
            first.id,
            CategoryUpdate {
                sort_order: Some(7),
                ..Default::default()
            },
        )
        .unwrap();

        let postres = create(&repo, "Postres");
        assert_eq!(postres.name, "Postres");
        assert!(postres.is_active);
        assert_eq!(postres.sort_order, 8);

        let all = repo.find_all().unwrap();
        assert_eq!(all.last().unwrap().id, postres.id);
    }

    #[test]
    fn test_update_unknown_category() {
        let repo = repo();
        let err = repo.update(42, CategoryUpdate::default()).unwrap_err();
        assert!(matches!(err, RepoError::CategoryNotFound(42)));
    }

    #[test]
    fn test_hide_keeps_category_listed() {
        let repo = repo();
        let cat = create(&repo, "Vinos");
        let updated = repo
            .update(
                cat.id,
                CategoryUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(repo.find_all().unwrap().len(), 1);
    }

    #[test]
    fn test_move_swaps_with_neighbour() {
        let repo = repo();
        let a = create(&repo, "A");
        let b = create(&repo, "B");
        let c = create(&repo, "C");

        let list = repo.move_category(c.id, MoveDirection::Up).unwrap();
        let ids: Vec<_> = list.iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![a.id, c.id, b.id]);

        // Already first: nothing changes
        let list = repo.move_category(a.id, MoveDirection::Up).unwrap();
        let ids: Vec<_> = list.iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![a.id, c.id, b.id]);
    }

    #[test]
    fn test_delete() {
        let repo = repo();
        let cat = create(&repo, "Temporal");
        assert!(repo.delete(cat.id).unwrap());
        assert!(!repo.delete(cat.id).unwrap());
        assert!(repo.find_by_id(cat.id).unwrap().is_none());
    }
}
