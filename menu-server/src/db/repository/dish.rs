//! Dish Repository
//!
//! Positions are scoped to the dish's category. Changing category appends
//! the dish at the end of the target category and leaves every other dish
//! untouched.

use super::{RepoError, RepoResult, next_position, sort_by_position, swap_with_neighbour};
use crate::db::StorageError;
use crate::db::storage::{DISHES_TABLE, Storage};
use shared::models::{Dish, DishCreate, DishUpdate};
use shared::types::MoveDirection;
use shared::util::snowflake_id;

#[derive(Debug, Clone)]
pub struct DishRepository {
    storage: Storage,
}

impl DishRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// All dishes ordered by category id (uncategorized first), then position
    pub fn find_all(&self) -> RepoResult<Vec<Dish>> {
        let mut dishes: Vec<Dish> = self.storage.list(DISHES_TABLE)?;
        dishes.sort_by_key(|d| (d.category_id, d.sort_order, d.id));
        Ok(dishes)
    }

    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<Dish>> {
        Ok(self.storage.get(DISHES_TABLE, id)?)
    }

    /// Dishes of one category (`None` = "General") in display order
    pub fn find_by_category(&self, category_id: Option<i64>) -> RepoResult<Vec<Dish>> {
        let mut dishes: Vec<Dish> = self
            .storage
            .list::<Dish>(DISHES_TABLE)?
            .into_iter()
            .filter(|d| d.category_id == category_id)
            .collect();
        sort_by_position(&mut dishes);
        Ok(dishes)
    }

    pub fn create(&self, data: DishCreate) -> RepoResult<Dish> {
        let txn = self.storage.begin_write()?;

        let sort_order = match data.sort_order {
            Some(order) => order,
            None => {
                let all: Vec<Dish> = Storage::list_in(&txn, DISHES_TABLE)?;
                next_position(all.iter().filter(|d| d.category_id == data.category_id))
            }
        };

        let image_url = data.image_url.filter(|url| !url.trim().is_empty());
        let dish = Dish {
            id: snowflake_id(),
            name: data.name.trim().to_string(),
            description: data.description.unwrap_or_default(),
            price: data.price,
            category_id: data.category_id,
            has_image: data.has_image.unwrap_or(image_url.is_some()),
            image_url,
            is_active: data.is_active.unwrap_or(true),
            sort_order,
        };
        Storage::put_in(&txn, DISHES_TABLE, dish.id, &dish)?;
        txn.commit().map_err(StorageError::from)?;

        Ok(dish)
    }

    /// Partial update
    ///
    /// A category change re-appends the dish at `max + 1` of the target
    /// category; an explicit `sort_order` in the same patch is ignored.
    pub fn update(&self, id: i64, data: DishUpdate) -> RepoResult<Dish> {
        let txn = self.storage.begin_write()?;
        let mut dish: Dish =
            Storage::get_in(&txn, DISHES_TABLE, id)?.ok_or(RepoError::DishNotFound(id))?;

        if let Some(name) = data.name {
            dish.name = name.trim().to_string();
        }
        if let Some(description) = data.description {
            dish.description = description;
        }
        if let Some(price) = data.price {
            dish.price = price;
        }
        if let Some(has_image) = data.has_image {
            dish.has_image = has_image;
        }
        if let Some(url) = data.image_url {
            dish.image_url = if url.trim().is_empty() { None } else { Some(url) };
        }
        if let Some(is_active) = data.is_active {
            dish.is_active = is_active;
        }

        match data.category_id {
            Some(category_id) if category_id != dish.category_id => {
                let all: Vec<Dish> = Storage::list_in(&txn, DISHES_TABLE)?;
                dish.sort_order = next_position(
                    all.iter()
                        .filter(|d| d.id != id && d.category_id == category_id),
                );
                tracing::debug!(
                    id,
                    from = ?dish.category_id,
                    to = ?category_id,
                    sort_order = dish.sort_order,
                    "Dish moved to another category"
                );
                dish.category_id = category_id;
            }
            _ => {
                if let Some(sort_order) = data.sort_order {
                    dish.sort_order = sort_order;
                }
            }
        }

        Storage::put_in(&txn, DISHES_TABLE, id, &dish)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(dish)
    }

    pub fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.storage.remove(DISHES_TABLE, id)?)
    }

    /// Swap position with the neighbour inside the same category.
    /// Returns the category's dishes in their new order.
    pub fn move_dish(&self, id: i64, direction: MoveDirection) -> RepoResult<Vec<Dish>> {
        let txn = self.storage.begin_write()?;
        let all: Vec<Dish> = Storage::list_in(&txn, DISHES_TABLE)?;
        let category_id = all
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.category_id)
            .ok_or(RepoError::DishNotFound(id))?;

        let mut siblings: Vec<Dish> = all
            .into_iter()
            .filter(|d| d.category_id == category_id)
            .collect();
        sort_by_position(&mut siblings);

        if let Some((moved, other)) = swap_with_neighbour(&siblings, id, direction) {
            Storage::put_in(&txn, DISHES_TABLE, moved.id, &moved)?;
            Storage::put_in(&txn, DISHES_TABLE, other.id, &other)?;
            txn.commit().map_err(StorageError::from)?;
        } else {
            txn.abort().map_err(StorageError::from)?;
        }

        self.find_by_category(category_id)
    }
}
