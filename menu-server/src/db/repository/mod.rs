//! Repository Module
//!
//! CRUD operations for the catalog documents stored in redb.
//! Ordering rules shared by every positioned entity live here:
//! listing by `(sort_order, id)`, appending at `max + 1`, and pairwise
//! swaps with the neighbouring entry.

pub mod category;
pub mod daily_special;
pub mod dish;
pub mod featured_block;

// Re-exports
pub use category::CategoryRepository;
pub use daily_special::DailySpecialRepository;
pub use dish::DishRepository;
pub use featured_block::FeaturedBlockRepository;

use shared::error::{AppError, ErrorCode};
use shared::models::{Category, Dish, FeaturedBlock};
use shared::types::MoveDirection;
use thiserror::Error;

use crate::db::StorageError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Category {0} not found")]
    CategoryNotFound(i64),

    #[error("Dish {0} not found")]
    DishNotFound(i64),

    #[error("Featured block {0} not found")]
    FeaturedBlockNotFound(i64),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        let message = err.to_string();
        match err {
            RepoError::CategoryNotFound(id) => {
                AppError::with_message(ErrorCode::CategoryNotFound, message).with_detail("id", id)
            }
            RepoError::DishNotFound(id) => {
                AppError::with_message(ErrorCode::DishNotFound, message).with_detail("id", id)
            }
            RepoError::FeaturedBlockNotFound(id) => {
                AppError::with_message(ErrorCode::FeaturedBlockNotFound, message)
                    .with_detail("id", id)
            }
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Storage(e) => e.into(),
        }
    }
}

/// Entity with a display position
pub trait Positioned {
    fn id(&self) -> i64;
    fn sort_order(&self) -> i32;
    fn set_sort_order(&mut self, sort_order: i32);
}

macro_rules! impl_positioned {
    ($($ty:ty),*) => {
        $(
            impl Positioned for $ty {
                fn id(&self) -> i64 {
                    self.id
                }
                fn sort_order(&self) -> i32 {
                    self.sort_order
                }
                fn set_sort_order(&mut self, sort_order: i32) {
                    self.sort_order = sort_order;
                }
            }
        )*
    };
}

impl_positioned!(Category, Dish, FeaturedBlock);

/// Sort by position, ties broken by id (= creation order)
pub fn sort_by_position<T: Positioned>(items: &mut [T]) {
    items.sort_by_key(|item| (item.sort_order(), item.id()));
}

/// Position for a new entry appended at the end: `max + 1`, or 1 when empty
pub fn next_position<'a, T, I>(items: I) -> i32
where
    T: Positioned + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .map(Positioned::sort_order)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Swap the positions of `id` and its neighbour in `sorted`.
///
/// `sorted` must already be ordered with [`sort_by_position`]. Returns both
/// entries with their new positions, or `None` when `id` is absent or already
/// first/last in the requested direction.
pub fn swap_with_neighbour<T: Positioned + Clone>(
    sorted: &[T],
    id: i64,
    direction: MoveDirection,
) -> Option<(T, T)> {
    let idx = sorted.iter().position(|item| item.id() == id)?;
    let target = match direction {
        MoveDirection::Up => idx.checked_sub(1)?,
        MoveDirection::Down => idx + 1,
    };
    let other = sorted.get(target)?;

    let mut moved = sorted[idx].clone();
    let mut other = other.clone();
    let moved_order = moved.sort_order();
    moved.set_sort_order(other.sort_order());
    other.set_sort_order(moved_order);
    Some((moved, other))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: i64, sort_order: i32) -> Category {
        Category {
            id,
            name: format!("c{id}"),
            sort_order,
            is_active: true,
        }
    }

    #[test]
    fn test_sort_ties_fall_back_to_id() {
        let mut cats = vec![cat(3, 2), cat(2, 1), cat(1, 2)];
        sort_by_position(&mut cats);
        let ids: Vec<_> = cats.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_next_position() {
        assert_eq!(next_position::<Category, _>(&[]), 1);
        assert_eq!(next_position(&[cat(1, 4), cat(2, 9)]), 10);
    }

    #[test]
    fn test_swap_with_neighbour() {
        let cats = vec![cat(1, 1), cat(2, 2), cat(3, 3)];

        let (moved, other) = swap_with_neighbour(&cats, 2, MoveDirection::Up).unwrap();
        assert_eq!((moved.id, moved.sort_order), (2, 1));
        assert_eq!((other.id, other.sort_order), (1, 2));

        let (moved, other) = swap_with_neighbour(&cats, 2, MoveDirection::Down).unwrap();
        assert_eq!((moved.id, moved.sort_order), (2, 3));
        assert_eq!((other.id, other.sort_order), (3, 2));
    }

    #[test]
    fn test_swap_at_edges_is_noop() {
        let cats = vec![cat(1, 1), cat(2, 2)];
        assert!(swap_with_neighbour(&cats, 1, MoveDirection::Up).is_none());
        assert!(swap_with_neighbour(&cats, 2, MoveDirection::Down).is_none());
        assert!(swap_with_neighbour(&cats, 99, MoveDirection::Up).is_none());
    }

    #[test]
    fn test_repo_error_codes() {
        let err: AppError = RepoError::DishNotFound(5).into();
        assert_eq!(err.code, ErrorCode::DishNotFound);
        assert_eq!(err.message, "Dish 5 not found");

        let err: AppError = RepoError::Validation("bad".into()).into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
