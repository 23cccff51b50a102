//! Featured Block Repository

use super::{RepoError, RepoResult, next_position, sort_by_position, swap_with_neighbour};
use crate::db::StorageError;
use crate::db::storage::{FEATURED_BLOCKS_TABLE, Storage};
use shared::models::{FeaturedBlock, FeaturedBlockCreate, FeaturedBlockUpdate};
use shared::types::MoveDirection;
use shared::util::{now_millis, snowflake_id};

#[derive(Debug, Clone)]
pub struct FeaturedBlockRepository {
    storage: Storage,
}

impl FeaturedBlockRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// All blocks in display order
    pub fn find_all(&self) -> RepoResult<Vec<FeaturedBlock>> {
        let mut blocks: Vec<FeaturedBlock> = self.storage.list(FEATURED_BLOCKS_TABLE)?;
        sort_by_position(&mut blocks);
        Ok(blocks)
    }

    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<FeaturedBlock>> {
        Ok(self.storage.get(FEATURED_BLOCKS_TABLE, id)?)
    }

    pub fn create(&self, data: FeaturedBlockCreate) -> RepoResult<FeaturedBlock> {
        let txn = self.storage.begin_write()?;

        let sort_order = match data.sort_order {
            Some(order) => order,
            None => {
                let existing: Vec<FeaturedBlock> = Storage::list_in(&txn, FEATURED_BLOCKS_TABLE)?;
                next_position(&existing)
            }
        };

        let block = FeaturedBlock {
            id: snowflake_id(),
            is_active: data.is_active.unwrap_or(true),
            sort_order,
            kind: data.kind,
            title: data.title.trim().to_string(),
            description: data.description,
            manual_price: data.manual_price,
            image_url: data.image_url.filter(|url| !url.trim().is_empty()),
            dish_id: data.dish_id,
            created_at: Some(now_millis()),
        };
        Storage::put_in(&txn, FEATURED_BLOCKS_TABLE, block.id, &block)?;
        txn.commit().map_err(StorageError::from)?;

        Ok(block)
    }

    pub fn update(&self, id: i64, data: FeaturedBlockUpdate) -> RepoResult<FeaturedBlock> {
        let txn = self.storage.begin_write()?;
        let mut block: FeaturedBlock = Storage::get_in(&txn, FEATURED_BLOCKS_TABLE, id)?
            .ok_or(RepoError::FeaturedBlockNotFound(id))?;

        if let Some(kind) = data.kind {
            block.kind = kind;
        }
        if let Some(title) = data.title {
            block.title = title.trim().to_string();
        }
        if data.description.is_some() {
            block.description = data.description;
        }
        if data.manual_price.is_some() {
            block.manual_price = data.manual_price;
        }
        if let Some(url) = data.image_url {
            block.image_url = if url.trim().is_empty() { None } else { Some(url) };
        }
        if data.dish_id.is_some() {
            block.dish_id = data.dish_id;
        }
        if let Some(is_active) = data.is_active {
            block.is_active = is_active;
        }
        if let Some(sort_order) = data.sort_order {
            block.sort_order = sort_order;
        }

        Storage::put_in(&txn, FEATURED_BLOCKS_TABLE, id, &block)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(block)
    }

    pub fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.storage.remove(FEATURED_BLOCKS_TABLE, id)?)
    }

    /// Swap position with the neighbour; returns all blocks in the new order
    pub fn move_block(&self, id: i64, direction: MoveDirection) -> RepoResult<Vec<FeaturedBlock>> {
        let txn = self.storage.begin_write()?;
        let mut blocks: Vec<FeaturedBlock> = Storage::list_in(&txn, FEATURED_BLOCKS_TABLE)?;
        if !blocks.iter().any(|b| b.id == id) {
            return Err(RepoError::FeaturedBlockNotFound(id));
        }
        sort_by_position(&mut blocks);

        if let Some((moved, other)) = swap_with_neighbour(&blocks, id, direction) {
            Storage::put_in(&txn, FEATURED_BLOCKS_TABLE, moved.id, &moved)?;
            Storage::put_in(&txn, FEATURED_BLOCKS_TABLE, other.id, &other)?;
            txn.commit().map_err(StorageError::from)?;
        } else {
            txn.abort().map_err(StorageError::from)?;
        }

        self.find_all()
    }
}
