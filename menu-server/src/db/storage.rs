//! redb-backed document store
//!
//! Every catalog entity is stored as a JSON document keyed by its snowflake id.
//! Order tables live in [`crate::orders::storage`] and share the same
//! [`Database`] handle.
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `categories` | `id` | `Category` | Menu sections |
//! | `dishes` | `id` | `Dish` | Menu entries |
//! | `featured_blocks` | `id` | `FeaturedBlock` | Promotions above the menu |
//! | `settings` | `key` | JSON | Singletons (dish of the day) |

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Document table keyed by snowflake id
pub type DocTable = TableDefinition<'static, i64, &'static [u8]>;

pub const CATEGORIES_TABLE: DocTable = TableDefinition::new("categories");

pub const DISHES_TABLE: DocTable = TableDefinition::new("dishes");

pub const FEATURED_BLOCKS_TABLE: DocTable = TableDefinition::new("featured_blocks");

/// Singleton documents: key = setting name, value = JSON
const SETTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for shared::error::AppError {
    fn from(err: StorageError) -> Self {
        shared::error::AppError::database(err.to_string())
    }
}

/// Catalog document store
#[derive(Clone)]
pub struct Storage {
    db: Arc<Database>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").field("db", &"<redb::Database>").finish()
    }
}

impl Storage {
    /// Open or create the database file
    ///
    /// redb commits with `Durability::Immediate`; a returned commit is on disk.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests and throwaway instances)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CATEGORIES_TABLE)?;
            let _ = write_txn.open_table(DISHES_TABLE)?;
            let _ = write_txn.open_table(FEATURED_BLOCKS_TABLE)?;
            let _ = write_txn.open_table(SETTINGS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Shared handle for modules that own their own tables
    pub fn database(&self) -> Arc<Database> {
        self.db.clone()
    }

    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Documents ==========

    /// Read every document of a table (key order = id order)
    pub fn list<T: DeserializeOwned>(&self, table: DocTable) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;

        let mut docs = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            docs.push(serde_json::from_slice(value.value())?);
        }
        Ok(docs)
    }

    /// Same as [`Storage::list`] but inside an open write transaction
    pub fn list_in<T: DeserializeOwned>(
        txn: &WriteTransaction,
        table: DocTable,
    ) -> StorageResult<Vec<T>> {
        let table = txn.open_table(table)?;

        let mut docs = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            docs.push(serde_json::from_slice(value.value())?);
        }
        Ok(docs)
    }

    pub fn get<T: DeserializeOwned>(&self, table: DocTable, id: i64) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;
        let doc = match table.get(id)? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };
        Ok(doc)
    }

    pub fn get_in<T: DeserializeOwned>(
        txn: &WriteTransaction,
        table: DocTable,
        id: i64,
    ) -> StorageResult<Option<T>> {
        let table = txn.open_table(table)?;
        let doc = match table.get(id)? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };
        Ok(doc)
    }

    /// Insert or replace a document in its own transaction
    pub fn put<T: Serialize>(&self, table: DocTable, id: i64, doc: &T) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        Self::put_in(&txn, table, id, doc)?;
        txn.commit()?;
        Ok(())
    }

    pub fn put_in<T: Serialize>(
        txn: &WriteTransaction,
        table: DocTable,
        id: i64,
        doc: &T,
    ) -> StorageResult<()> {
        let bytes = serde_json::to_vec(doc)?;
        let mut table = txn.open_table(table)?;
        table.insert(id, bytes.as_slice())?;
        Ok(())
    }

    /// Delete a document. Returns whether it existed.
    pub fn remove(&self, table: DocTable, id: i64) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut table = txn.open_table(table)?;
            table.remove(id)?.is_some()
        };
        txn.commit()?;
        Ok(existed)
    }

    // ========== Settings ==========

    pub fn get_setting<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SETTINGS_TABLE)?;
        let value = match table.get(key)? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };
        Ok(value)
    }

    /// Read-modify-write a setting inside one transaction
    pub fn update_setting<T, F>(&self, key: &str, apply: F) -> StorageResult<T>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(T) -> T,
    {
        let txn = self.db.begin_write()?;
        let mut table = txn.open_table(SETTINGS_TABLE)?;
        let current: T = match table.get(key)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => T::default(),
        };
        let next = apply(current);
        let bytes = serde_json::to_vec(&next)?;
        table.insert(key, bytes.as_slice())?;
        drop(table);
        txn.commit()?;
        Ok(next)
    }

    // ========== Stats ==========

    pub fn get_stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;

        let categories = read_txn.open_table(CATEGORIES_TABLE)?;
        let dishes = read_txn.open_table(DISHES_TABLE)?;
        let blocks = read_txn.open_table(FEATURED_BLOCKS_TABLE)?;

        Ok(StorageStats {
            category_count: categories.len()?,
            dish_count: dishes.len()?,
            featured_block_count: blocks.len()?,
        })
    }
}

/// Storage statistics
#[derive(Debug, Clone, Serialize)]
pub struct StorageStats {
    pub category_count: u64,
    pub dish_count: u64,
    pub featured_block_count: u64,
}
