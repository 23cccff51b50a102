//! Database Module
//!
//! Embedded redb document store and the catalog repositories on top of it.

pub mod repository;
pub mod storage;

pub use storage::{Storage, StorageError, StorageResult, StorageStats};
