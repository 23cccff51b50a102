//! redb storage for orders and their items
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` | Order documents (open and closed) |
//! | `order_items` | `(order_id, item_id)` | `OrderItem` | Items, clustered by order |
//! | `item_index` | `item_id` | `order_id` | Item → owning order lookup |
//! | `open_orders` | `table_code` | `order_id` | At most one open order per table |
//!
//! Items are keyed by `(order_id, item_id)` so reading one order's items is a
//! range scan that never touches other orders. Snowflake item ids make the
//! range order equal to creation order.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use shared::order::{Order, OrderItem};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::db::StorageResult;

const ORDERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("orders");

const ORDER_ITEMS_TABLE: TableDefinition<(i64, i64), &[u8]> = TableDefinition::new("order_items");

const ITEM_INDEX_TABLE: TableDefinition<i64, i64> = TableDefinition::new("item_index");

const OPEN_ORDERS_TABLE: TableDefinition<&str, i64> = TableDefinition::new("open_orders");

/// Order storage backed by redb
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
    /// Item documents deserialized since startup
    items_read: Arc<AtomicU64>,
}

impl OrderStorage {
    /// Create the order tables on a shared database handle
    pub fn new(db: Arc<Database>) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDER_ITEMS_TABLE)?;
            let _ = write_txn.open_table(ITEM_INDEX_TABLE)?;
            let _ = write_txn.open_table(OPEN_ORDERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db,
            items_read: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::new(Arc::new(db))
    }

    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Number of item documents read so far
    pub fn items_read(&self) -> u64 {
        self.items_read.load(Ordering::Relaxed)
    }

    fn decode_item(&self, bytes: &[u8]) -> StorageResult<OrderItem> {
        self.items_read.fetch_add(1, Ordering::Relaxed);
        Ok(serde_json::from_slice(bytes)?)
    }

    // ========== Orders ==========

    pub fn get_order(&self, order_id: i64) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let order = match table.get(order_id)? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };
        Ok(order)
    }

    pub fn get_order_in(&self, txn: &WriteTransaction, order_id: i64) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        let order = match table.get(order_id)? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };
        Ok(order)
    }

    pub fn store_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let bytes = serde_json::to_vec(order)?;
        let mut table = txn.open_table(ORDERS_TABLE)?;
        table.insert(order.id, bytes.as_slice())?;
        Ok(())
    }

    /// Every order in `open` state, oldest first
    pub fn list_open_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if order.is_open() {
                orders.push(order);
            }
        }
        orders.sort_by_key(|o| (o.created_at, o.id));
        Ok(orders)
    }

    /// Open orders carrying `table_code`, scanned inside a write transaction
    pub fn open_orders_for_table_in(
        &self,
        txn: &WriteTransaction,
        table_code: &str,
    ) -> StorageResult<Vec<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if order.is_open() && order.table_code == table_code {
                orders.push(order);
            }
        }
        Ok(orders)
    }

    // ========== Open-order index ==========

    pub fn open_order_id(&self, table_code: &str) -> StorageResult<Option<i64>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(OPEN_ORDERS_TABLE)?;
        Ok(table.get(table_code)?.map(|g| g.value()))
    }

    pub fn open_order_id_in(
        &self,
        txn: &WriteTransaction,
        table_code: &str,
    ) -> StorageResult<Option<i64>> {
        let table = txn.open_table(OPEN_ORDERS_TABLE)?;
        Ok(table.get(table_code)?.map(|g| g.value()))
    }

    pub fn set_open_order(
        &self,
        txn: &WriteTransaction,
        table_code: &str,
        order_id: i64,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(OPEN_ORDERS_TABLE)?;
        table.insert(table_code, order_id)?;
        Ok(())
    }

    /// Drop the index entry if it still points at `order_id`
    pub fn clear_open_order(
        &self,
        txn: &WriteTransaction,
        table_code: &str,
        order_id: i64,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(OPEN_ORDERS_TABLE)?;
        let current = table.get(table_code)?.map(|g| g.value());
        if current == Some(order_id) {
            table.remove(table_code)?;
        }
        Ok(())
    }

    /// Rebuild the open-order index from the order documents.
    ///
    /// When several open orders share a table code the most recently created
    /// one is indexed. Returns the number of indexed tables.
    pub fn rebuild_open_index(&self) -> StorageResult<usize> {
        let txn = self.db.begin_write()?;

        let mut latest: HashMap<String, (i64, i64)> = HashMap::new();
        {
            let orders = txn.open_table(ORDERS_TABLE)?;
            for result in orders.iter()? {
                let (_key, value) = result?;
                let order: Order = serde_json::from_slice(value.value())?;
                if !order.is_open() {
                    continue;
                }
                let candidate = (order.created_at, order.id);
                latest
                    .entry(order.table_code)
                    .and_modify(|cur| *cur = (*cur).max(candidate))
                    .or_insert(candidate);
            }
        }

        txn.delete_table(OPEN_ORDERS_TABLE)?;
        {
            let mut index = txn.open_table(OPEN_ORDERS_TABLE)?;
            for (code, (_, order_id)) in &latest {
                index.insert(code.as_str(), *order_id)?;
            }
        }
        txn.commit()?;

        Ok(latest.len())
    }

    // ========== Items ==========

    /// Items of one order in creation order (range read on the order's keys)
    pub fn get_items_for_order(&self, order_id: i64) -> StorageResult<Vec<OrderItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDER_ITEMS_TABLE)?;

        let mut items = Vec::new();
        for result in table.range((order_id, i64::MIN)..=(order_id, i64::MAX))? {
            let (_key, value) = result?;
            items.push(self.decode_item(value.value())?);
        }
        Ok(items)
    }

    pub fn get_items_for_order_in(
        &self,
        txn: &WriteTransaction,
        order_id: i64,
    ) -> StorageResult<Vec<OrderItem>> {
        let table = txn.open_table(ORDER_ITEMS_TABLE)?;

        let mut items = Vec::new();
        for result in table.range((order_id, i64::MIN)..=(order_id, i64::MAX))? {
            let (_key, value) = result?;
            items.push(self.decode_item(value.value())?);
        }
        Ok(items)
    }

    pub fn get_item(&self, item_id: i64) -> StorageResult<Option<OrderItem>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(ITEM_INDEX_TABLE)?;
        let Some(order_id) = index.get(item_id)?.map(|g| g.value()) else {
            return Ok(None);
        };

        let table = read_txn.open_table(ORDER_ITEMS_TABLE)?;
        let item = match table.get((order_id, item_id))? {
            Some(value) => Some(self.decode_item(value.value())?),
            None => None,
        };
        Ok(item)
    }

    pub fn get_item_in(
        &self,
        txn: &WriteTransaction,
        item_id: i64,
    ) -> StorageResult<Option<OrderItem>> {
        let order_id = {
            let index = txn.open_table(ITEM_INDEX_TABLE)?;
            index.get(item_id)?.map(|g| g.value())
        };
        let Some(order_id) = order_id else {
            return Ok(None);
        };

        let table = txn.open_table(ORDER_ITEMS_TABLE)?;
        let item = match table.get((order_id, item_id))? {
            Some(value) => Some(self.decode_item(value.value())?),
            None => None,
        };
        Ok(item)
    }

    /// Insert or replace an item and its index entry
    pub fn store_item(&self, txn: &WriteTransaction, item: &OrderItem) -> StorageResult<()> {
        let bytes = serde_json::to_vec(item)?;
        {
            let mut table = txn.open_table(ORDER_ITEMS_TABLE)?;
            table.insert((item.order_id, item.id), bytes.as_slice())?;
        }
        let mut index = txn.open_table(ITEM_INDEX_TABLE)?;
        index.insert(item.id, item.order_id)?;
        Ok(())
    }

    pub fn remove_item(&self, txn: &WriteTransaction, item: &OrderItem) -> StorageResult<()> {
        {
            let mut table = txn.open_table(ORDER_ITEMS_TABLE)?;
            table.remove((item.order_id, item.id))?;
        }
        let mut index = txn.open_table(ITEM_INDEX_TABLE)?;
        index.remove(item.id)?;
        Ok(())
    }

    // ========== Stats ==========

    pub fn get_stats(&self) -> StorageResult<OrderStorageStats> {
        let read_txn = self.db.begin_read()?;

        let orders = read_txn.open_table(ORDERS_TABLE)?;
        let items = read_txn.open_table(ORDER_ITEMS_TABLE)?;
        let open = read_txn.open_table(OPEN_ORDERS_TABLE)?;

        Ok(OrderStorageStats {
            order_count: orders.len()?,
            item_count: items.len()?,
            open_table_count: open.len()?,
        })
    }
}

impl std::fmt::Debug for OrderStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStorage")
            .field("items_read", &self.items_read())
            .finish()
    }
}

/// Storage statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct OrderStorageStats {
    pub order_count: u64,
    pub item_count: u64,
    pub open_table_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::order::{ItemOrigin, ItemStatus, OrderState};

    fn order(id: i64, code: &str, created_at: i64) -> Order {
        Order {
            id,
            table_code: code.to_string(),
            table_label: None,
            state: OrderState::Open,
            created_at,
            closed_at: None,
            total: Decimal::ZERO,
            call_waiter: false,
            request_bill: false,
        }
    }

    fn item(id: i64, order_id: i64) -> OrderItem {
        OrderItem {
            id,
            order_id,
            table_code: "T1".to_string(),
            table_label: None,
            origin: ItemOrigin::Manual,
            dish_id: None,
            name: format!("item {id}"),
            note: None,
            base_price: Decimal::from(100),
            extras: vec![],
            unit_price: Decimal::from(100),
            quantity: 1,
            status: ItemStatus::Pending,
            created_at: id,
            voided: None,
        }
    }

    #[test]
    fn test_items_range_is_scoped_to_order() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        for (id, order_id) in [(1, 10), (2, 20), (3, 10), (4, 30), (5, 10)] {
            storage.store_item(&txn, &item(id, order_id)).unwrap();
        }
        txn.commit().unwrap();

        let before = storage.items_read();
        let items = storage.get_items_for_order(10).unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
        assert_eq!(storage.items_read() - before, 3);
    }

    #[test]
    fn test_item_lookup_and_removal() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let it = item(7, 70);
        let txn = storage.begin_write().unwrap();
        storage.store_item(&txn, &it).unwrap();
        txn.commit().unwrap();

        assert_eq!(storage.get_item(7).unwrap().unwrap().order_id, 70);

        let txn = storage.begin_write().unwrap();
        storage.remove_item(&txn, &it).unwrap();
        txn.commit().unwrap();
        assert!(storage.get_item(7).unwrap().is_none());
        assert!(storage.get_items_for_order(70).unwrap().is_empty());
    }

    #[test]
    fn test_rebuild_index_prefers_latest_open_order() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage.store_order(&txn, &order(1, "T1", 100)).unwrap();
        storage.store_order(&txn, &order(2, "T1", 200)).unwrap();
        let mut closed = order(3, "T2", 300);
        closed.state = OrderState::Closed;
        storage.store_order(&txn, &closed).unwrap();
        storage.store_order(&txn, &order(4, "T3", 50)).unwrap();
        // Stale entry that must disappear
        storage.set_open_order(&txn, "T2", 3).unwrap();
        txn.commit().unwrap();

        assert_eq!(storage.rebuild_open_index().unwrap(), 2);
        assert_eq!(storage.open_order_id("T1").unwrap(), Some(2));
        assert_eq!(storage.open_order_id("T2").unwrap(), None);
        assert_eq!(storage.open_order_id("T3").unwrap(), Some(4));
    }

    #[test]
    fn test_list_open_orders_oldest_first() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage.store_order(&txn, &order(5, "B", 500)).unwrap();
        storage.store_order(&txn, &order(6, "A", 100)).unwrap();
        let mut closed = order(7, "C", 50);
        closed.state = OrderState::Closed;
        storage.store_order(&txn, &closed).unwrap();
        txn.commit().unwrap();

        let ids: Vec<_> = storage
            .list_open_orders()
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![6, 5]);
        assert_eq!(storage.get_stats().unwrap().order_count, 3);
    }

    #[test]
    fn test_clear_open_order_only_matching() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage.set_open_order(&txn, "T1", 9).unwrap();
        storage.clear_open_order(&txn, "T1", 8).unwrap();
        txn.commit().unwrap();
        assert_eq!(storage.open_order_id("T1").unwrap(), Some(9));
    }
}
