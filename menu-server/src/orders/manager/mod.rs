//! OrdersManager - order lifecycle and table signals
//!
//! Every mutation runs inside one redb write transaction and publishes an
//! [`OrderEvent`] after the commit succeeds.
//!
//! # Single active order
//!
//! ```text
//! open_or_get_order(code)
//!     ├─ 1. Begin write transaction (redb serializes writers)
//!     ├─ 2. Look up open_orders[code]
//!     ├─ 3. Fall back to a scan for legacy open orders with that code
//!     ├─ 4. Create the order + index entry if nothing is open
//!     ├─ 5. Commit
//!     └─ 6. Broadcast ORDER_OPENED when created
//! ```
//!
//! Because step 2-4 happen under the write lock, concurrent callers for the
//! same code always end up with the same order.

mod error;
pub use error::*;

use super::money::{
    MAX_PRICE, note_with_extras, round_money, sanitize_extras, sanitize_price, sanitize_quantity,
};
use super::storage::OrderStorage;
use crate::db::repository::DishRepository;
use redb::WriteTransaction;
use rust_decimal::Decimal;
use shared::order::{
    ANNUL_MARKER, AddItemInput, ItemOrigin, ItemStatus, Order, OrderEvent, OrderEventType,
    OrderItem, OrderItemUpdate, OrderState, OrderWithItems, TableView, VoidRecord,
    sum_line_totals,
};
use shared::util::{normalize_table_code, now_millis, snowflake_id};
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Separator between the staff note and the extras summary
const EXTRAS_SEPARATOR: &str = " | Extras: ";

pub struct OrdersManager {
    storage: OrderStorage,
    event_tx: broadcast::Sender<OrderEvent>,
    /// Catalog lookup for dish snapshots on catalog items
    dishes: Option<DishRepository>,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("storage", &self.storage)
            .field("event_tx", &"<broadcast::Sender>")
            .field("catalog", &self.dishes.is_some())
            .finish()
    }
}

impl OrdersManager {
    /// Create a manager and rebuild the open-order index from stored orders
    pub fn new(storage: OrderStorage) -> ManagerResult<Self> {
        let indexed = storage.rebuild_open_index()?;
        tracing::info!(open_tables = indexed, "OrdersManager started");

        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            storage,
            event_tx,
            dishes: None,
        })
    }

    /// Enable name/price snapshots from the catalog for catalog items
    pub fn with_catalog(mut self, dishes: DishRepository) -> Self {
        self.dishes = Some(dishes);
        self
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    fn broadcast(&self, events: Vec<OrderEvent>) {
        for event in events {
            // No subscribers is the normal idle state
            if self.event_tx.send(event).is_err() {
                tracing::trace!("Order event dropped: no subscribers");
                break;
            }
        }
    }

    // ========== Queries ==========

    /// Active order for a table code, if any
    pub fn find_active_order_for_table(&self, table_code: &str) -> ManagerResult<Option<Order>> {
        let Some(code) = normalize_table_code(table_code) else {
            return Ok(None);
        };

        if let Some(order_id) = self.storage.open_order_id(&code)?
            && let Some(order) = self.storage.get_order(order_id)?
            && order.is_open()
        {
            return Ok(Some(order));
        }

        let latest = self
            .storage
            .list_open_orders()?
            .into_iter()
            .filter(|o| o.table_code == code)
            .max_by_key(|o| (o.created_at, o.id));
        Ok(latest)
    }

    /// Open orders, oldest first
    pub fn list_open_orders(&self) -> ManagerResult<Vec<Order>> {
        Ok(self.storage.list_open_orders()?)
    }

    pub fn get_order(&self, order_id: i64) -> ManagerResult<Order> {
        self.storage
            .get_order(order_id)?
            .ok_or(ManagerError::OrderNotFound(order_id))
    }

    /// Order with its items in creation order
    pub fn get_order_with_items(&self, order_id: i64) -> ManagerResult<OrderWithItems> {
        let order = self.get_order(order_id)?;
        let items = self.storage.get_items_for_order(order_id)?;
        Ok(OrderWithItems { order, items })
    }

    /// Staff table view: active order, its items and the running total
    pub fn get_table(&self, table_code: &str) -> ManagerResult<TableView> {
        let code = normalize_table_code(table_code).ok_or(ManagerError::TableCodeMissing)?;

        let Some(order) = self.find_active_order_for_table(&code)? else {
            return Ok(TableView {
                table_code: code,
                order: None,
                items: vec![],
                running_total: Decimal::ZERO,
            });
        };

        let items = self.storage.get_items_for_order(order.id)?;
        let running_total = round_money(order_total(&items)?);
        Ok(TableView {
            table_code: code,
            order: Some(order),
            items,
            running_total,
        })
    }

    // ========== Order lifecycle ==========

    /// Resolve the open order for `code` inside `txn`, creating it when absent.
    ///
    /// Returns the order and whether it was created.
    fn ensure_open_in(
        &self,
        txn: &WriteTransaction,
        code: &str,
        table_label: Option<&str>,
    ) -> ManagerResult<(Order, bool)> {
        if let Some(order_id) = self.storage.open_order_id_in(txn, code)?
            && let Some(order) = self.storage.get_order_in(txn, order_id)?
            && order.is_open()
        {
            return Ok((order, false));
        }

        // Orders written before the index existed
        let legacy = self
            .storage
            .open_orders_for_table_in(txn, code)?
            .into_iter()
            .max_by_key(|o| (o.created_at, o.id));
        if let Some(order) = legacy {
            tracing::warn!(table_code = %code, order_id = order.id, "Re-indexing open order");
            self.storage.set_open_order(txn, code, order.id)?;
            return Ok((order, false));
        }

        let order = Order {
            id: snowflake_id(),
            table_code: code.to_string(),
            table_label: table_label
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            state: OrderState::Open,
            created_at: now_millis(),
            closed_at: None,
            total: Decimal::ZERO,
            call_waiter: false,
            request_bill: false,
        };
        self.storage.store_order(txn, &order)?;
        self.storage.set_open_order(txn, code, order.id)?;
        tracing::info!(table_code = %code, order_id = order.id, "Order opened");

        Ok((order, true))
    }

    /// Return the table's open order, creating one when there is none
    pub fn open_or_get_order(
        &self,
        table_code: &str,
        table_label: Option<&str>,
    ) -> ManagerResult<Order> {
        let code = normalize_table_code(table_code).ok_or(ManagerError::TableCodeMissing)?;

        let txn = self.storage.begin_write()?;
        let (order, created) = self.ensure_open_in(&txn, &code, table_label)?;
        txn.commit()?;

        if created {
            self.broadcast(vec![OrderEvent::new(
                OrderEventType::OrderOpened,
                order.id,
                &order.table_code,
            )]);
        }
        Ok(order)
    }

    /// Close an open order with the total over all of its items
    pub fn close_order(&self, order_id: i64) -> ManagerResult<Order> {
        let txn = self.storage.begin_write()?;
        let mut order = self
            .storage
            .get_order_in(&txn, order_id)?
            .ok_or(ManagerError::OrderNotFound(order_id))?;
        if !order.is_open() {
            return Err(ManagerError::OrderAlreadyClosed(order_id));
        }

        let items = self.storage.get_items_for_order_in(&txn, order_id)?;
        order.total = round_money(order_total(&items)?);
        order.state = OrderState::Closed;
        order.closed_at = Some(now_millis());

        self.storage.store_order(&txn, &order)?;
        self.storage
            .clear_open_order(&txn, &order.table_code, order_id)?;
        txn.commit()?;

        tracing::info!(
            order_id,
            table_code = %order.table_code,
            total = %order.total,
            item_count = items.len(),
            "Order closed"
        );
        self.broadcast(vec![OrderEvent::new(
            OrderEventType::OrderClosed,
            order.id,
            &order.table_code,
        )]);
        Ok(order)
    }

    // ========== Items ==========

    /// Add a line to the table's active order, opening one if needed
    pub fn add_item(&self, input: AddItemInput) -> ManagerResult<OrderItem> {
        let code = normalize_table_code(&input.table_code).ok_or(ManagerError::TableCodeMissing)?;

        let mut name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let mut base_price = input.base_price;

        if input.origin == ItemOrigin::Catalog
            && let Some(dish_id) = input.dish_id
            && (name.is_none() || base_price.is_none())
            && let Some(dishes) = &self.dishes
        {
            let dish = dishes
                .find_by_id(dish_id)?
                .ok_or(ManagerError::DishNotFound(dish_id))?;
            name.get_or_insert(dish.name);
            base_price.get_or_insert(dish.price);
        }

        let name = name.ok_or_else(|| ManagerError::InvalidOperation("Item name is required".into()))?;
        let extras = sanitize_extras(input.extras);
        let note = note_with_extras(input.note.as_deref(), &extras);

        let txn = self.storage.begin_write()?;
        let (order, created) = self.ensure_open_in(&txn, &code, input.table_label.as_deref())?;

        let mut item = OrderItem {
            id: snowflake_id(),
            order_id: order.id,
            table_code: order.table_code.clone(),
            table_label: order.table_label.clone(),
            origin: input.origin,
            dish_id: input.dish_id,
            name,
            note,
            base_price: sanitize_price(base_price),
            extras,
            unit_price: Decimal::ZERO,
            quantity: sanitize_quantity(input.quantity),
            status: ItemStatus::Pending,
            created_at: now_millis(),
            voided: None,
        };
        reprice_checked(&mut item)?;
        self.storage.store_item(&txn, &item)?;
        txn.commit()?;

        tracing::debug!(
            order_id = order.id,
            item_id = item.id,
            quantity = item.quantity,
            unit_price = %item.unit_price,
            "Item added"
        );

        let mut events = Vec::with_capacity(2);
        if created {
            events.push(OrderEvent::new(
                OrderEventType::OrderOpened,
                order.id,
                &order.table_code,
            ));
        }
        events.push(
            OrderEvent::new(OrderEventType::ItemAdded, order.id, &order.table_code)
                .with_item(item.id),
        );
        self.broadcast(events);

        Ok(item)
    }

    /// Load an item, apply `change` and persist it in one transaction
    fn update_item<F>(
        &self,
        item_id: i64,
        event_type: OrderEventType,
        change: F,
    ) -> ManagerResult<OrderItem>
    where
        F: FnOnce(&mut OrderItem) -> ManagerResult<()>,
    {
        let txn = self.storage.begin_write()?;
        let mut item = self
            .storage
            .get_item_in(&txn, item_id)?
            .ok_or(ManagerError::ItemNotFound(item_id))?;

        change(&mut item)?;

        self.storage.store_item(&txn, &item)?;
        txn.commit()?;

        self.broadcast(vec![
            OrderEvent::new(event_type, item.order_id, &item.table_code).with_item(item.id),
        ]);
        Ok(item)
    }

    /// Overwrite an item's status; any transition is allowed
    pub fn set_item_status(&self, item_id: i64, status: ItemStatus) -> ManagerResult<OrderItem> {
        self.update_item(item_id, OrderEventType::ItemStatusChanged, |item| {
            tracing::debug!(item_id, from = %item.status, to = %status, "Item status changed");
            item.status = status;
            Ok(())
        })
    }

    /// Mark an item as annulled: delivered, note replaced by the marker
    pub fn annul_item(&self, item_id: i64, reason: Option<&str>) -> ManagerResult<OrderItem> {
        let reason = reason.map(str::trim).filter(|r| !r.is_empty());

        self.update_item(item_id, OrderEventType::ItemAnnulled, |item| {
            item.status = ItemStatus::Delivered;
            item.note = Some(match reason {
                Some(r) => format!("{ANNUL_MARKER}: {r}"),
                None => ANNUL_MARKER.to_string(),
            });
            item.voided = Some(VoidRecord {
                reason: reason.map(str::to_string),
                voided_at: now_millis(),
            });
            tracing::info!(item_id, order_id = item.order_id, reason = ?reason, "Item annulled");
            Ok(())
        })
    }

    /// Patch an item. Catalog items only accept quantity and note.
    pub fn edit_item(&self, item_id: i64, patch: OrderItemUpdate) -> ManagerResult<OrderItem> {
        self.update_item(item_id, OrderEventType::ItemUpdated, |item| {
            if item.origin == ItemOrigin::Catalog && patch.touches_catalog_snapshot() {
                return Err(ManagerError::ItemNotEditable(item_id));
            }

            if let Some(name) = patch.name.as_deref().map(str::trim)
                && !name.is_empty()
            {
                item.name = name.to_string();
            }
            if let Some(price) = patch.base_price {
                item.base_price = sanitize_price(Some(price));
            }
            if patch.quantity.is_some() {
                item.quantity = sanitize_quantity(patch.quantity);
            }

            let extras_changed = patch.extras.is_some();
            if let Some(extras) = patch.extras {
                item.extras = sanitize_extras(extras);
            }
            if patch.note.is_some() || extras_changed {
                let base = match patch.note.as_deref() {
                    Some(note) => note.to_string(),
                    None => staff_note(item.note.as_deref()).to_string(),
                };
                item.note = note_with_extras(Some(&base), &item.extras);
            }

            reprice_checked(item)
        })
    }

    /// Remove an item from its order
    pub fn delete_item(&self, item_id: i64) -> ManagerResult<()> {
        let txn = self.storage.begin_write()?;
        let item = self
            .storage
            .get_item_in(&txn, item_id)?
            .ok_or(ManagerError::ItemNotFound(item_id))?;
        self.storage.remove_item(&txn, &item)?;
        txn.commit()?;

        tracing::debug!(item_id, order_id = item.order_id, "Item removed");
        self.broadcast(vec![
            OrderEvent::new(OrderEventType::ItemRemoved, item.order_id, &item.table_code)
                .with_item(item_id),
        ]);
        Ok(())
    }

    // ========== Table signals ==========

    /// Customer "call waiter": opens an order when needed, idempotent
    pub fn raise_call_waiter(&self, table_code: &str) -> ManagerResult<Order> {
        self.raise_signal(table_code, OrderEventType::CallWaiterRaised, |o| {
            o.call_waiter = true
        })
    }

    /// Customer "request bill": opens an order when needed, idempotent
    pub fn raise_request_bill(&self, table_code: &str) -> ManagerResult<Order> {
        self.raise_signal(table_code, OrderEventType::RequestBillRaised, |o| {
            o.request_bill = true
        })
    }

    fn raise_signal<F>(
        &self,
        table_code: &str,
        event_type: OrderEventType,
        set: F,
    ) -> ManagerResult<Order>
    where
        F: FnOnce(&mut Order),
    {
        let code = normalize_table_code(table_code).ok_or(ManagerError::TableCodeMissing)?;

        let txn = self.storage.begin_write()?;
        let (mut order, created) = self.ensure_open_in(&txn, &code, None)?;
        set(&mut order);
        self.storage.store_order(&txn, &order)?;
        txn.commit()?;

        tracing::info!(table_code = %code, order_id = order.id, signal = %event_type, "Table signal raised");

        let mut events = Vec::with_capacity(2);
        if created {
            events.push(OrderEvent::new(
                OrderEventType::OrderOpened,
                order.id,
                &order.table_code,
            ));
        }
        events.push(OrderEvent::new(event_type, order.id, &order.table_code));
        self.broadcast(events);

        Ok(order)
    }

    pub fn clear_call_waiter(&self, order_id: i64) -> ManagerResult<Order> {
        self.clear_signal(order_id, |o| o.call_waiter = false)
    }

    pub fn clear_request_bill(&self, order_id: i64) -> ManagerResult<Order> {
        self.clear_signal(order_id, |o| o.request_bill = false)
    }

    /// Staff "clear notices": both flags off
    pub fn clear_signals(&self, order_id: i64) -> ManagerResult<Order> {
        self.clear_signal(order_id, |o| {
            o.call_waiter = false;
            o.request_bill = false;
        })
    }

    fn clear_signal<F>(&self, order_id: i64, clear: F) -> ManagerResult<Order>
    where
        F: FnOnce(&mut Order),
    {
        let txn = self.storage.begin_write()?;
        let mut order = self
            .storage
            .get_order_in(&txn, order_id)?
            .ok_or(ManagerError::OrderNotFound(order_id))?;
        clear(&mut order);
        self.storage.store_order(&txn, &order)?;
        txn.commit()?;

        self.broadcast(vec![OrderEvent::new(
            OrderEventType::SignalsCleared,
            order.id,
            &order.table_code,
        )]);
        Ok(order)
    }
}

fn amount_too_large() -> ManagerError {
    ManagerError::AmountTooLarge { max: MAX_PRICE }
}

/// Reprice an item and keep its unit price and line total in range
fn reprice_checked(item: &mut OrderItem) -> ManagerResult<()> {
    let unit = item.reprice().ok_or_else(amount_too_large)?;
    if unit > Decimal::from(MAX_PRICE) || item.line_total().is_none() {
        return Err(amount_too_large());
    }
    Ok(())
}

/// Total over every item; overflow surfaces as an error
fn order_total(items: &[OrderItem]) -> ManagerResult<Decimal> {
    sum_line_totals(items).ok_or_else(amount_too_large)
}

/// Staff-written part of an item note, without the extras summary
fn staff_note(note: Option<&str>) -> &str {
    let note = note.unwrap_or_default();
    if note.starts_with("Extras: ") {
        return "";
    }
    match note.split_once(EXTRAS_SEPARATOR) {
        Some((base, _)) => base,
        None => note,
    }
}

#[cfg(test)]
mod tests;
