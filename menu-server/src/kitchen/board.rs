//! Kitchen board aggregation
//!
//! Groups the items of open orders per table and lays them out as four
//! status columns. Only items belonging to open orders are read.

use serde::Serialize;
use shared::order::{ItemStatus, Order, OrderItem};
use std::collections::HashMap;

use super::alert::TableAlert;
use crate::db::StorageResult;
use crate::orders::OrderStorage;

/// Severity of a table whose items are all delivered (or that has none)
pub const SEVERITY_IDLE: u8 = 3;

/// One open order with its items, most urgent first
#[derive(Debug, Clone, Serialize)]
pub struct TableGroup {
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// Lowest status rank among non-delivered items, 3 when none
    pub severity: u8,
}

/// Min rank over items that are not delivered yet
pub fn severity(items: &[OrderItem]) -> u8 {
    items
        .iter()
        .filter(|i| i.status != ItemStatus::Delivered)
        .map(|i| i.status.rank())
        .min()
        .unwrap_or(SEVERITY_IDLE)
}

/// Group items by order, sort within each group by (status, created_at)
/// and sort the groups by (severity, order created_at).
pub fn group_orders(orders: Vec<Order>, items: Vec<OrderItem>) -> Vec<TableGroup> {
    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::with_capacity(orders.len());
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }

    let mut groups: Vec<TableGroup> = orders
        .into_iter()
        .map(|order| {
            let mut items = by_order.remove(&order.id).unwrap_or_default();
            items.sort_by_key(|i| (i.status.rank(), i.created_at, i.id));
            let severity = severity(&items);
            TableGroup {
                order,
                items,
                severity,
            }
        })
        .collect();

    groups.sort_by_key(|g| (g.severity, g.order.created_at, g.order.id));
    groups
}

/// Open orders with their items, read per order key
pub fn list_open_orders_with_items(storage: &OrderStorage) -> StorageResult<Vec<TableGroup>> {
    let orders = storage.list_open_orders()?;

    let mut items = Vec::new();
    for order in &orders {
        items.extend(storage.get_items_for_order(order.id)?);
    }

    Ok(group_orders(orders, items))
}

/// One table inside a status column
#[derive(Debug, Clone, Serialize)]
pub struct KitchenCard {
    pub order_id: i64,
    pub table_code: String,
    pub table_label: Option<String>,
    pub severity: u8,
    /// Every item of the table is delivered
    pub all_delivered: bool,
    pub call_waiter: bool,
    pub request_bill: bool,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KitchenColumn {
    pub status: ItemStatus,
    pub label: &'static str,
    pub item_count: usize,
    pub cards: Vec<KitchenCard>,
}

/// Board payload served to kitchen screens
#[derive(Debug, Clone, Serialize)]
pub struct KitchenBoard {
    pub columns: Vec<KitchenColumn>,
    pub tables: Vec<TableGroup>,
    /// Alert currently held for the kitchen, if any
    pub alert: Option<TableAlert>,
    /// Suggested client reconciliation interval
    pub refresh_secs: u64,
    pub generated_at: i64,
}

/// Column heading shown on kitchen screens
pub fn status_label(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Pending => "pendiente",
        ItemStatus::InPreparation => "en preparación",
        ItemStatus::Ready => "listo",
        ItemStatus::Delivered => "entregado",
    }
}

/// Four columns; a table gets a card in every column where it has items
pub fn build_columns(groups: &[TableGroup]) -> Vec<KitchenColumn> {
    ItemStatus::ALL
        .iter()
        .map(|&status| {
            let cards: Vec<KitchenCard> = groups
                .iter()
                .filter_map(|group| {
                    let items: Vec<OrderItem> = group
                        .items
                        .iter()
                        .filter(|i| i.status == status)
                        .cloned()
                        .collect();
                    if items.is_empty() {
                        return None;
                    }
                    Some(KitchenCard {
                        order_id: group.order.id,
                        table_code: group.order.table_code.clone(),
                        table_label: group.order.table_label.clone(),
                        severity: group.severity,
                        all_delivered: group.severity == SEVERITY_IDLE,
                        call_waiter: group.order.call_waiter,
                        request_bill: group.order.request_bill,
                        items,
                    })
                })
                .collect();

            KitchenColumn {
                status,
                label: status_label(status),
                item_count: cards.iter().map(|c| c.items.len()).sum(),
                cards,
            }
        })
        .collect()
}
