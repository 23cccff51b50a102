//! Kitchen view
//!
//! - **board**: open orders grouped per table, four status columns
//! - **alert**: one-at-a-time surfacing of customer signals
//! - **monitor**: background poll feeding the alert gate

pub mod alert;
pub mod board;
pub mod monitor;

pub use alert::{AlertGate, AlertKind, TableAlert, select_alert};
pub use board::{
    KitchenBoard, KitchenCard, KitchenColumn, TableGroup, build_columns,
    list_open_orders_with_items, severity,
};
pub use monitor::KitchenMonitor;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{OrderStorage, OrdersManager};
    use rust_decimal::Decimal;
    use shared::order::{AddItemInput, ItemStatus};

    fn add(manager: &OrdersManager, table_code: &str, price: i64) -> i64 {
        manager
            .add_item(AddItemInput {
                table_code: table_code.to_string(),
                name: Some("Empanada".to_string()),
                base_price: Some(Decimal::from(price)),
                ..Default::default()
            })
            .unwrap()
            .order_id
    }

    #[test]
    fn test_reads_only_open_order_items() {
        let manager = OrdersManager::new(OrderStorage::open_in_memory().unwrap()).unwrap();

        for n in 0..500 {
            let order_id = add(&manager, &format!("C{n}"), 100);
            manager.close_order(order_id).unwrap();
        }
        let a = add(&manager, "A", 100);
        add(&manager, "A", 200);
        let b = add(&manager, "B", 300);

        let before = manager.storage().items_read();
        let groups = list_open_orders_with_items(manager.storage()).unwrap();
        let read = manager.storage().items_read() - before;

        assert_eq!(groups.len(), 2);
        assert_eq!(read, 3);
        let ids: Vec<_> = groups.iter().map(|g| g.order.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_board_reflects_status_changes() {
        let manager = OrdersManager::new(OrderStorage::open_in_memory().unwrap()).unwrap();
        let order_id = add(&manager, "T1", 100);
        let item = manager.get_order_with_items(order_id).unwrap().items[0].clone();
        manager.set_item_status(item.id, ItemStatus::Ready).unwrap();

        let groups = list_open_orders_with_items(manager.storage()).unwrap();
        assert_eq!(groups[0].severity, 2);

        let columns = build_columns(&groups);
        assert!(columns[0].cards.is_empty());
        assert_eq!(columns[2].cards[0].items[0].id, item.id);
    }
}
