use super::*;
use std::sync::Arc;

#[test]
fn test_open_or_get_reuses_open_order() {
    let manager = create_test_manager();

    let first = manager.open_or_get_order("Mesa 4", Some("Terraza")).unwrap();
    assert!(first.is_open());
    assert_eq!(first.total, Decimal::ZERO);
    assert!(first.closed_at.is_none());
    assert!(!first.call_waiter && !first.request_bill);
    assert_eq!(first.table_label.as_deref(), Some("Terraza"));

    // Whitespace variants resolve to the same table
    let second = manager.open_or_get_order("  Mesa   4 ", None).unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(manager.list_open_orders().unwrap().len(), 1);
}

#[test]
fn test_open_rejects_blank_code() {
    let manager = create_test_manager();
    assert!(matches!(
        manager.open_or_get_order("   ", None),
        Err(ManagerError::TableCodeMissing)
    ));
    assert!(manager.find_active_order_for_table("").unwrap().is_none());
}

#[test]
fn test_concurrent_open_yields_single_order() {
    let manager = Arc::new(create_test_manager());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            std::thread::spawn(move || manager.open_or_get_order("T1", None).unwrap().id)
        })
        .collect();
    let ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(ids.windows(2).all(|w| w[0] == w[1]));
    let open: Vec<_> = manager
        .list_open_orders()
        .unwrap()
        .into_iter()
        .filter(|o| o.table_code == "T1")
        .collect();
    assert_eq!(open.len(), 1);
}

#[test]
fn test_close_total_includes_every_status() {
    let manager = create_test_manager();
    let a = manager.add_item(manual_item("T1", "Milanesa", 1000, 2.0)).unwrap();
    let b = manager.add_item(manual_item("T1", "Flan", 500, 1.0)).unwrap();
    assert_eq!(a.order_id, b.order_id);
    manager.set_item_status(b.id, ItemStatus::Delivered).unwrap();

    let closed = manager.close_order(a.order_id).unwrap();
    assert_eq!(closed.state, OrderState::Closed);
    assert_eq!(closed.total, dec(2500));
    assert!(closed.closed_at.is_some());

    // Items stay queryable after close
    let with_items = manager.get_order_with_items(a.order_id).unwrap();
    assert_eq!(with_items.items.len(), 2);
    assert_eq!(with_items.items[0].id, a.id);
}

#[test]
fn test_close_twice_is_rejected() {
    let manager = create_test_manager();
    let order = manager.open_or_get_order("T2", None).unwrap();
    manager.close_order(order.id).unwrap();

    assert!(matches!(
        manager.close_order(order.id),
        Err(ManagerError::OrderAlreadyClosed(id)) if id == order.id
    ));
    assert!(matches!(
        manager.close_order(42),
        Err(ManagerError::OrderNotFound(42))
    ));
}

#[test]
fn test_close_frees_table_for_new_order() {
    let manager = create_test_manager();
    let first = manager.open_or_get_order("T3", None).unwrap();
    manager.close_order(first.id).unwrap();

    assert!(manager.find_active_order_for_table("T3").unwrap().is_none());
    let table = manager.get_table("T3").unwrap();
    assert!(table.order.is_none());
    assert!(table.items.is_empty());

    let second = manager.open_or_get_order("T3", None).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn test_legacy_duplicate_open_orders_resolve_to_latest() {
    let storage = OrderStorage::open_in_memory().unwrap();
    let txn = storage.begin_write().unwrap();
    for (id, created_at) in [(100, 1_000), (200, 2_000)] {
        let order = Order {
            id,
            table_code: "T9".to_string(),
            table_label: None,
            state: OrderState::Open,
            created_at,
            closed_at: None,
            total: Decimal::ZERO,
            call_waiter: false,
            request_bill: false,
        };
        storage.store_order(&txn, &order).unwrap();
    }
    txn.commit().unwrap();

    let manager = OrdersManager::new(storage).unwrap();
    assert_eq!(manager.find_active_order_for_table("T9").unwrap().unwrap().id, 200);
    assert_eq!(manager.open_or_get_order("T9", None).unwrap().id, 200);
}

#[test]
fn test_get_table_running_total() {
    let manager = create_test_manager();
    manager.add_item(manual_item("T5", "Café", 1200, 2.0)).unwrap();
    manager.add_item(manual_item("T5", "Medialuna", 700, 3.0)).unwrap();

    let table = manager.get_table("T5").unwrap();
    assert_eq!(table.items.len(), 2);
    assert_eq!(table.running_total, dec(4500));
    assert_eq!(table.order.unwrap().total, Decimal::ZERO);
}

#[tokio::test]
async fn test_events_broadcast_after_commit() {
    let manager = create_test_manager();
    let mut rx = manager.subscribe();

    let item = manager.add_item(manual_item("T6", "Agua", 900, 1.0)).unwrap();

    let opened = rx.recv().await.unwrap();
    assert_eq!(opened.event_type, OrderEventType::OrderOpened);
    assert_eq!(opened.table_code, "T6");

    let added = rx.recv().await.unwrap();
    assert_eq!(added.event_type, OrderEventType::ItemAdded);
    assert_eq!(added.item_id, Some(item.id));

    manager.close_order(item.order_id).unwrap();
    assert_eq!(rx.recv().await.unwrap().event_type, OrderEventType::OrderClosed);
}
