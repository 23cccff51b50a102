use super::*;

#[test]
fn test_call_waiter_opens_order_and_is_idempotent() {
    let manager = create_test_manager();

    let order = manager.raise_call_waiter("T7").unwrap();
    assert!(order.call_waiter);
    assert!(!order.request_bill);

    let again = manager.raise_call_waiter("T7").unwrap();
    assert_eq!(again.id, order.id);
    assert!(again.call_waiter);
    assert_eq!(manager.list_open_orders().unwrap().len(), 1);
}

#[test]
fn test_request_bill_uses_existing_order() {
    let manager = create_test_manager();
    let item = manager.add_item(manual_item("T8", "Café", 1200, 1.0)).unwrap();

    let order = manager.raise_request_bill("T8").unwrap();
    assert_eq!(order.id, item.order_id);
    assert!(order.request_bill);
    assert!(order.has_signal());
}

#[test]
fn test_clear_flags_by_order_id() {
    let manager = create_test_manager();
    manager.raise_call_waiter("T1").unwrap();
    let order = manager.raise_request_bill("T1").unwrap();

    let cleared = manager.clear_call_waiter(order.id).unwrap();
    assert!(!cleared.call_waiter);
    assert!(cleared.request_bill);

    let cleared = manager.clear_request_bill(order.id).unwrap();
    assert!(!cleared.has_signal());

    // Clearing is unconditional
    assert!(!manager.clear_signals(order.id).unwrap().has_signal());
}

#[test]
fn test_clear_signals_on_closed_order() {
    let manager = create_test_manager();
    let order = manager.raise_call_waiter("T2").unwrap();
    manager.close_order(order.id).unwrap();

    let cleared = manager.clear_signals(order.id).unwrap();
    assert!(!cleared.call_waiter);
    assert_eq!(cleared.state, OrderState::Closed);

    assert!(matches!(
        manager.clear_signals(1),
        Err(ManagerError::OrderNotFound(1))
    ));
}

#[test]
fn test_signal_rejects_blank_code() {
    let manager = create_test_manager();
    assert!(matches!(
        manager.raise_request_bill(" "),
        Err(ManagerError::TableCodeMissing)
    ));
}
