use super::*;

#[test]
fn test_add_item_sanitizes_input() {
    let manager = create_test_manager();

    let item = manager
        .add_item(AddItemInput {
            table_code: " T1 ".to_string(),
            name: Some("  Provoleta ".to_string()),
            base_price: Some(dec(-50)),
            quantity: Some(f64::NAN),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(item.table_code, "T1");
    assert_eq!(item.name, "Provoleta");
    assert_eq!(item.quantity, 1);
    assert_eq!(item.unit_price, Decimal::ZERO);
    assert_eq!(item.status, ItemStatus::Pending);
    assert!(item.created_at > 0);

    let fractional = manager.add_item(manual_item("T1", "Pan", 300, 2.7)).unwrap();
    assert_eq!(fractional.quantity, 2);
}

#[test]
fn test_add_item_requires_table_code_and_name() {
    let manager = create_test_manager();
    assert!(matches!(
        manager.add_item(manual_item("  ", "Flan", 100, 1.0)),
        Err(ManagerError::TableCodeMissing)
    ));
    assert!(matches!(
        manager.add_item(AddItemInput {
            table_code: "T1".to_string(),
            ..Default::default()
        }),
        Err(ManagerError::InvalidOperation(_))
    ));
    assert!(manager.list_open_orders().unwrap().is_empty());
}

#[test]
fn test_extras_fold_into_unit_price_and_note() {
    let manager = create_test_manager();
    let mut input = manual_item("T1", "Hamburguesa", 8000, 2.0);
    input.note = Some("sin cebolla".to_string());
    input.extras = vec![extra("Huevo", 800), extra("", 500), extra("Panceta", 1500)];

    let item = manager.add_item(input).unwrap();
    assert_eq!(item.extras.len(), 2);
    assert_eq!(item.unit_price, dec(10300));
    assert_eq!(item.line_total(), Some(dec(20600)));
    assert_eq!(
        item.note.as_deref(),
        Some("sin cebolla | Extras: Huevo (+$800) · Panceta (+$1.500)")
    );
}

#[test]
fn test_catalog_item_snapshots_dish() {
    let (manager, dishes) = create_manager_with_catalog();
    let dish = dishes.create(dish("Ñoquis", 6500)).unwrap();

    let item = manager.add_item(catalog_item("T1", dish.id)).unwrap();
    assert_eq!(item.origin, ItemOrigin::Catalog);
    assert_eq!(item.name, "Ñoquis");
    assert_eq!(item.unit_price, dec(6500));

    // Later catalog price changes do not touch the snapshot
    dishes
        .update(
            dish.id,
            shared::models::DishUpdate {
                price: Some(dec(7000)),
                ..Default::default()
            },
        )
        .unwrap();
    let order = manager.get_order_with_items(item.order_id).unwrap();
    assert_eq!(order.items[0].unit_price, dec(6500));

    assert!(matches!(
        manager.add_item(catalog_item("T1", 999)),
        Err(ManagerError::DishNotFound(999))
    ));
}

#[test]
fn test_set_status_allows_any_transition() {
    let manager = create_test_manager();
    let item = manager.add_item(manual_item("T1", "Flan", 500, 1.0)).unwrap();

    let delivered = manager.set_item_status(item.id, ItemStatus::Delivered).unwrap();
    assert_eq!(delivered.status, ItemStatus::Delivered);
    let back = manager.set_item_status(item.id, ItemStatus::Pending).unwrap();
    assert_eq!(back.status, ItemStatus::Pending);

    assert!(matches!(
        manager.set_item_status(7, ItemStatus::Ready),
        Err(ManagerError::ItemNotFound(7))
    ));
}

#[test]
fn test_annul_with_reason() {
    let manager = create_test_manager();
    let mut input = manual_item("T1", "Vino", 9000, 1.0);
    input.note = Some("copa".to_string());
    let item = manager.add_item(input).unwrap();

    let annulled = manager.annul_item(item.id, Some("  wrong order ")).unwrap();
    assert_eq!(annulled.status, ItemStatus::Delivered);
    let note = annulled.note.unwrap();
    assert!(note.starts_with(ANNUL_MARKER));
    assert!(note.contains("wrong order"));
    assert!(!note.contains("copa"));
    let voided = annulled.voided.unwrap();
    assert_eq!(voided.reason.as_deref(), Some("wrong order"));
}

#[test]
fn test_annul_without_reason() {
    let manager = create_test_manager();
    let item = manager.add_item(manual_item("T1", "Vino", 9000, 1.0)).unwrap();

    let annulled = manager.annul_item(item.id, Some("   ")).unwrap();
    assert_eq!(annulled.note.as_deref(), Some(ANNUL_MARKER));
    assert!(annulled.voided.unwrap().reason.is_none());
}

#[test]
fn test_edit_manual_item() {
    let manager = create_test_manager();
    let mut input = manual_item("T1", "Pizza", 9000, 1.0);
    input.note = Some("bien cocida".to_string());
    input.extras = vec![extra("Jamón", 1000)];
    let item = manager.add_item(input).unwrap();

    let edited = manager
        .edit_item(
            item.id,
            OrderItemUpdate {
                name: Some("Pizza grande".to_string()),
                base_price: Some(dec(11000)),
                extras: Some(vec![extra("Morrones", 700)]),
                quantity: Some(2.0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(edited.name, "Pizza grande");
    assert_eq!(edited.unit_price, dec(11700));
    assert_eq!(edited.quantity, 2);
    assert_eq!(
        edited.note.as_deref(),
        Some("bien cocida | Extras: Morrones (+$700)")
    );
}

#[test]
fn test_edit_catalog_item_limits_fields() {
    let (manager, dishes) = create_manager_with_catalog();
    let dish = dishes.create(dish("Lomo", 12000)).unwrap();
    let item = manager.add_item(catalog_item("T1", dish.id)).unwrap();

    let edited = manager
        .edit_item(
            item.id,
            OrderItemUpdate {
                note: Some("jugoso".to_string()),
                quantity: Some(3.0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(edited.quantity, 3);
    assert_eq!(edited.note.as_deref(), Some("jugoso"));

    let rejected = manager.edit_item(
        item.id,
        OrderItemUpdate {
            base_price: Some(dec(1)),
            ..Default::default()
        },
    );
    assert!(matches!(rejected, Err(ManagerError::ItemNotEditable(_))));
    let stored = manager.get_order_with_items(item.order_id).unwrap();
    assert_eq!(stored.items[0].unit_price, dec(12000));
}

#[test]
fn test_delete_item() {
    let manager = create_test_manager();
    let keep = manager.add_item(manual_item("T1", "Agua", 900, 1.0)).unwrap();
    let gone = manager.add_item(manual_item("T1", "Soda", 800, 1.0)).unwrap();

    manager.delete_item(gone.id).unwrap();
    let order = manager.get_order_with_items(keep.order_id).unwrap();
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].id, keep.id);

    assert!(matches!(
        manager.delete_item(gone.id),
        Err(ManagerError::ItemNotFound(_))
    ));
}

#[test]
fn test_staff_note_strips_extras_summary() {
    assert_eq!(staff_note(Some("sin sal | Extras: Queso (+$500)")), "sin sal");
    assert_eq!(staff_note(Some("Extras: Queso (+$500)")), "");
    assert_eq!(staff_note(Some("sin sal")), "sin sal");
    assert_eq!(staff_note(None), "");
}

#[test]
fn test_oversized_prices_are_rejected() {
    use crate::orders::money::MAX_PRICE;

    let manager = create_test_manager();
    let huge = AddItemInput {
        table_code: "9".to_string(),
        name: Some("X".to_string()),
        base_price: Some(Decimal::MAX),
        quantity: Some(2.0),
        ..Default::default()
    };
    assert!(matches!(
        manager.add_item(huge),
        Err(ManagerError::AmountTooLarge { .. })
    ));
    // the order opened by the failed add is rolled back with it
    assert!(manager.list_open_orders().unwrap().is_empty());

    let mut extras = manual_item("9", "Parrillada", MAX_PRICE, 1.0);
    extras.extras = vec![extra("Chorizo", 1)];
    assert!(matches!(
        manager.add_item(extras),
        Err(ManagerError::AmountTooLarge { .. })
    ));

    let item = manager.add_item(manual_item("9", "Vino", 4000, 1.0)).unwrap();
    let rejected = manager.edit_item(
        item.id,
        OrderItemUpdate {
            base_price: Some(dec(MAX_PRICE + 1)),
            ..Default::default()
        },
    );
    assert!(matches!(rejected, Err(ManagerError::AmountTooLarge { .. })));

    let view = manager.get_table("9").unwrap();
    assert_eq!(view.items[0].unit_price, dec(4000));
    assert_eq!(view.running_total, dec(4000));

    let closed = manager.close_order(item.order_id).unwrap();
    assert_eq!(closed.total, dec(4000));
}
