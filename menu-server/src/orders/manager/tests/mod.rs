use super::*;
use crate::db::Storage;
use shared::models::DishCreate;
use shared::order::ItemExtra;

mod test_core;
mod test_items;
mod test_signals;

fn create_test_manager() -> OrdersManager {
    let storage = OrderStorage::open_in_memory().unwrap();
    OrdersManager::new(storage).unwrap()
}

/// Manager sharing one database with a dish repository
fn create_manager_with_catalog() -> (OrdersManager, DishRepository) {
    let catalog = Storage::open_in_memory().unwrap();
    let dishes = DishRepository::new(catalog.clone());
    let storage = OrderStorage::new(catalog.database()).unwrap();
    let manager = OrdersManager::new(storage)
        .unwrap()
        .with_catalog(dishes.clone());
    (manager, dishes)
}

fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

fn manual_item(table_code: &str, name: &str, price: i64, quantity: f64) -> AddItemInput {
    AddItemInput {
        table_code: table_code.to_string(),
        name: Some(name.to_string()),
        base_price: Some(dec(price)),
        quantity: Some(quantity),
        ..Default::default()
    }
}

fn catalog_item(table_code: &str, dish_id: i64) -> AddItemInput {
    AddItemInput {
        table_code: table_code.to_string(),
        origin: ItemOrigin::Catalog,
        dish_id: Some(dish_id),
        ..Default::default()
    }
}

fn extra(label: &str, price: i64) -> ItemExtra {
    ItemExtra {
        label: label.to_string(),
        price: dec(price),
    }
}

fn dish(name: &str, price: i64) -> DishCreate {
    DishCreate {
        name: name.to_string(),
        description: None,
        price: dec(price),
        category_id: None,
        has_image: None,
        image_url: None,
        is_active: None,
        sort_order: None,
    }
}
