//! Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::order::{AddItemInput, OpenTableRequest, Order, OrderItem, TableView};

use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_TABLE_CODE_LEN, validate_optional_price,
    validate_optional_text, validate_quantity, validate_required_text,
};

/// GET /api/tables - open orders, oldest first
pub async fn list_open(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.orders.list_open_orders()?))
}

/// POST /api/tables - open a table, or return its current order
pub async fn open(
    State(state): State<ServerState>,
    Json(payload): Json<OpenTableRequest>,
) -> AppResult<Json<Order>> {
    validate_required_text(&payload.table_code, "table_code", MAX_TABLE_CODE_LEN)?;
    validate_optional_text(payload.table_label.as_deref(), "table_label", MAX_NAME_LEN)?;

    let order = state
        .orders
        .open_or_get_order(&payload.table_code, payload.table_label.as_deref())?;
    Ok(Json(order))
}

/// GET /api/tables/{code} - active order and items; `order: null` when free
pub async fn get_table(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<TableView>> {
    Ok(Json(state.orders.get_table(&code)?))
}

/// POST /api/tables/{code}/items - add a line, opening the table if needed
pub async fn add_item(
    State(state): State<ServerState>,
    Path(code): Path<String>,
    Json(mut payload): Json<AddItemInput>,
) -> AppResult<Json<OrderItem>> {
    validate_required_text(&code, "table_code", MAX_TABLE_CODE_LEN)?;
    validate_optional_text(payload.table_label.as_deref(), "table_label", MAX_NAME_LEN)?;
    validate_optional_text(payload.name.as_deref(), "name", MAX_NAME_LEN)?;
    validate_optional_text(payload.note.as_deref(), "note", MAX_NOTE_LEN)?;
    validate_optional_price(payload.base_price, "base_price")?;
    for extra in &payload.extras {
        validate_optional_text(Some(extra.label.as_str()), "extras.label", MAX_NAME_LEN)?;
        validate_optional_price(Some(extra.price), "extras.price")?;
    }
    validate_quantity(payload.quantity)?;

    payload.table_code = code;
    let item = state.orders.add_item(payload)?;
    Ok(Json(item))
}
