//! Order Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::order::{AnnulRequest, ItemStatusUpdate, OrderItem, OrderItemUpdate};

use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_price, validate_optional_text,
    validate_quantity, validate_required_text,
};

/// PUT /api/order-items/{id} - catalog items accept only quantity and note
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderItemUpdate>,
) -> AppResult<Json<OrderItem>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(payload.note.as_deref(), "note", MAX_NOTE_LEN)?;
    validate_optional_price(payload.base_price, "base_price")?;
    for extra in payload.extras.iter().flatten() {
        validate_optional_text(Some(extra.label.as_str()), "extras.label", MAX_NAME_LEN)?;
        validate_optional_price(Some(extra.price), "extras.price")?;
    }
    validate_quantity(payload.quantity)?;

    Ok(Json(state.orders.edit_item(id, payload)?))
}

/// DELETE /api/order-items/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    state.orders.delete_item(id)?;
    Ok(Json(true))
}

/// PUT /api/order-items/{id}/status - any transition, backward included
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ItemStatusUpdate>,
) -> AppResult<Json<OrderItem>> {
    Ok(Json(state.orders.set_item_status(id, payload.status)?))
}

/// POST /api/order-items/{id}/annul
pub async fn annul(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AnnulRequest>,
) -> AppResult<Json<OrderItem>> {
    validate_optional_text(payload.reason.as_deref(), "reason", MAX_NOTE_LEN)?;
    Ok(Json(state.orders.annul_item(id, payload.reason.as_deref())?))
}
