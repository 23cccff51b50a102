//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use shared::order::{Order, OrderWithItems};

use crate::core::ServerState;
use crate::receipt::render_receipt;
use crate::utils::{AppError, AppResult};

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderWithItems>> {
    Ok(Json(state.orders.get_order_with_items(id)?))
}

/// POST /api/orders/{id}/close
pub async fn close(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<Order>> {
    let order = state.orders.close_order(id)?;
    state.alerts.dismiss(id);
    Ok(Json(order))
}

/// POST /api/orders/{id}/clear-signals
pub async fn clear_signals(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state.orders.clear_signals(id)?;
    state.alerts.dismiss(id);
    Ok(Json(order))
}

/// POST /api/orders/{id}/clear-call-waiter
pub async fn clear_call_waiter(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.clear_call_waiter(id)?))
}

/// POST /api/orders/{id}/clear-request-bill
pub async fn clear_request_bill(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.clear_request_bill(id)?))
}

/// GET /api/orders/{id}/receipt - standalone HTML, served as an attachment
pub async fn receipt(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Response> {
    let OrderWithItems { order, items } = state.orders.get_order_with_items(id)?;
    let receipt = render_receipt(&order, &items, &state.config.branding(), Utc::now())
        .ok_or_else(|| AppError::validation("Receipt amounts are out of range"))?;

    tracing::info!(
        order_id = id,
        table_code = %order.table_code,
        lines = receipt.line_count,
        total = %receipt.total,
        "Receipt generated"
    );

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        receipt.filename.replace('"', "")
    ))
    .map_err(|e| AppError::internal(format!("Invalid receipt filename: {e}")))?;

    let mut response = receipt.html.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    Ok(response)
}
