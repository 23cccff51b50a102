//! Kitchen API Handlers

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use shared::util::now_millis;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::core::ServerState;
use crate::kitchen::{
    AlertKind, KitchenBoard, TableAlert, build_columns, list_open_orders_with_items,
};
use crate::orders::OrderEvent;
use crate::utils::AppResult;

/// GET /api/kitchen/board
pub async fn board(State(state): State<ServerState>) -> AppResult<Json<KitchenBoard>> {
    let tables = list_open_orders_with_items(state.orders.storage())?;

    // Alert selection follows fetch order (oldest first), not severity order
    let open = state.orders.list_open_orders()?;
    state.alerts.refresh(&open);

    Ok(Json(KitchenBoard {
        columns: build_columns(&tables),
        tables,
        alert: state.alerts.current(),
        refresh_secs: state.config.kitchen_refresh_secs,
        generated_at: now_millis(),
    }))
}

fn order_event(event: &OrderEvent) -> Event {
    let sse = Event::default().event(event.event_type.to_string());
    match sse.json_data(event) {
        Ok(sse) => sse,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode order event");
            Event::default().comment("encode error")
        }
    }
}

/// GET /api/kitchen/events
///
/// A `resync` event tells the client it missed events and must refetch.
pub async fn events(
    State(state): State<ServerState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.orders.subscribe();
    tracing::debug!("Kitchen event stream opened");

    let stream = stream::unfold(rx, |mut rx: broadcast::Receiver<OrderEvent>| async move {
        let sse = match rx.recv().await {
            Ok(event) => order_event(&event),
            Err(RecvError::Lagged(skipped)) => {
                Event::default().event("resync").data(skipped.to_string())
            }
            Err(RecvError::Closed) => return None,
        };
        Some((Ok(sse), rx))
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

/// GET /api/kitchen/alert
pub async fn current_alert(State(state): State<ServerState>) -> Json<Option<TableAlert>> {
    Json(state.alerts.current())
}

/// POST /api/kitchen/alert/{order_id}/dismiss
///
/// Clears the flag behind the held alert, then surfaces the next pending
/// signal, if any.
pub async fn dismiss_alert(
    State(state): State<ServerState>,
    Path(order_id): Path<i64>,
) -> AppResult<Json<Option<TableAlert>>> {
    if let Some(alert) = state.alerts.dismiss(order_id) {
        match alert.kind {
            AlertKind::CallWaiter => state.orders.clear_call_waiter(order_id)?,
            AlertKind::RequestBill => state.orders.clear_request_bill(order_id)?,
        };
        tracing::info!(order_id, table_code = %alert.table_code, kind = ?alert.kind, "Alert dismissed");
    }
    let open = state.orders.list_open_orders()?;
    state.alerts.refresh(&open);
    Ok(Json(state.alerts.current()))
}
