//! Order API
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /api/orders/{id} | GET | Order with items |
//! | /api/orders/{id}/close | POST | Close with computed total |
//! | /api/orders/{id}/clear-signals | POST | Clear both customer flags |
//! | /api/orders/{id}/clear-call-waiter | POST | Clear "call waiter" |
//! | /api/orders/{id}/clear-request-bill | POST | Clear "request bill" |
//! | /api/orders/{id}/receipt | GET | HTML receipt download |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/close", post(handler::close))
        .route("/{id}/clear-signals", post(handler::clear_signals))
        .route("/{id}/clear-call-waiter", post(handler::clear_call_waiter))
        .route("/{id}/clear-request-bill", post(handler::clear_request_bill))
        .route("/{id}/receipt", get(handler::receipt))
}
