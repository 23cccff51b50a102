//! Kitchen API
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /api/kitchen/board | GET | Status columns and table groups |
//! | /api/kitchen/events | GET | Order events as server-sent events |
//! | /api/kitchen/alert | GET | Alert currently held |
//! | /api/kitchen/alert/{order_id}/dismiss | POST | Release the held alert |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/kitchen", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/board", get(handler::board))
        .route("/events", get(handler::events))
        .route("/alert", get(handler::current_alert))
        .route("/alert/{order_id}/dismiss", post(handler::dismiss_alert))
}
