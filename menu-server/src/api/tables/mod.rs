//! Table API (waiter view)
//!
//! A table is identified only by its code; its state is the open order.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_open).post(handler::open))
        .route("/{code}", get(handler::get_table))
        .route("/{code}/items", post(handler::add_item))
}
