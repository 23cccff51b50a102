//! Order item API

mod handler;

use axum::{
    Router,
    routing::{post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/order-items", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/status", put(handler::set_status))
        .route("/{id}/annul", post(handler::annul))
}
