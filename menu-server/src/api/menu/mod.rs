//! Customer menu API (public)
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /api/menu | GET | Composed menu, remembers `?mesa=` |
//! | /api/menu/table | GET | Table code from query or cookie |
//! | /api/menu/table/{code} | GET | Signal state of one table |
//! | /api/menu/table/{code}/call-waiter | POST | Raise "call waiter" |
//! | /api/menu/table/{code}/request-bill | POST | Raise "request bill" |

mod handler;
pub mod table_code;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_menu))
        .route("/table", get(handler::current_table))
        .route("/table/{code}", get(handler::table_status))
        .route("/table/{code}/call-waiter", post(handler::call_waiter))
        .route("/table/{code}/request-bill", post(handler::request_bill))
}

pub use handler::{MenuResponse, TableContext, TableSignals};
