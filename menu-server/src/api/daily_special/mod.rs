//! Dish of the day API
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /api/daily-special | GET | Stored configuration, `null` when never set |
//! | /api/daily-special | PUT | Merge-upsert |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/daily-special", get(handler::get).put(handler::set))
}
