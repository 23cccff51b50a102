//! Shared types for the menu service
//!
//! Catalog and order models, the unified error system and small
//! time/ID helpers used by the server and its clients.

pub mod error;
pub mod models;
pub mod order;
pub mod types;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
