//! Order models
//!
//! - Orders: one open tab per table code
//! - Items: lines inside an order with their own preparation status
//! - Events: change notifications pushed to staff screens

pub mod event;
pub mod types;

// Re-exports
pub use event::{OrderEvent, OrderEventType};
pub use types::*;
