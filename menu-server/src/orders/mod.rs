//! Order lifecycle
//!
//! - **manager**: [`OrdersManager`], the only writer of orders and items
//! - **storage**: redb tables for orders, items and the open-order index
//! - **money**: quantity/price coercion and es-AR amount formatting
//!
//! # Data Flow
//!
//! ```text
//! HTTP handler → OrdersManager → redb write txn → commit
//!                      ↓
//!               broadcast OrderEvent → SSE subscribers / kitchen monitor
//! ```

pub mod manager;
pub mod money;
pub mod storage;

// Re-exports
pub use manager::{ManagerError, ManagerResult, OrdersManager};
pub use storage::{OrderStorage, OrderStorageStats};

// Re-export shared types for convenience
pub use shared::order::{OrderEvent, OrderEventType};
