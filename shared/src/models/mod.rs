//! Catalog data models
//!
//! Shared between menu-server and its browser clients (via API).
//! All IDs are snowflake `i64`, timestamps are Unix milliseconds.

pub mod category;
pub mod daily_special;
pub mod dish;
pub mod featured_block;

// Re-exports
pub use category::*;
pub use daily_special::*;
pub use dish::*;
pub use featured_block::*;
