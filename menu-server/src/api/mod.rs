//! HTTP API routes
//!
//! - [`health`] - liveness and component checks
//! - [`auth`] - staff login
//! - [`menu`] - public customer menu and table signals
//! - [`categories`], [`dishes`], [`featured_blocks`], [`daily_special`] - catalog admin
//! - [`tables`] - waiter table view and item entry
//! - [`orders`] - order close, signals, receipt
//! - [`order_items`] - item edits, status, annul
//! - [`kitchen`] - kitchen board, live events, alerts

pub mod auth;
pub mod categories;
pub mod daily_special;
pub mod dishes;
pub mod featured_blocks;
pub mod health;
pub mod kitchen;
pub mod menu;
pub mod order_items;
pub mod orders;
pub mod tables;

pub use crate::utils::{AppError, AppResult};
