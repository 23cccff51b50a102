//! Utilities
//!
//! - [`logger`] - tracing subscriber setup
//! - [`validation`] - request payload checks shared by handlers

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
