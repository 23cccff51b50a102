//! Unified error system for the menu service
//!
//! - [`ErrorCode`]: numeric codes shared with browser clients
//! - [`ErrorCategory`]: classification by code range
//! - [`AppError`]: error carried across the HTTP boundary
//! - [`ApiResponse`]: JSON envelope for error bodies and bare acknowledgements
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::with_message(ErrorCode::OrderAlreadyClosed, "Order 42 is closed")
//!     .with_detail("order_id", 42);
//! let body = ApiResponse::<()>::error(&err);
//! assert_eq!(body.code, Some(4002));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
