//! Input validation helpers
//!
//! Length limits and checks applied by handlers before any write.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};

pub use crate::orders::money::MAX_PRICE;

/// Category, dish and block names
pub const MAX_NAME_LEN: usize = 200;

/// Item notes and annul reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Dish and block descriptions
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Table codes and labels
pub const MAX_TABLE_CODE_LEN: usize = 64;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords before hashing
pub const MAX_PASSWORD_LEN: usize = 128;

/// Image URLs
pub const MAX_URL_LEN: usize = 2048;

/// Largest quantity accepted on one line
pub const MAX_QUANTITY: f64 = 999.0;

/// Required string: non-blank and within `max_len` characters
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    validate_len(value, field, max_len)
}

/// Optional string: within `max_len` characters when present
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_len(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Prices must be non-negative and at most [`MAX_PRICE`]
pub fn validate_price(price: Decimal, field: &str) -> Result<(), AppError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(
            AppError::with_message(ErrorCode::DishInvalidPrice, format!("{field} must not be negative"))
                .with_detail("field", field),
        );
    }
    if price > Decimal::from(MAX_PRICE) {
        return Err(AppError::with_message(
            ErrorCode::DishInvalidPrice,
            format!("{field} must not exceed {MAX_PRICE}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Optional price, checked when present
pub fn validate_optional_price(price: Option<Decimal>, field: &str) -> Result<(), AppError> {
    match price {
        Some(p) => validate_price(p, field),
        None => Ok(()),
    }
}

/// Explicit quantities must be positive and bounded
pub fn validate_quantity(quantity: Option<f64>) -> Result<(), AppError> {
    match quantity {
        Some(q) if !q.is_finite() || q < 1.0 || q > MAX_QUANTITY => Err(AppError::validation(
            format!("quantity must be between 1 and {MAX_QUANTITY}"),
        )),
        _ => Ok(()),
    }
}
