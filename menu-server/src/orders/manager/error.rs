use crate::db::StorageError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Order already closed: {0}")]
    OrderAlreadyClosed(i64),

    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    #[error("Item {0} comes from the catalog; only quantity and note can change")]
    ItemNotEditable(i64),

    #[error("Table code is required")]
    TableCodeMissing,

    #[error("Dish not found: {0}")]
    DishNotFound(i64),

    #[error("Amount exceeds the maximum of {max}")]
    AmountTooLarge { max: i64 },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl From<redb::CommitError> for ManagerError {
    fn from(err: redb::CommitError) -> Self {
        ManagerError::Storage(StorageError::from(err))
    }
}

impl From<redb::TransactionError> for ManagerError {
    fn from(err: redb::TransactionError) -> Self {
        ManagerError::Storage(StorageError::from(err))
    }
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::Storage(e) => {
                tracing::error!(error = %e, "Order storage error");
                AppError::database(e.to_string())
            }
            ManagerError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
                    .with_detail("id", id)
            }
            ManagerError::OrderAlreadyClosed(id) => AppError::with_message(
                ErrorCode::OrderAlreadyClosed,
                format!("Order {id} is already closed"),
            )
            .with_detail("id", id),
            ManagerError::ItemNotFound(id) => {
                AppError::with_message(ErrorCode::OrderItemNotFound, format!("Item {id} not found"))
                    .with_detail("id", id)
            }
            e @ ManagerError::ItemNotEditable(id) => {
                AppError::with_message(ErrorCode::OrderItemNotEditable, e.to_string())
                    .with_detail("id", id)
            }
            e @ ManagerError::TableCodeMissing => {
                AppError::with_message(ErrorCode::TableCodeMissing, e.to_string())
            }
            ManagerError::DishNotFound(id) => {
                AppError::with_message(ErrorCode::DishNotFound, format!("Dish {id} not found"))
                    .with_detail("id", id)
            }
            e @ ManagerError::AmountTooLarge { max } => {
                AppError::validation(e.to_string()).with_detail("max", max)
            }
            ManagerError::InvalidOperation(msg) => AppError::invalid_request(msg),
        }
    }
}

impl From<crate::db::repository::RepoError> for ManagerError {
    fn from(err: crate::db::repository::RepoError) -> Self {
        use crate::db::repository::RepoError;
        match err {
            RepoError::Storage(e) => ManagerError::Storage(e),
            RepoError::DishNotFound(id) => ManagerError::DishNotFound(id),
            other => ManagerError::InvalidOperation(other.to_string()),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
