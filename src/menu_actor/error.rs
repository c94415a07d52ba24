use rust_decimal::Decimal;
use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuError {
    #[error("Menu item not found: {0}")]
    NotFound(String),
    #[error("Invalid price: {0}")]
    InvalidPrice(Decimal),
    #[error("Menu unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<FrameworkError<MenuError>> for MenuError {
    fn from(err: FrameworkError<MenuError>) -> Self {
        match err {
            FrameworkError::Rejected(err) => err,
            FrameworkError::NotFound(id) => MenuError::NotFound(id),
            other => MenuError::StorageUnavailable(other.to_string()),
        }
    }
}
