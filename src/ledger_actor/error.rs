use rust_decimal::Decimal;
use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    NotFound(String),
    #[error("Account already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),
    #[error("Insufficient account balance: requested {requested}, available {available}")]
    InsufficientFunds { requested: Decimal, available: Decimal },
    #[error("Crediting {amount} would overflow balance {balance}")]
    BalanceOverflow { balance: Decimal, amount: Decimal },
    #[error("Debit already taken under reference {0}")]
    DuplicateReference(String),
    #[error("Ledger unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<FrameworkError<LedgerError>> for LedgerError {
    fn from(err: FrameworkError<LedgerError>) -> Self {
        match err {
            FrameworkError::Rejected(err) => err,
            FrameworkError::NotFound(id) => LedgerError::NotFound(id),
            FrameworkError::AlreadyExists(id) => LedgerError::AlreadyExists(id),
            other => LedgerError::StorageUnavailable(other.to_string()),
        }
    }
}
