use rust_decimal::Decimal;
use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::ledger_actor::LedgerError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RechargeError {
    #[error("Recharge card not found: {0}")]
    NotFound(String),
    #[error("Recharge card {0} has already been redeemed")]
    AlreadyRedeemed(String),
    #[error("Recharge card {0} is not redeemed")]
    NotRedeemed(String),
    #[error("Invalid card value: {0}")]
    InvalidValue(Decimal),
    #[error("No free card code after {0} attempts")]
    CodeSpaceExhausted(usize),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Recharge card store unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<FrameworkError<RechargeError>> for RechargeError {
    fn from(err: FrameworkError<RechargeError>) -> Self {
        match err {
            FrameworkError::Rejected(err) => err,
            FrameworkError::NotFound(code) => RechargeError::NotFound(code),
            other => RechargeError::StorageUnavailable(other.to_string()),
        }
    }
}
