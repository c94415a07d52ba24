use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Balance held by one account owner.
///
/// The balance is never written directly; it only moves through the ledger's
/// debit, credit and refund actions, each of which keeps it at or above zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub owner_id: String,
    pub balance: Decimal,
    pub last_updated: DateTime<Utc>,
    /// Debits taken with a reference, kept until refunded so a refund by
    /// reference credits back at most once.
    pub(crate) debits: HashMap<String, Decimal>,
}

impl Account {
    pub fn new(owner_id: impl Into<String>, opening_balance: Decimal) -> Self {
        Self {
            owner_id: owner_id.into(),
            balance: opening_balance,
            last_updated: Utc::now(),
            debits: HashMap::new(),
        }
    }

    /// Amount debited under `reference` and not yet refunded.
    pub fn debited_under(&self, reference: &str) -> Option<Decimal> {
        self.debits.get(reference).copied()
    }
}

/// Payload for opening an account.
#[derive(Debug, Clone, Default)]
pub struct AccountOpen {
    pub opening_balance: Decimal,
}
