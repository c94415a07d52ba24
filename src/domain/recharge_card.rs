use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    Unused,
    Redeemed,
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardStatus::Unused => f.write_str("unused"),
            CardStatus::Redeemed => f.write_str("redeemed"),
        }
    }
}

/// A prepaid code that credits its value to whoever redeems it first.
#[derive(Debug, Clone, PartialEq)]
pub struct RechargeCard {
    pub code: String,
    pub status: CardStatus,
    pub value: Decimal,
    pub referee_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for issuing a card; the code is chosen by the issuer.
#[derive(Debug, Clone)]
pub struct RechargeCardIssue {
    pub value: Decimal,
    pub referee_id: Option<String>,
}
