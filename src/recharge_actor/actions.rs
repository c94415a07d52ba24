use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub enum CardAction {
    /// Marks an unused card as redeemed by `redeemer_id`.
    ///
    /// # Errors
    /// Fails with `AlreadyRedeemed` for a card that is not unused.
    Redeem { redeemer_id: String },
    /// Puts a redeemed card back to unused after its credit failed.
    Revert { previous_referee: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardActionResult {
    Redeemed {
        value: Decimal,
        previous_referee: Option<String>,
    },
    Reverted,
}
