use rust_decimal::Decimal;

/// Balance mutations for Account entities.
///
/// Each action is applied inside the ledger actor's mailbox loop, so the
/// balance check and the write happen as one step.
#[derive(Debug, Clone)]
pub enum LedgerAction {
    /// Takes `amount` from the balance.
    ///
    /// # Errors
    /// Fails if the balance is below `amount`, or if `reference` is already
    /// holding an unrefunded debit.
    Debit {
        amount: Decimal,
        reference: Option<String>,
    },
    /// Adds `amount` to the balance.
    Credit(Decimal),
    /// Returns the debit taken under a reference, once.
    Refund(String),
    /// Forgets the reference of a debit that will never be refunded.
    Settle(String),
}

/// Results from LedgerActions - variants match 1:1 with LedgerAction
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerActionResult {
    Debit { balance: Decimal },
    Credit { balance: Decimal },
    /// `amount` is zero when nothing was held under the reference.
    Refund { amount: Decimal, balance: Decimal },
    /// `amount` is zero when nothing was held under the reference.
    Settle { amount: Decimal },
}
