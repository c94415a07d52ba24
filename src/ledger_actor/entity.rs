use chrono::Utc;
use rust_decimal::Decimal;

use crate::actor_framework::Entity;
use crate::domain::{Account, AccountOpen};
use super::actions::{LedgerAction, LedgerActionResult};
use super::error::LedgerError;

impl Entity for Account {
    type Id = String;
    type CreateParams = AccountOpen;
    type Action = LedgerAction;
    type ActionResult = LedgerActionResult;
    type Rejection = LedgerError;

    const KIND: &'static str = "account";

    /// Opens an account for `id` (the owner's user id).
    fn from_create_params(id: String, params: AccountOpen) -> Result<Self, LedgerError> {
        if params.opening_balance < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(params.opening_balance));
        }
        Ok(Account::new(id, params.opening_balance))
    }

    /// Handles balance mutations.
    ///
    /// # Actions
    /// - `Debit`: fails with `InsufficientFunds` unless `balance >= amount`
    /// - `Credit`: succeeds for a non-negative amount the balance can hold
    /// - `Refund(reference)`: credits back what was debited under `reference`
    /// - `Settle(reference)`: drops the reference, the debit stays
    ///
    /// # Errors
    /// Negative amounts are refused with `InvalidAmount`, credits past the
    /// largest representable balance with `BalanceOverflow`.
    fn handle_action(&mut self, action: LedgerAction) -> Result<LedgerActionResult, LedgerError> {
        match action {
            LedgerAction::Debit { amount, reference } => {
                ensure_non_negative(amount)?;
                if let Some(reference) = &reference {
                    if self.debits.contains_key(reference) {
                        return Err(LedgerError::DuplicateReference(reference.clone()));
                    }
                }
                if self.balance < amount {
                    return Err(LedgerError::InsufficientFunds {
                        requested: amount,
                        available: self.balance,
                    });
                }
                self.balance -= amount;
                if let Some(reference) = reference {
                    self.debits.insert(reference, amount);
                }
                self.last_updated = Utc::now();
                Ok(LedgerActionResult::Debit { balance: self.balance })
            }
            LedgerAction::Credit(amount) => {
                ensure_non_negative(amount)?;
                self.add_to_balance(amount)?;
                self.last_updated = Utc::now();
                Ok(LedgerActionResult::Credit { balance: self.balance })
            }
            LedgerAction::Refund(reference) => {
                let amount = self.debits.get(&reference).copied().unwrap_or(Decimal::ZERO);
                if !amount.is_zero() {
                    self.add_to_balance(amount)?;
                    self.debits.remove(&reference);
                    self.last_updated = Utc::now();
                }
                Ok(LedgerActionResult::Refund { amount, balance: self.balance })
            }
            LedgerAction::Settle(reference) => {
                let amount = self.debits.remove(&reference).unwrap_or(Decimal::ZERO);
                Ok(LedgerActionResult::Settle { amount })
            }
        }
    }
}

impl Account {
    fn add_to_balance(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { balance: self.balance, amount })?;
        Ok(())
    }
}

fn ensure_non_negative(amount: Decimal) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(())
}
