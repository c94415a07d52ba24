use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Account, AccountOpen};
use crate::ledger_actor::{LedgerAction, LedgerActionResult, LedgerError};

/// Client for the account ledger.
///
/// Balances only change through [`debit`](Self::debit), [`credit`](Self::credit)
/// and [`refund`](Self::refund); each is one action on the owning account and
/// is therefore atomic with respect to other requests for that account.
#[derive(Clone)]
pub struct LedgerClient {
    inner: ResourceClient<Account>,
}

crate::impl_basic_client!(LedgerClient, Account, LedgerError, account);

impl LedgerClient {
    #[instrument(skip(self))]
    pub async fn open_account(&self, owner_id: String, opening_balance: Decimal) -> Result<String, LedgerError> {
        debug!("Sending request");
        let id = self.inner.insert(owner_id, AccountOpen { opening_balance }).await?;
        info!("Account opened");
        Ok(id)
    }

    /// Current account state; `NotFound` if the owner has no account.
    #[instrument(skip(self))]
    pub async fn get_balance(&self, owner_id: String) -> Result<Account, LedgerError> {
        debug!("Sending request");
        self.inner
            .get(owner_id.clone())
            .await?
            .ok_or(LedgerError::NotFound(owner_id))
    }

    /// Debits `amount` and returns the new balance.
    ///
    /// With a `reference`, the debit can later be returned with [`refund`](Self::refund).
    #[instrument(skip(self))]
    pub async fn debit(
        &self,
        owner_id: String,
        amount: Decimal,
        reference: Option<String>,
    ) -> Result<Decimal, LedgerError> {
        debug!("Sending request");
        match self.inner.perform_action(owner_id, LedgerAction::Debit { amount, reference }).await? {
            LedgerActionResult::Debit { balance } => Ok(balance),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn credit(&self, owner_id: String, amount: Decimal) -> Result<Decimal, LedgerError> {
        debug!("Sending request");
        match self.inner.perform_action(owner_id, LedgerAction::Credit(amount)).await? {
            LedgerActionResult::Credit { balance } => Ok(balance),
            other => Err(unexpected(other)),
        }
    }

    /// Credits back the debit taken under `reference`. Returns the amount
    /// refunded, which is zero if nothing was held.
    #[instrument(skip(self))]
    pub async fn refund(&self, owner_id: String, reference: String) -> Result<Decimal, LedgerError> {
        debug!("Sending request");
        match self.inner.perform_action(owner_id, LedgerAction::Refund(reference)).await? {
            LedgerActionResult::Refund { amount, .. } => Ok(amount),
            other => Err(unexpected(other)),
        }
    }

    /// Drops the reference of a debit whose order was committed. Returns the
    /// amount that was held.
    #[instrument(skip(self))]
    pub async fn settle(&self, owner_id: String, reference: String) -> Result<Decimal, LedgerError> {
        debug!("Sending request");
        match self.inner.perform_action(owner_id, LedgerAction::Settle(reference)).await? {
            LedgerActionResult::Settle { amount } => Ok(amount),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: LedgerActionResult) -> LedgerError {
    LedgerError::StorageUnavailable(format!("Unexpected result: {:?}", result))
}
