use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{RechargeCard, RechargeCardIssue};
use crate::recharge_actor::{generate_code, CardAction, CardActionResult, RechargeError};

use super::LedgerClient;

/// Issues and redeems recharge cards, crediting redemptions to the ledger.
#[derive(Clone)]
pub struct RechargeClient {
    cards: ResourceClient<RechargeCard>,
    ledger: LedgerClient,
    code_length: usize,
    retry_limit: usize,
}

impl RechargeClient {
    pub fn new(cards: ResourceClient<RechargeCard>, ledger: LedgerClient, code_length: usize, retry_limit: usize) -> Self {
        Self {
            cards,
            ledger,
            code_length,
            retry_limit,
        }
    }

    /// Issues a new unused card worth `value` under a freshly drawn code.
    ///
    /// A code already held by the store is drawn again, at most `retry_limit` times.
    #[instrument(skip(self))]
    pub async fn issue(&self, value: Decimal, referee_id: Option<String>) -> Result<RechargeCard, RechargeError> {
        debug!("Sending request");
        for attempt in 1..=self.retry_limit {
            let code = generate_code(self.code_length);
            let params = RechargeCardIssue {
                value,
                referee_id: referee_id.clone(),
            };
            match self.cards.insert(code, params).await {
                Ok(code) => {
                    info!(%code, "Recharge card issued");
                    return self.get_card(code.clone()).await?.ok_or(RechargeError::NotFound(code));
                }
                Err(FrameworkError::AlreadyExists(_)) => {
                    warn!(attempt, "Card code collision, drawing again");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(RechargeError::CodeSpaceExhausted(self.retry_limit))
    }

    /// Redeems `code` for `redeemer_id` and credits its value to their account.
    ///
    /// Returns the new balance. A card can be redeemed once; if the credit
    /// cannot be applied the card is put back to unused.
    #[instrument(skip(self))]
    pub async fn redeem(&self, code: String, redeemer_id: String) -> Result<Decimal, RechargeError> {
        debug!("Sending request");
        let redeem = CardAction::Redeem {
            redeemer_id: redeemer_id.clone(),
        };
        let (value, previous_referee) = match self.cards.perform_action(code.clone(), redeem).await? {
            CardActionResult::Redeemed { value, previous_referee } => (value, previous_referee),
            other => {
                return Err(RechargeError::StorageUnavailable(format!("Unexpected result: {:?}", other)));
            }
        };

        match self.ledger.credit(redeemer_id, value).await {
            Ok(balance) => {
                info!(%value, "Recharge card redeemed");
                Ok(balance)
            }
            Err(err) => {
                warn!(error = %err, "Credit failed, reverting card");
                if let Err(revert_err) = self
                    .cards
                    .perform_action(code, CardAction::Revert { previous_referee })
                    .await
                {
                    error!(error = %revert_err, "Failed to revert recharge card");
                }
                Err(RechargeError::Ledger(err))
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get_card(&self, code: String) -> Result<Option<RechargeCard>, RechargeError> {
        debug!("Sending request");
        Ok(self.cards.get(code).await?)
    }

    /// All cards, newest first.
    #[instrument(skip(self))]
    pub async fn list_cards(&self) -> Result<Vec<RechargeCard>, RechargeError> {
        debug!("Sending request");
        let mut cards = self.cards.find(|_: &RechargeCard| true).await?;
        cards.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.code.cmp(&b.code)));
        Ok(cards)
    }
}
