use chrono::Utc;
use rust_decimal::Decimal;

use crate::actor_framework::Entity;
use crate::domain::{CardStatus, RechargeCard, RechargeCardIssue};
use super::actions::{CardAction, CardActionResult};
use super::error::RechargeError;

impl Entity for RechargeCard {
    type Id = String;
    type CreateParams = RechargeCardIssue;
    type Action = CardAction;
    type ActionResult = CardActionResult;
    type Rejection = RechargeError;

    const KIND: &'static str = "recharge_card";

    fn from_create_params(code: String, params: RechargeCardIssue) -> Result<Self, RechargeError> {
        if params.value <= Decimal::ZERO {
            return Err(RechargeError::InvalidValue(params.value));
        }
        Ok(Self {
            code,
            status: CardStatus::Unused,
            value: params.value,
            referee_id: params.referee_id,
            created_at: Utc::now(),
        })
    }

    fn handle_action(&mut self, action: CardAction) -> Result<CardActionResult, RechargeError> {
        match action {
            CardAction::Redeem { redeemer_id } => {
                if self.status != CardStatus::Unused {
                    return Err(RechargeError::AlreadyRedeemed(self.code.clone()));
                }
                self.status = CardStatus::Redeemed;
                let previous_referee = self.referee_id.replace(redeemer_id);
                Ok(CardActionResult::Redeemed {
                    value: self.value,
                    previous_referee,
                })
            }
            CardAction::Revert { previous_referee } => {
                if self.status != CardStatus::Redeemed {
                    return Err(RechargeError::NotRedeemed(self.code.clone()));
                }
                self.status = CardStatus::Unused;
                self.referee_id = previous_referee;
                Ok(CardActionResult::Reverted)
            }
        }
    }
}
