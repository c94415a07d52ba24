//! Checkout attempts keyed by the client's idempotency key.

use chrono::{DateTime, Utc};

use crate::actor_framework::Entity;
use crate::domain::OrderSummary;
use super::error::CheckoutError;

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptStatus {
    InProgress,
    Completed(OrderSummary),
    Failed(String),
}

/// Record of one idempotency key: who used it and how the last run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutAttempt {
    pub key: String,
    pub user_id: String,
    pub status: AttemptStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AttemptBegin {
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub enum AttemptAction {
    /// Claims an existing key for another run.
    ///
    /// # Errors
    /// `AttemptConflict` if the key belongs to another user or a run is still in progress.
    Restart { user_id: String },
    Complete(OrderSummary),
    Fail(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Restarted,
    AlreadyCompleted(OrderSummary),
    Recorded,
}

impl Entity for CheckoutAttempt {
    type Id = String;
    type CreateParams = AttemptBegin;
    type Action = AttemptAction;
    type ActionResult = AttemptOutcome;
    type Rejection = CheckoutError;

    const KIND: &'static str = "checkout_attempt";

    fn from_create_params(key: String, params: AttemptBegin) -> Result<Self, CheckoutError> {
        Ok(Self {
            key,
            user_id: params.user_id,
            status: AttemptStatus::InProgress,
            updated_at: Utc::now(),
        })
    }

    fn handle_action(&mut self, action: AttemptAction) -> Result<AttemptOutcome, CheckoutError> {
        match action {
            AttemptAction::Restart { user_id } => {
                if user_id != self.user_id {
                    return Err(CheckoutError::AttemptConflict(self.key.clone()));
                }
                match &self.status {
                    AttemptStatus::InProgress => Err(CheckoutError::AttemptConflict(self.key.clone())),
                    AttemptStatus::Completed(summary) => Ok(AttemptOutcome::AlreadyCompleted(summary.clone())),
                    AttemptStatus::Failed(_) => {
                        self.status = AttemptStatus::InProgress;
                        self.updated_at = Utc::now();
                        Ok(AttemptOutcome::Restarted)
                    }
                }
            }
            AttemptAction::Complete(summary) => {
                self.status = AttemptStatus::Completed(summary);
                self.updated_at = Utc::now();
                Ok(AttemptOutcome::Recorded)
            }
            AttemptAction::Fail(reason) => {
                self.status = AttemptStatus::Failed(reason);
                self.updated_at = Utc::now();
                Ok(AttemptOutcome::Recorded)
            }
        }
    }
}
