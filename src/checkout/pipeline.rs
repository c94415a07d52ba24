use std::fmt;
use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn, Instrument, Span};
use uuid::Uuid;

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::clients::{LedgerClient, MenuClient, OrderClient, TrackingClient};
use crate::domain::{
    Cart, CartLine, CheckoutRequest, OrderCreate, OrderLine, OrderStatus, OrderSummary, PaymentMethod,
};
use super::attempt::{AttemptAction, AttemptBegin, AttemptOutcome, AttemptStatus, CheckoutAttempt};
use super::error::CheckoutError;

/// Where a checkout run currently is.
#[derive(Debug, Clone, PartialEq)]
enum CheckoutState {
    Drafting,
    Pricing,
    Validating,
    Committing,
    Completed,
    Failed(String),
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutState::Drafting => f.write_str("drafting"),
            CheckoutState::Pricing => f.write_str("pricing"),
            CheckoutState::Validating => f.write_str("validating"),
            CheckoutState::Committing => f.write_str("committing"),
            CheckoutState::Completed => f.write_str("completed"),
            CheckoutState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// What the commit step wrote so far, used to undo it.
#[derive(Debug, Default)]
struct Written<'a> {
    order_id: Option<&'a str>,
    tracking: bool,
}

/// Turns a session cart into a paid order.
///
/// Runs `Drafting -> Pricing -> Validating -> Committing -> Completed`. The
/// commit is a saga: debit, order, tracking. If a later step fails the
/// earlier ones are undone (refund by idempotency key, delete by id). A step
/// that does not answer within `step_timeout` counts as failed and is undone
/// as if it had been applied. The run is a spawned task, so it finishes (and
/// compensates) even if the caller stops waiting for it.
#[derive(Clone)]
pub struct CheckoutPipeline {
    ledger: LedgerClient,
    menu: MenuClient,
    orders: OrderClient,
    tracking: TrackingClient,
    attempts: ResourceClient<CheckoutAttempt>,
    step_timeout: Duration,
}

impl CheckoutPipeline {
    pub fn new(
        ledger: LedgerClient,
        menu: MenuClient,
        orders: OrderClient,
        tracking: TrackingClient,
        attempts: ResourceClient<CheckoutAttempt>,
        step_timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            menu,
            orders,
            tracking,
            attempts,
            step_timeout,
        }
    }

    /// Checks out `cart` for `request.user_id`.
    ///
    /// On success the cart is emptied. On failure the cart and the account are
    /// left as they were and the specific reason is returned. Retrying with the
    /// same idempotency key after success returns the first result without
    /// charging again.
    #[instrument(
        skip(self, cart, request),
        fields(user_id = %request.user_id, key = %request.idempotency_key)
    )]
    pub async fn checkout(&self, cart: &mut Cart, request: CheckoutRequest) -> Result<OrderSummary, CheckoutError> {
        let cart_lines = cart.lines().to_vec();
        let user_id = request.user_id.clone();
        let key = request.idempotency_key.clone();

        let pipeline = self.clone();
        let task = tokio::spawn(async move { pipeline.process(cart_lines, request).await }.instrument(Span::current()));

        let result = match task.await {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err, "Checkout task aborted");
                self.recover_aborted(user_id, key).await;
                Err(CheckoutError::StorageUnavailable(format!("checkout aborted: {}", err)))
            }
        };
        if result.is_ok() {
            cart.clear();
        }
        result
    }

    /// Current status of the attempt under `key`, if one was ever made.
    #[instrument(skip(self))]
    pub async fn attempt_status(&self, key: String) -> Result<Option<AttemptStatus>, CheckoutError> {
        debug!("Sending request");
        Ok(self.attempts.get(key).await?.map(|attempt| attempt.status))
    }

    async fn process(&self, cart_lines: Vec<CartLine>, request: CheckoutRequest) -> Result<OrderSummary, CheckoutError> {
        if let Some(summary) = self.begin_attempt(&request).await? {
            info!(order_id = %summary.order_id, "Attempt already completed, replaying result");
            return Ok(summary);
        }

        let result = self.run(&cart_lines, &request).await;
        match &result {
            Ok(summary) => {
                transition(&CheckoutState::Completed);
                info!(order_id = %summary.order_id, total = %summary.total_amount, "Checkout completed");
                self.settle_debit(&request).await;
                self.finish_attempt(&request.idempotency_key, AttemptAction::Complete(summary.clone()))
                    .await;
            }
            Err(err) => {
                transition(&CheckoutState::Failed(err.to_string()));
                warn!(error = %err, retryable = err.is_retryable(), "Checkout failed");
                self.finish_attempt(&request.idempotency_key, AttemptAction::Fail(err.to_string()))
                    .await;
            }
        }
        result
    }

    async fn run(&self, cart_lines: &[CartLine], request: &CheckoutRequest) -> Result<OrderSummary, CheckoutError> {
        transition(&CheckoutState::Drafting);
        let Some(first) = cart_lines.first() else {
            return Err(CheckoutError::EmptyCart);
        };
        let restaurant_id = first.restaurant_id.clone();

        transition(&CheckoutState::Pricing);
        let mut lines = Vec::with_capacity(cart_lines.len());
        for line in cart_lines {
            let price = self
                .bounded("pricing", self.menu.find_price(line.restaurant_id.clone(), line.item_id.clone()))
                .await?
                .ok_or_else(|| CheckoutError::ItemUnavailable {
                    restaurant_id: line.restaurant_id.clone(),
                    item_id: line.item_id.clone(),
                })?;
            if price != line.unit_price {
                debug!(item_id = %line.item_id, cart_price = %line.unit_price, %price, "Repriced from catalog");
            }
            lines.push(OrderLine {
                item_id: line.item_id.clone(),
                item_name: line.item_name.clone(),
                item_price: price,
                item_quantity: line.quantity,
            });
        }
        let total = lines
            .iter()
            .try_fold(Decimal::ZERO, |total, line| {
                line.item_price
                    .checked_mul(Decimal::from(line.item_quantity))
                    .and_then(|subtotal| total.checked_add(subtotal))
            })
            .ok_or_else(|| CheckoutError::Invalid("order total is too large".to_string()))?;

        transition(&CheckoutState::Validating);
        match request.payment_method {
            PaymentMethod::Balance => {
                let account = self
                    .bounded("validating", self.ledger.get_balance(request.user_id.clone()))
                    .await?;
                if account.balance < total {
                    return Err(CheckoutError::InsufficientFunds {
                        required: total,
                        available: account.balance,
                    });
                }
            }
            other => return Err(CheckoutError::UnsupportedPaymentMethod(other.to_string())),
        }

        transition(&CheckoutState::Committing);
        let order_id = self.commit(request, restaurant_id, lines, total).await?;

        Ok(OrderSummary {
            order_id,
            total_amount: total,
        })
    }

    /// Debit, then order, then tracking. Undoes what was written if a step fails.
    async fn commit(
        &self,
        request: &CheckoutRequest,
        restaurant_id: String,
        lines: Vec<OrderLine>,
        total: Decimal,
    ) -> Result<String, CheckoutError> {
        let user_id = &request.user_id;
        let key = &request.idempotency_key;

        if let Err(err) = self
            .bounded(
                "debit",
                self.ledger.debit(user_id.clone(), total, Some(key.clone())),
            )
            .await
        {
            // A refused debit changed nothing; an unanswered one may have gone through.
            if err.is_retryable() {
                self.compensate(request, Written::default()).await;
            }
            return Err(err);
        }
        debug!(%total, "Debit applied");

        let order_id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let order = OrderCreate {
            user_id: user_id.clone(),
            restaurant_id,
            menu_items: lines,
            payee_info: request.payee_info.clone(),
            delivery_address: request.delivery_address.clone(),
            delivery_method: request.delivery_method.clone(),
            payment_method: request.payment_method,
            total_amount: total,
            created_at,
            checkout_key: key.clone(),
        };
        if let Err(err) = self
            .bounded("order", self.orders.place_order(order_id.clone(), order))
            .await
        {
            let written = Written {
                order_id: err.is_retryable().then_some(order_id.as_str()),
                tracking: false,
            };
            self.compensate(request, written).await;
            return Err(err);
        }

        if let Err(err) = self
            .bounded(
                "tracking",
                self.tracking
                    .create(order_id.clone(), user_id.clone(), OrderStatus::Pending, created_at),
            )
            .await
        {
            let written = Written {
                order_id: Some(order_id.as_str()),
                tracking: err.is_retryable(),
            };
            self.compensate(request, written).await;
            return Err(err);
        }

        Ok(order_id)
    }

    /// Undoes a partial commit in reverse order. Failures here are logged and
    /// leave the original error as the outcome.
    async fn compensate(&self, request: &CheckoutRequest, written: Written<'_>) {
        warn!(order_id = ?written.order_id, tracking = written.tracking, "Compensating partial commit");

        if written.tracking {
            if let Some(order_id) = written.order_id {
                match self.bounded("undo tracking", self.tracking.delete_tracking(order_id.to_string())).await {
                    Ok(()) | Err(CheckoutError::NotFound(_)) => {}
                    Err(err) => error!(%order_id, error = %err, "Failed to remove tracking"),
                }
            }
        }

        if let Some(order_id) = written.order_id {
            match self.bounded("undo order", self.orders.delete_order(order_id.to_string())).await {
                Ok(()) | Err(CheckoutError::NotFound(_)) => {}
                Err(err) => error!(%order_id, error = %err, "Failed to remove order"),
            }
        }

        let refund = self.ledger.refund(request.user_id.clone(), request.idempotency_key.clone());
        match self.bounded("refund", refund).await {
            Ok(amount) => info!(%amount, "Debit refunded"),
            Err(err) => error!(error = %err, "Failed to refund debit"),
        }
    }

    /// The order is committed; its debit will not be refunded.
    async fn settle_debit(&self, request: &CheckoutRequest) {
        let settle = self.ledger.settle(request.user_id.clone(), request.idempotency_key.clone());
        if let Err(err) = self.bounded("settle", settle).await {
            warn!(error = %err, "Debit reference kept");
        }
    }

    /// Cleans up after a run that ended without reporting: returns any debit
    /// still held under the key and marks the attempt failed so it can be retried.
    async fn recover_aborted(&self, user_id: String, key: String) {
        if let Err(err) = self.bounded("refund", self.ledger.refund(user_id, key.clone())).await {
            error!(error = %err, "Failed to refund debit");
        }
        self.finish_attempt(&key, AttemptAction::Fail("checkout aborted".to_string())).await;
    }

    /// Claims the idempotency key. `Some` carries the result of an earlier
    /// completed run under the same key.
    async fn begin_attempt(&self, request: &CheckoutRequest) -> Result<Option<OrderSummary>, CheckoutError> {
        let key = request.idempotency_key.clone();
        let begin = AttemptBegin {
            user_id: request.user_id.clone(),
        };
        match self.attempts.insert(key.clone(), begin).await {
            Ok(_) => Ok(None),
            Err(FrameworkError::AlreadyExists(_)) => {
                let restart = AttemptAction::Restart {
                    user_id: request.user_id.clone(),
                };
                match self.attempts.perform_action(key, restart).await? {
                    AttemptOutcome::Restarted => {
                        debug!("Restarting failed attempt");
                        Ok(None)
                    }
                    AttemptOutcome::AlreadyCompleted(summary) => Ok(Some(summary)),
                    AttemptOutcome::Recorded => Err(CheckoutError::StorageUnavailable(
                        "unexpected attempt outcome".to_string(),
                    )),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn finish_attempt(&self, key: &str, outcome: AttemptAction) {
        if let Err(err) = self.attempts.perform_action(key.to_string(), outcome).await {
            error!(key, error = %err, "Failed to record attempt outcome");
        }
    }

    /// Runs one step under the step timeout.
    async fn bounded<T, E>(&self, step: &str, fut: impl Future<Output = Result<T, E>>) -> Result<T, CheckoutError>
    where
        CheckoutError: From<E>,
    {
        match tokio::time::timeout(self.step_timeout, fut).await {
            Ok(result) => result.map_err(CheckoutError::from),
            Err(_) => {
                warn!(step, timeout_ms = self.step_timeout.as_millis() as u64, "Step timed out");
                Err(CheckoutError::Timeout(step.to_string()))
            }
        }
    }
}

fn transition(state: &CheckoutState) {
    debug!(state = %state, "Checkout state");
}
