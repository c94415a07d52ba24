use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{error, info};

use crate::actor_framework::ResourceActor;
use crate::checkout::{CheckoutAttempt, CheckoutPipeline};
use crate::clients::{LedgerClient, MenuClient, OrderClient, RechargeClient, TrackingClient};
use crate::config::Config;
use crate::domain::{Account, MenuItem, Order, OrderTracking, RechargeCard};
use super::SystemError;

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct FoodSystem {
    pub ledger: LedgerClient,
    pub menu: MenuClient,
    pub orders: OrderClient,
    pub tracking: TrackingClient,
    pub recharge: RechargeClient,
    pub checkout: CheckoutPipeline,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl FoodSystem {
    pub fn new(config: &Config) -> Self {
        let buffer = config.mailbox_size;

        // 1. Accounts, keyed by owner id
        let (ledger_actor, ledger_resource_client) = ResourceActor::<Account>::keyed(buffer);
        let ledger = LedgerClient::new(ledger_resource_client);
        let ledger_handle = tokio::spawn(ledger_actor.run());

        // 2. Menu items get sequential ids
        let item_id_counter = Arc::new(AtomicU64::new(1));
        let next_item_id = move || {
            let id = item_id_counter.fetch_add(1, Ordering::SeqCst);
            format!("item_{}", id)
        };
        let (menu_actor, menu_resource_client) = ResourceActor::<MenuItem>::new(buffer, next_item_id);
        let menu = MenuClient::new(menu_resource_client);
        let menu_handle = tokio::spawn(menu_actor.run());

        // 3. Orders and tracking, keyed by the order id checkout chooses
        let (order_actor, order_resource_client) = ResourceActor::<Order>::keyed(buffer);
        let orders = OrderClient::new(order_resource_client);
        let order_handle = tokio::spawn(order_actor.run());

        let (tracking_actor, tracking_resource_client) = ResourceActor::<OrderTracking>::keyed(buffer);
        let tracking = TrackingClient::new(tracking_resource_client);
        let tracking_handle = tokio::spawn(tracking_actor.run());

        // 4. Recharge cards, keyed by code
        let (card_actor, card_resource_client) = ResourceActor::<RechargeCard>::keyed(buffer);
        let recharge = RechargeClient::new(
            card_resource_client,
            ledger.clone(),
            config.card_code_length,
            config.card_code_retries,
        );
        let card_handle = tokio::spawn(card_actor.run());

        // 5. Checkout attempts, keyed by idempotency key
        let (attempt_actor, attempt_resource_client) = ResourceActor::<CheckoutAttempt>::keyed(buffer);
        let attempt_handle = tokio::spawn(attempt_actor.run());
        let checkout = CheckoutPipeline::new(
            ledger.clone(),
            menu.clone(),
            orders.clone(),
            tracking.clone(),
            attempt_resource_client,
            config.step_timeout,
        );

        info!(mailbox_size = buffer, step_timeout_ms = config.step_timeout.as_millis() as u64, "Food system started");

        Self {
            ledger,
            menu,
            orders,
            tracking,
            recharge,
            checkout,
            handles: vec![
                ledger_handle,
                menu_handle,
                order_handle,
                tracking_handle,
                card_handle,
                attempt_handle,
            ],
        }
    }

    /// Closes every mailbox and waits for the actors to drain.
    ///
    /// Clones of the clients held elsewhere keep their actor alive, so callers
    /// must drop those first.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        drop(self.checkout);
        drop(self.recharge);
        drop(self.tracking);
        drop(self.orders);
        drop(self.menu);
        drop(self.ledger);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::TaskFailed(e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
