use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{OrderStatus, OrderTracking, StatusEntry, TrackingCreate};
use crate::tracking_actor::{TrackingAction, TrackingError};

/// Client for order tracking. One history per order id.
#[derive(Clone)]
pub struct TrackingClient {
    inner: ResourceClient<OrderTracking>,
}

crate::impl_basic_client!(TrackingClient, OrderTracking, TrackingError, tracking);

impl TrackingClient {
    /// Starts the history of `order_id`; `DuplicateOrder` if it already has one.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        order_id: String,
        customer_id: String,
        initial_status: OrderStatus,
        created_at: DateTime<Utc>,
    ) -> Result<(), TrackingError> {
        debug!("Sending request");
        let params = TrackingCreate {
            customer_id,
            initial_status,
            created_at,
        };
        self.inner.insert(order_id, params).await?;
        info!("Tracking started");
        Ok(())
    }

    /// Status history ordered by time, oldest first.
    #[instrument(skip(self))]
    pub async fn get_history(&self, order_id: String) -> Result<Vec<StatusEntry>, TrackingError> {
        debug!("Sending request");
        let tracking = self
            .inner
            .get(order_id.clone())
            .await?
            .ok_or(TrackingError::NotFound(order_id))?;
        let mut history = tracking.status_history;
        history.sort_by_key(|entry| entry.update_time);
        Ok(history)
    }

    #[instrument(skip(self))]
    pub async fn append_status(&self, order_id: String, status: OrderStatus) -> Result<StatusEntry, TrackingError> {
        debug!("Sending request");
        Ok(self.inner.perform_action(order_id, TrackingAction::AppendStatus(status)).await?)
    }
}
