use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{OrderTracking, StatusEntry, TrackingCreate};
use super::actions::TrackingAction;
use super::error::TrackingError;

impl Entity for OrderTracking {
    type Id = String;
    type CreateParams = TrackingCreate;
    type Action = TrackingAction;
    type ActionResult = StatusEntry;
    type Rejection = TrackingError;

    const KIND: &'static str = "order_tracking";

    /// Seeds the history with the initial status at the order's creation time.
    fn from_create_params(order_id: String, params: TrackingCreate) -> Result<Self, TrackingError> {
        Ok(Self {
            order_id,
            customer_id: params.customer_id,
            status_history: vec![StatusEntry {
                status: params.initial_status,
                update_time: params.created_at,
            }],
        })
    }

    fn handle_action(&mut self, action: TrackingAction) -> Result<StatusEntry, TrackingError> {
        match action {
            TrackingAction::AppendStatus(status) => {
                // Never go back in time, even if the wall clock does.
                let now = Utc::now();
                let update_time = self
                    .status_history
                    .last()
                    .map_or(now, |last| last.update_time.max(now));
                let entry = StatusEntry { status, update_time };
                self.status_history.push(entry.clone());
                Ok(entry)
            }
        }
    }
}
