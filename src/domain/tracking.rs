use chrono::{DateTime, Utc};

use super::OrderStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct StatusEntry {
    pub status: OrderStatus,
    pub update_time: DateTime<Utc>,
}

/// Append-only status history of one order, keyed by order id.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTracking {
    pub order_id: String,
    pub customer_id: String,
    pub status_history: Vec<StatusEntry>,
}

impl OrderTracking {
    pub fn current_status(&self) -> Option<&OrderStatus> {
        self.status_history.last().map(|entry| &entry.status)
    }
}

/// Payload seeding a tracking entry at order creation.
#[derive(Debug, Clone)]
pub struct TrackingCreate {
    pub customer_id: String,
    pub initial_status: OrderStatus,
    pub created_at: DateTime<Utc>,
}
