use crate::domain::OrderStatus;

#[derive(Debug, Clone)]
pub enum TrackingAction {
    /// Appends a status. No transition rules apply; operators may record any status.
    AppendStatus(OrderStatus),
}
