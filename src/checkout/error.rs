use rust_decimal::Decimal;
use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::ledger_actor::LedgerError;
use crate::menu_actor::MenuError;
use crate::order_actor::OrderError;
use crate::tracking_actor::TrackingError;

/// Why a checkout attempt did not complete.
///
/// The `Display` text is the message shown to the customer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("Item {item_id} is no longer available from restaurant {restaurant_id}")]
    ItemUnavailable { restaurant_id: String, item_id: String },
    #[error("Insufficient account balance: order total is {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },
    #[error("Payment method {0} is not supported")]
    UnsupportedPaymentMethod(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Order {0} already exists")]
    DuplicateOrder(String),
    #[error("Checkout attempt {0} conflicts with another attempt")]
    AttemptConflict(String),
    #[error("Checkout refused: {0}")]
    Invalid(String),
    #[error("Service temporarily unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Checkout timed out during {0}")]
    Timeout(String),
}

impl CheckoutError {
    /// Whether re-running the whole attempt with the same idempotency key may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckoutError::StorageUnavailable(_) | CheckoutError::Timeout(_))
    }
}

impl From<FrameworkError<CheckoutError>> for CheckoutError {
    fn from(err: FrameworkError<CheckoutError>) -> Self {
        match err {
            FrameworkError::Rejected(err) => err,
            FrameworkError::NotFound(key) => CheckoutError::NotFound(key),
            FrameworkError::AlreadyExists(key) => CheckoutError::AttemptConflict(key),
            other => CheckoutError::StorageUnavailable(other.to_string()),
        }
    }
}

impl From<LedgerError> for CheckoutError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(owner) => CheckoutError::NotFound(format!("account {}", owner)),
            LedgerError::InsufficientFunds { requested, available } => CheckoutError::InsufficientFunds {
                required: requested,
                available,
            },
            // A payment under this key is still held from an earlier attempt.
            LedgerError::DuplicateReference(key) => CheckoutError::AttemptConflict(key),
            LedgerError::StorageUnavailable(reason) => CheckoutError::StorageUnavailable(reason),
            other => CheckoutError::Invalid(other.to_string()),
        }
    }
}

impl From<MenuError> for CheckoutError {
    fn from(err: MenuError) -> Self {
        match err {
            MenuError::NotFound(item) => CheckoutError::NotFound(format!("menu item {}", item)),
            MenuError::StorageUnavailable(reason) => CheckoutError::StorageUnavailable(reason),
            other => CheckoutError::Invalid(other.to_string()),
        }
    }
}

impl From<OrderError> for CheckoutError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => CheckoutError::NotFound(format!("order {}", id)),
            OrderError::AlreadyExists(id) => CheckoutError::DuplicateOrder(id),
            OrderError::ValidationError(reason) => CheckoutError::Invalid(reason),
            OrderError::StorageUnavailable(reason) => CheckoutError::StorageUnavailable(reason),
        }
    }
}

impl From<TrackingError> for CheckoutError {
    fn from(err: TrackingError) -> Self {
        match err {
            TrackingError::NotFound(id) => CheckoutError::NotFound(format!("tracking for order {}", id)),
            TrackingError::DuplicateOrder(id) => CheckoutError::DuplicateOrder(id),
            TrackingError::StorageUnavailable(reason) => CheckoutError::StorageUnavailable(reason),
        }
    }
}
