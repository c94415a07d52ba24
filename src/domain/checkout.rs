use std::fmt;

use rust_decimal::Decimal;

use super::{DeliveryAddress, PayeeInfo, PaymentMethod};

/// Checkout form fields supplied by the presentation layer.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub user_id: String,
    /// Client-chosen token for this attempt. Retrying with the same key never
    /// charges twice.
    pub idempotency_key: String,
    pub payee_info: PayeeInfo,
    pub delivery_address: DeliveryAddress,
    pub delivery_method: String,
    pub payment_method: PaymentMethod,
}

/// What a completed checkout hands back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub order_id: String,
    pub total_amount: Decimal,
}

impl fmt::Display for OrderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order created, total price: {}", self.total_amount)
    }
}
