use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Status of an order. Known states have variants; anything else supplied by
/// an operator is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::OutForDelivery => "OutForDelivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Other(status) => status,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for OrderStatus {
    fn from(status: &str) -> Self {
        match status {
            "Pending" => OrderStatus::Pending,
            "Confirmed" => OrderStatus::Confirmed,
            "Preparing" => OrderStatus::Preparing,
            "OutForDelivery" => OrderStatus::OutForDelivery,
            "Delivered" => OrderStatus::Delivered,
            "Cancelled" => OrderStatus::Cancelled,
            other => OrderStatus::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Balance,
    CreditCard,
    DebitCard,
    Paypal,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Balance => "balance",
            PaymentMethod::CreditCard => "creditCard",
            PaymentMethod::DebitCard => "debitCard",
            PaymentMethod::Paypal => "paypal",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    /// Parses the form values used by the checkout page.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balance" => Ok(PaymentMethod::Balance),
            "creditCard" => Ok(PaymentMethod::CreditCard),
            "debitCard" => Ok(PaymentMethod::DebitCard),
            "paypal" => Ok(PaymentMethod::Paypal),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayeeInfo {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryAddress {
    pub address: String,
    pub region: String,
    pub country: String,
}

/// A priced line as charged, using the catalog price at checkout time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub item_id: String,
    pub item_name: String,
    pub item_price: Decimal,
    pub item_quantity: u32,
}

/// A committed customer order.
///
/// `order_status` is the status at creation; later changes are recorded in
/// order tracking only.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub restaurant_id: String,
    pub menu_items: Vec<OrderLine>,
    pub order_status: OrderStatus,
    pub payee_info: PayeeInfo,
    pub delivery_address: DeliveryAddress,
    pub delivery_method: String,
    pub payment_method: PaymentMethod,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    /// Idempotency key of the checkout attempt that produced the order.
    pub checkout_key: String,
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: String,
    pub restaurant_id: String,
    pub menu_items: Vec<OrderLine>,
    pub payee_info: PayeeInfo,
    pub delivery_address: DeliveryAddress,
    pub delivery_method: String,
    pub payment_method: PaymentMethod,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub checkout_key: String,
}
