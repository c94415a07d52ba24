//! Typed clients over the resource actors.

#[macro_use]
mod macros;
mod ledger_client;
mod menu_client;
mod order_client;
mod recharge_client;
mod tracking_client;

pub use ledger_client::LedgerClient;
pub use menu_client::MenuClient;
pub use order_client::OrderClient;
pub use recharge_client::RechargeClient;
pub use tracking_client::TrackingClient;
