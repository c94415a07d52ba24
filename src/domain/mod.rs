pub mod account;
pub mod cart;
pub mod checkout;
pub mod menu;
pub mod order;
pub mod recharge_card;
pub mod tracking;

pub use account::*;
pub use cart::*;
pub use checkout::*;
pub use menu::*;
pub use order::*;
pub use recharge_card::*;
pub use tracking::*;
