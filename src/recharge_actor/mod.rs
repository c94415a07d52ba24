//! Recharge cards: code generation, issuance and one-shot redemption.

mod actions;
pub mod code;
pub mod entity;
pub mod error;

pub use actions::*;
pub use code::generate_code;
pub use error::*;
