//! Account balances: atomic debit, credit and refund-by-reference.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
