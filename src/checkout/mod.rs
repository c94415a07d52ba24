//! Cart to paid order: pricing, payment, order and tracking creation.

pub mod attempt;
pub mod error;
mod pipeline;

pub use attempt::{AttemptStatus, CheckoutAttempt};
pub use error::CheckoutError;
pub use pipeline::CheckoutPipeline;
