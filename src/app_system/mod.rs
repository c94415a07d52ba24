//! System orchestration, startup, and shutdown logic.

pub mod food_system;
pub mod tracing;
pub mod error;

pub use food_system::*;
pub use self::tracing::setup_tracing;
pub use error::*;
