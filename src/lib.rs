//! Food ordering core: menus, carts, balance checkout, order tracking and
//! recharge cards, each record kind owned by its own resource actor.

pub mod actor_framework;
pub mod app_system;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod domain;

pub mod ledger_actor;
pub mod menu_actor;
pub mod order_actor;
pub mod recharge_actor;
pub mod tracking_actor;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;
