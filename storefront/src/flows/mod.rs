// storefront/src/flows/mod.rs

//! Order operations expressed as named-step flows.
//!
//! Persistence steps are required; notification, email, and cache
//! invalidation steps are best-effort so their failures never undo a write.

use crate::errors::AppError;
use storefront_core::FlowRegistry;

pub mod common_steps;
pub mod contexts;
pub mod create_order_flow;
pub mod update_status_flow;

/// Registers every order flow with `registry`. Called once per `AppState`.
pub fn register_all_flows(registry: &FlowRegistry<AppError>) {
  tracing::debug!("Registering order flows...");
  registry.register(create_order_flow::build_create_order_flow());
  registry.register(update_status_flow::build_update_status_flow());
  tracing::debug!("Order flows registered.");
}
