// storefront/src/orders.rs

//! Order operations: create, status update, and failover import.
//!
//! The `*_action` variants catch every error at the boundary and report it as
//! an [`ActionResult`] instead of propagating it.

use crate::errors::{AppError, Result as AppResult};
use crate::flows::contexts::{CreateOrderCtx, UpdateStatusCtx};
use crate::state::AppState;
use crate::store::OrderFilter;
use storefront_core::{ActionResult, ContextData, FlowOutcome, LifecycleStatus, NewOrder, Order, OrderSource};
use tracing::{instrument, warn};

fn ensure_completed(outcome: FlowOutcome) -> AppResult<()> {
  match outcome {
    FlowOutcome::Completed => Ok(()),
    FlowOutcome::Stopped => Err(AppError::FlowHalted),
  }
}

/// Creates an order from raw fields. Only persistence failures fail the call.
#[instrument(name = "orders::create", skip(app_state, input), fields(source = %default_source), err(Display))]
pub async fn create_order(app_state: &AppState, input: NewOrder, default_source: OrderSource) -> AppResult<Order> {
  let ctx_data = ContextData::new(CreateOrderCtx::new(app_state.clone(), input, default_source));
  ensure_completed(app_state.flows.run(ctx_data.clone()).await?)?;
  ctx_data
    .with(|c| c.order.clone())
    .ok_or_else(|| AppError::Internal("create flow finished without an order".to_string()))
}

/// `{success:true,id}` or `{success:false,error}`.
pub async fn create_order_action(app_state: &AppState, input: NewOrder, default_source: OrderSource) -> ActionResult {
  match create_order(app_state, input, default_source).await {
    Ok(order) => ActionResult::created(order.id),
    Err(e) => {
      warn!(error = %e, "Order creation failed.");
      e.to_action_result()
    }
  }
}

/// Moves order `order_id` to the status named by `raw_status`, subject to the
/// configured transition policy.
#[instrument(name = "orders::update_status", skip(app_state), err(Display))]
pub async fn update_order_status(app_state: &AppState, order_id: &str, raw_status: &str) -> AppResult<Order> {
  let requested: LifecycleStatus = raw_status.parse()?;
  let ctx_data = ContextData::new(UpdateStatusCtx::new(app_state.clone(), order_id, requested));
  ensure_completed(app_state.flows.run(ctx_data.clone()).await?)?;
  ctx_data
    .with(|c| c.updated.clone())
    .ok_or_else(|| AppError::Internal("status flow finished without an order".to_string()))
}

/// `{success:true}` or `{success:false,error}`.
pub async fn update_order_status_action(app_state: &AppState, order_id: &str, raw_status: &str) -> ActionResult {
  match update_order_status(app_state, order_id, raw_status).await {
    Ok(_) => ActionResult::ok(),
    Err(e) => {
      warn!(order_id, error = %e, "Order status update failed.");
      e.to_action_result()
    }
  }
}

/// Re-creates orders recovered from the failover store, one result per input
/// in input order. A failed entry does not stop the rest.
#[instrument(name = "orders::import_failover", skip(app_state, batch), fields(count = batch.len()))]
pub async fn import_failover_orders(app_state: &AppState, batch: Vec<NewOrder>) -> Vec<ActionResult> {
  let mut results = Vec::with_capacity(batch.len());
  for input in batch {
    results.push(create_order_action(app_state, input, OrderSource::Failover).await);
  }
  results
}

pub async fn list_orders(app_state: &AppState, filter: OrderFilter) -> AppResult<Vec<Order>> {
  app_state.store.list(&filter).await
}

pub async fn get_order(app_state: &AppState, order_id: &str) -> AppResult<Order> {
  app_state
    .store
    .get(order_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))
}
