// storefront/src/flows/update_status_flow.rs

use crate::errors::AppError;
use crate::flows::common_steps::{lacks_customer_email, revalidate_order_views, send_order_email};
use crate::flows::contexts::UpdateStatusCtx;
use std::sync::Arc;
use storefront_core::{ContextData, Flow, FlowControl, StatusChange, StepMode};
use tracing::info;

pub const LOAD_ORDER: &str = "load_order";
pub const CHECK_TRANSITION: &str = "check_transition";
pub const WRITE_STATUS: &str = "write_status";
pub const SEND_STATUS_EMAIL: &str = "send_status_email";
pub const REVALIDATE_ORDER_VIEWS: &str = "revalidate_order_views";

pub fn build_update_status_flow() -> Flow<UpdateStatusCtx, AppError> {
  let mut flow = Flow::<UpdateStatusCtx, AppError>::new(
    "update_order_status",
    &[
      (LOAD_ORDER, StepMode::Required),
      (CHECK_TRANSITION, StepMode::Required),
      (WRITE_STATUS, StepMode::Required),
      (SEND_STATUS_EMAIL, StepMode::BestEffort),
      (REVALIDATE_ORDER_VIEWS, StepMode::BestEffort),
    ],
  );

  flow.on_step(LOAD_ORDER, |ctx_data: ContextData<UpdateStatusCtx>| {
    Box::pin(async move {
      let (order_id, store) = ctx_data.with(|c| (c.order_id.clone(), c.app_state.store.clone()));
      let order = store
        .get(&order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;
      ctx_data.write().current = Some(order);
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.on_step(CHECK_TRANSITION, |ctx_data: ContextData<UpdateStatusCtx>| {
    Box::pin(async move {
      let (from, to, policy) = {
        let guard = ctx_data.read();
        let from = guard
          .current
          .as_ref()
          .map(|o| o.status)
          .ok_or_else(|| AppError::Internal("order was not loaded".to_string()))?;
        (from, guard.requested, guard.app_state.config.transitions)
      };
      policy.check(from, to)?;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  // Both stored status fields change in this one write.
  flow.on_step(WRITE_STATUS, |ctx_data: ContextData<UpdateStatusCtx>| {
    Box::pin(async move {
      let (order_id, requested, store) =
        ctx_data.with(|c| (c.order_id.clone(), c.requested, c.app_state.store.clone()));
      let change = StatusChange::now(requested);
      if !store.update_status(&order_id, change).await? {
        return Err(AppError::NotFound(format!("Order {} not found", order_id)));
      }
      let previous = ctx_data.update(|c| {
        let previous = c.current.as_ref().map(|o| o.status);
        c.updated = c.current.clone().map(|mut order| {
          change.apply(&mut order);
          order
        });
        previous
      });
      info!(order_id = %order_id, from = ?previous, to = %requested, "Order status updated.");
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.set_skip_condition(
    SEND_STATUS_EMAIL,
    Some(Arc::new(|ctx_data: ContextData<UpdateStatusCtx>| {
      ctx_data.with(|c| lacks_customer_email(c.updated.as_ref()))
    })),
  );
  flow.on_step(SEND_STATUS_EMAIL, |ctx_data: ContextData<UpdateStatusCtx>| {
    Box::pin(async move {
      let (order, app_state) = ctx_data.with(|c| (c.updated.clone(), c.app_state.clone()));
      let order = order.ok_or_else(|| AppError::Internal("order status was not written".to_string()))?;
      let provider = send_order_email(&app_state, &order).await?;
      ctx_data.write().email_sent_via = Some(provider);
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.on_step(REVALIDATE_ORDER_VIEWS, |ctx_data: ContextData<UpdateStatusCtx>| {
    Box::pin(async move {
      let (app_state, status) = ctx_data.with(|c| (c.app_state.clone(), c.requested));
      revalidate_order_views(&app_state, Some(status)).await?;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow
}
