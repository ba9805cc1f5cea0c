// storefront/src/flows/create_order_flow.rs

use crate::errors::AppError;
use crate::flows::common_steps::{lacks_customer_email, revalidate_order_views, send_order_email};
use crate::flows::contexts::CreateOrderCtx;
use chrono::Utc;
use std::sync::Arc;
use storefront_core::{ContextData, Flow, FlowControl, Order, StepMode};
use tracing::{info, warn};

pub const BUILD_ORDER_RECORD: &str = "build_order_record";
pub const PERSIST_ORDER: &str = "persist_order";
pub const NOTIFY_STAFF: &str = "notify_staff";
pub const SEND_CONFIRMATION_EMAIL: &str = "send_confirmation_email";
pub const REVALIDATE_ORDER_VIEWS: &str = "revalidate_order_views";

fn order_of(ctx_data: &ContextData<CreateOrderCtx>) -> Result<Order, AppError> {
  ctx_data
    .with(|c| c.order.clone())
    .ok_or_else(|| AppError::Internal("order record was not built".to_string()))
}

pub fn build_create_order_flow() -> Flow<CreateOrderCtx, AppError> {
  let mut flow = Flow::<CreateOrderCtx, AppError>::new(
    "create_order",
    &[
      (BUILD_ORDER_RECORD, StepMode::Required),
      (PERSIST_ORDER, StepMode::Required),
      (NOTIFY_STAFF, StepMode::BestEffort),
      (SEND_CONFIRMATION_EMAIL, StepMode::BestEffort),
      (REVALIDATE_ORDER_VIEWS, StepMode::BestEffort),
    ],
  );

  // Defaults: id from the store, status Pending, source from the entry point,
  // timestamps now.
  flow.on_step(BUILD_ORDER_RECORD, |ctx_data: ContextData<CreateOrderCtx>| {
    Box::pin(async move {
      let (input, default_source, store) = {
        let mut guard = ctx_data.write();
        (guard.input.take(), guard.default_source, guard.app_state.store.clone())
      };
      let input = input.ok_or_else(|| AppError::Internal("order input already consumed".to_string()))?;
      let order = Order::from_new(input, store.allocate_id(), default_source, Utc::now())?;
      info!(order_id = %order.id, status = %order.status, source = %order.source, "Order record built.");
      ctx_data.write().order = Some(order);
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.on_step(PERSIST_ORDER, |ctx_data: ContextData<CreateOrderCtx>| {
    Box::pin(async move {
      let order = order_of(&ctx_data)?;
      let store = ctx_data.with(|c| c.app_state.store.clone());
      store.insert(&order).await.map_err(|e| {
        warn!(order_id = %order.id, backend = store.backend(), error = %e, "Order insert failed.");
        e
      })?;
      info!(order_id = %order.id, backend = store.backend(), "Order persisted.");
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.on_step(NOTIFY_STAFF, |ctx_data: ContextData<CreateOrderCtx>| {
    Box::pin(async move {
      let order = order_of(&ctx_data)?;
      let notifier = ctx_data.with(|c| c.app_state.notifier.clone());
      notifier.notify_new_order(&order).await?;
      ctx_data.write().staff_notified = true;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.set_skip_condition(
    SEND_CONFIRMATION_EMAIL,
    Some(Arc::new(|ctx_data: ContextData<CreateOrderCtx>| {
      ctx_data.with(|c| lacks_customer_email(c.order.as_ref()))
    })),
  );
  flow.on_step(SEND_CONFIRMATION_EMAIL, |ctx_data: ContextData<CreateOrderCtx>| {
    Box::pin(async move {
      let (order, app_state) = {
        let guard = ctx_data.read();
        (guard.order.clone(), guard.app_state.clone())
      };
      let order = order.ok_or_else(|| AppError::Internal("order record was not built".to_string()))?;
      let provider = send_order_email(&app_state, &order).await?;
      ctx_data.write().email_sent_via = Some(provider);
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.on_step(REVALIDATE_ORDER_VIEWS, |ctx_data: ContextData<CreateOrderCtx>| {
    Box::pin(async move {
      let app_state = ctx_data.with(|c| c.app_state.clone());
      revalidate_order_views(&app_state, None).await?;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow
}
