// storefront/src/flows/contexts.rs

//! Per-run data for the order flows. Handlers receive these wrapped in
//! `storefront_core::ContextData`.

use crate::services::mail::ProviderKind;
use crate::state::AppState;
use storefront_core::{LifecycleStatus, NewOrder, Order, OrderSource};

#[derive(Clone)]
pub struct CreateOrderCtx {
  pub app_state: AppState,
  /// Taken by the first step.
  pub input: Option<NewOrder>,
  pub default_source: OrderSource,
  pub order: Option<Order>,
  pub staff_notified: bool,
  pub email_sent_via: Option<ProviderKind>,
}

impl CreateOrderCtx {
  pub fn new(app_state: AppState, input: NewOrder, default_source: OrderSource) -> Self {
    Self {
      app_state,
      input: Some(input),
      default_source,
      order: None,
      staff_notified: false,
      email_sent_via: None,
    }
  }
}

#[derive(Clone)]
pub struct UpdateStatusCtx {
  pub app_state: AppState,
  pub order_id: String,
  pub requested: LifecycleStatus,
  /// The order as it was before the write.
  pub current: Option<Order>,
  /// The order as it is after the write.
  pub updated: Option<Order>,
  pub email_sent_via: Option<ProviderKind>,
}

impl UpdateStatusCtx {
  pub fn new(app_state: AppState, order_id: impl Into<String>, requested: LifecycleStatus) -> Self {
    Self {
      app_state,
      order_id: order_id.into(),
      requested,
      current: None,
      updated: None,
      email_sent_via: None,
    }
  }
}
