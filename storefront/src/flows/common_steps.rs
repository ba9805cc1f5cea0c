// storefront/src/flows/common_steps.rs

//! Side-effect steps shared by the order flows.

use crate::errors::{AppError, Result as AppResult};
use crate::services::mail::{OrderEmail, ProviderKind};
use crate::services::revalidation::order_view_targets;
use crate::state::AppState;
use storefront_core::{LifecycleStatus, Order};
use tracing::{instrument, warn};

/// Invalidates the order list views. Every target is attempted; the first
/// failure is returned after the rest have run.
#[instrument(name = "step::revalidate_order_views", skip(app_state))]
pub async fn revalidate_order_views(app_state: &AppState, status: Option<LifecycleStatus>) -> AppResult<()> {
  let mut first_error: Option<AppError> = None;
  for target in order_view_targets(status) {
    if let Err(e) = app_state.invalidator.invalidate(&target).await {
      warn!(view = %target, error = %e, "View invalidation failed.");
      first_error.get_or_insert(e);
    }
  }
  match first_error {
    Some(e) => Err(e),
    None => Ok(()),
  }
}

/// Emails the order's customer through the configured provider chain.
#[instrument(name = "step::send_order_email", skip(app_state, order), fields(order_id = %order.id))]
pub async fn send_order_email(app_state: &AppState, order: &Order) -> AppResult<ProviderKind> {
  let email =
    OrderEmail::for_order(order).ok_or_else(|| AppError::Validation("Order has no customer email".to_string()))?;
  app_state.mailer.send(&email).await
}

/// Skip predicate input: true when the order has no customer email.
pub fn lacks_customer_email(order: Option<&Order>) -> bool {
  order.and_then(|o| o.user_email.as_deref()).is_none()
}
