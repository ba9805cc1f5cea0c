// storefront/src/web/handlers/delivery_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use super::actor;
use crate::errors::AppError;
use crate::orders;
use crate::state::AppState;
use crate::store::OrderFilter;
use storefront_core::{LifecycleStatus, Session};

/// Orders out for delivery.
#[instrument(name = "handler::list_shipped_orders", skip_all, fields(actor = actor(&session)))]
pub async fn list_shipped_orders_handler(
  app_state: web::Data<AppState>,
  session: Option<web::ReqData<Session>>,
) -> Result<HttpResponse, AppError> {
  let shipped = orders::list_orders(&app_state, OrderFilter::with_status(LifecycleStatus::Shipped)).await?;
  info!(count = shipped.len(), "Listed shipped orders for delivery.");
  Ok(HttpResponse::Ok().json(shipped))
}
