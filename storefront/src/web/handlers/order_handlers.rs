// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use super::actor;
use crate::errors::AppError;
use crate::orders;
use crate::state::AppState;
use crate::store::OrderFilter;
use storefront_core::{ActionResult, LifecycleStatus, NewOrder, OrderSource, Session};

#[derive(Deserialize, Debug)]
pub struct ListOrdersQuery {
  pub status: Option<String>,
  pub limit: Option<usize>,
}

#[derive(Deserialize, Debug)]
pub struct StatusUpdateRequest {
  pub status: String,
}

/// Creation failures still answer with the `{success:false,error}` body, with
/// the status code of the underlying error.
async fn create_with_source(
  app_state: &AppState,
  input: NewOrder,
  source: OrderSource,
) -> Result<HttpResponse, AppError> {
  let order = orders::create_order(app_state, input, source).await?;
  Ok(HttpResponse::Created().json(ActionResult::created(order.id)))
}

#[instrument(name = "handler::create_checkout_order", skip(app_state, payload))]
pub async fn create_checkout_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewOrder>,
) -> Result<HttpResponse, AppError> {
  create_with_source(&app_state, payload.into_inner(), OrderSource::Checkout).await
}

#[instrument(name = "handler::create_manual_order", skip_all, fields(actor = actor(&session)))]
pub async fn create_manual_order_handler(
  app_state: web::Data<AppState>,
  session: Option<web::ReqData<Session>>,
  payload: web::Json<NewOrder>,
) -> Result<HttpResponse, AppError> {
  create_with_source(&app_state, payload.into_inner(), OrderSource::Manual).await
}

#[instrument(name = "handler::import_failover", skip_all, fields(actor = actor(&session)))]
pub async fn import_failover_handler(
  app_state: web::Data<AppState>,
  session: Option<web::ReqData<Session>>,
  payload: web::Json<Vec<NewOrder>>,
) -> Result<HttpResponse, AppError> {
  let results = orders::import_failover_orders(&app_state, payload.into_inner()).await;
  let imported = results.iter().filter(|r| r.success).count();
  info!(imported, failed = results.len() - imported, "Failover import finished.");
  Ok(HttpResponse::Ok().json(json!({
    "success": imported == results.len(),
    "imported": imported,
    "results": results,
  })))
}

#[instrument(name = "handler::list_orders", skip(app_state, session), fields(actor = actor(&session)))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  session: Option<web::ReqData<Session>>,
  query: web::Query<ListOrdersQuery>,
) -> Result<HttpResponse, AppError> {
  let query = query.into_inner();
  let status = query
    .status
    .as_deref()
    .filter(|s| !s.trim().is_empty())
    .map(str::parse::<LifecycleStatus>)
    .transpose()?;
  let filter = OrderFilter {
    status,
    limit: query.limit.unwrap_or(OrderFilter::DEFAULT_LIMIT),
  };
  let found = orders::list_orders(&app_state, filter).await?;
  Ok(HttpResponse::Ok().json(found))
}

#[instrument(name = "handler::get_order", skip(app_state, session), fields(actor = actor(&session)))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  session: Option<web::ReqData<Session>>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order = orders::get_order(&app_state, &path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(
  name = "handler::update_order_status",
  skip(app_state, session, body),
  fields(actor = actor(&session), status = %body.status)
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  session: Option<web::ReqData<Session>>,
  path: web::Path<String>,
  body: web::Json<StatusUpdateRequest>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  orders::update_order_status(&app_state, &order_id, &body.status).await?;
  Ok(HttpResponse::Ok().json(ActionResult::ok()))
}
