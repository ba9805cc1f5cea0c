// storefront/src/web/routes.rs

use crate::web::handlers::{delivery_handlers, order_handlers};
use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Public API under `/api/v1`; staff routes under `/admin` and `/delivery`
/// rely on the access gate wrapped around the app.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .service(
      web::scope("/api/v1")
        .route("/health", web::get().to(health_check_handler))
        .route(
          "/checkout/orders",
          web::post().to(order_handlers::create_checkout_order_handler),
        ),
    )
    .service(
      web::scope("/admin/orders")
        .route("", web::get().to(order_handlers::list_orders_handler))
        .route("", web::post().to(order_handlers::create_manual_order_handler))
        .route("/failover", web::post().to(order_handlers::import_failover_handler))
        .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
        .route(
          "/{order_id}/status",
          web::patch().to(order_handlers::update_order_status_handler),
        ),
    )
    .service(web::scope("/delivery").route(
      "/orders",
      web::get().to(delivery_handlers::list_shipped_orders_handler),
    ));
}
