// storefront/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use storefront::config::AppConfig;
use storefront::state::AppState;
use storefront::web::{configure_app_routes, AccessGate};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      // No subscriber yet; the message must still reach the operator.
      eprintln!("Configuration error: {}", e);
      std::process::exit(1);
    }
  };
  storefront::init_tracing(app_config.log_json);
  tracing::info!("Starting storefront server...");

  let app_state = match storefront::build_order_store(&app_config)
    .await
    .and_then(|store| AppState::from_config(app_config.clone(), store))
  {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialise application state.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  let gate_policy = app_config.gate.clone();
  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .configure(configure_app_routes)
      .wrap(AccessGate::new(gate_policy.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
  })
  .bind(&server_address)?
  .run()
  .await
}
