// storefront/src/lib.rs

//! Storefront HTTP service: the access gate in front of the admin and
//! delivery consoles, plus the order operations behind them.

pub mod config;
pub mod errors;
pub mod flows;
pub mod orders;
pub mod services;
pub mod state;
pub mod store;
pub mod web;

use crate::config::AppConfig;
use crate::errors::Result as AppResult;
use crate::store::{InMemoryOrderStore, OrderStore, PgOrderStore};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default
/// `info` level; `json` switches to one JSON object per line.
pub fn init_tracing(json: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise the in-memory store.
pub async fn build_order_store(config: &AppConfig) -> AppResult<Arc<dyn OrderStore>> {
  match &config.database_url {
    Some(url) => {
      let pool = sqlx::PgPool::connect(url).await?;
      tracing::info!("Successfully connected to the database.");
      let store = PgOrderStore::new(pool);
      store.ensure_schema().await?;
      Ok(Arc::new(store))
    }
    None => {
      tracing::warn!("DATABASE_URL not set; orders are kept in memory and lost on restart.");
      Ok(Arc::new(InMemoryOrderStore::new()))
    }
  }
}
