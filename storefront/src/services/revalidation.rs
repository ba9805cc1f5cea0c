// storefront/src/services/revalidation.rs

//! Invalidation of cached storefront/admin views after order writes.

use crate::errors::{AppError, Result as AppResult};
use async_trait::async_trait;
use serde_json::json;
use storefront_core::LifecycleStatus;
use tracing::{debug, info, instrument};

/// The admin order list view.
pub const ADMIN_ORDERS_VIEW: &str = "/admin/orders";

/// Views to invalidate after an order write: the full list, plus the
/// status-filtered list for `status` when given.
pub fn order_view_targets(status: Option<LifecycleStatus>) -> Vec<String> {
  let mut targets = vec![ADMIN_ORDERS_VIEW.to_string()];
  if let Some(status) = status {
    targets.push(format!("{}?status={}", ADMIN_ORDERS_VIEW, status));
  }
  targets
}

#[async_trait]
pub trait CacheInvalidator: Send + Sync {
  /// Invalidates cached views keyed by `target` (a path or a tag).
  async fn invalidate(&self, target: &str) -> AppResult<()>;
}

/// Posts `{"path": target}` to a revalidation endpoint.
pub struct HttpRevalidator {
  client: reqwest::Client,
  endpoint: String,
  secret: Option<String>,
}

impl HttpRevalidator {
  pub fn new(client: reqwest::Client, endpoint: impl Into<String>, secret: Option<String>) -> Self {
    Self {
      client,
      endpoint: endpoint.into(),
      secret,
    }
  }
}

#[async_trait]
impl CacheInvalidator for HttpRevalidator {
  #[instrument(name = "revalidate::http", skip(self, target), fields(view = %target), err(Display))]
  async fn invalidate(&self, target: &str) -> AppResult<()> {
    let mut request = self.client.post(&self.endpoint).json(&json!({ "path": target }));
    if let Some(secret) = &self.secret {
      request = request.header("x-revalidate-secret", secret);
    }
    let response = request.send().await?;
    if !response.status().is_success() {
      return Err(AppError::Revalidation(format!(
        "revalidation of '{}' returned {}",
        target,
        response.status()
      )));
    }
    info!("Revalidated {}", target);
    Ok(())
  }
}

/// Used when no revalidation endpoint is configured.
#[derive(Debug, Default)]
pub struct LogOnlyInvalidator;

#[async_trait]
impl CacheInvalidator for LogOnlyInvalidator {
  async fn invalidate(&self, target: &str) -> AppResult<()> {
    debug!(target_view = target, "No revalidation endpoint configured; nothing to invalidate.");
    Ok(())
  }
}
