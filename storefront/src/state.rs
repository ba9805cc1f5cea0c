// storefront/src/state.rs

use crate::config::AppConfig;
use crate::errors::{AppError, Result as AppResult};
use crate::flows;
use crate::services::mail::{EmailJsProvider, MailProvider, MailRouter, ResendProvider};
use crate::services::notifier::{OrderNotifier, TelegramNotifier};
use crate::services::revalidation::{CacheInvalidator, HttpRevalidator, LogOnlyInvalidator};
use crate::store::OrderStore;
use std::sync::Arc;
use storefront_core::FlowRegistry;

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub flows: Arc<FlowRegistry<AppError>>,
  pub store: Arc<dyn OrderStore>,
  pub notifier: Arc<dyn OrderNotifier>,
  pub invalidator: Arc<dyn CacheInvalidator>,
  pub mailer: Arc<MailRouter>,
}

impl AppState {
  /// Wires the given collaborators together and registers the order flows.
  pub fn new(
    config: Arc<AppConfig>,
    store: Arc<dyn OrderStore>,
    notifier: Arc<dyn OrderNotifier>,
    invalidator: Arc<dyn CacheInvalidator>,
    mailer: Arc<MailRouter>,
  ) -> Self {
    let registry = Arc::new(FlowRegistry::<AppError>::new());
    flows::register_all_flows(&registry);
    Self {
      config,
      flows: registry,
      store,
      notifier,
      invalidator,
      mailer,
    }
  }

  /// Builds the HTTP-backed collaborators described by `config`.
  pub fn from_config(config: Arc<AppConfig>, store: Arc<dyn OrderStore>) -> AppResult<Self> {
    let client = reqwest::Client::builder().timeout(config.http_timeout).build()?;

    let notifier: Arc<dyn OrderNotifier> = Arc::new(TelegramNotifier::new(client.clone(), config.telegram.clone()));

    let invalidator: Arc<dyn CacheInvalidator> = match &config.revalidation.url {
      Some(url) => Arc::new(HttpRevalidator::new(
        client.clone(),
        url.clone(),
        config.revalidation.secret.clone(),
      )),
      None => {
        tracing::info!("REVALIDATE_URL not set; cache invalidation is log-only.");
        Arc::new(LogOnlyInvalidator)
      }
    };

    // Table order is the fallback order: Resend first, then EmailJS.
    let providers: Vec<Arc<dyn MailProvider>> = vec![
      Arc::new(ResendProvider::new(
        client.clone(),
        config.mail.resend_api_key.clone(),
        config.mail.from.clone(),
      )),
      Arc::new(EmailJsProvider::new(client, config.mail.emailjs.clone())),
    ];
    let mailer = Arc::new(MailRouter::new(providers, config.mail.preference));

    Ok(Self::new(config, store, notifier, invalidator, mailer))
  }
}
