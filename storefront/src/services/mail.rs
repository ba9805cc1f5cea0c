// storefront/src/services/mail.rs

//! Customer order emails through a table of HTTP mail providers.
//!
//! The provider chain for a request is resolved once from the configured
//! [`MailPreference`] and then tried in table order until one succeeds.

use crate::errors::{AppError, Result as AppResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use storefront_core::Order;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
  Resend,
  EmailJs,
}

impl ProviderKind {
  pub fn as_str(self) -> &'static str {
    match self {
      ProviderKind::Resend => "resend",
      ProviderKind::EmailJs => "emailjs",
    }
  }
}

/// Which providers a request may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MailPreference {
  /// Every provider, in fallback order.
  #[default]
  Auto,
  Only(ProviderKind),
}

impl FromStr for MailPreference {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "" | "auto" => Ok(MailPreference::Auto),
      "resend" => Ok(MailPreference::Only(ProviderKind::Resend)),
      "emailjs" => Ok(MailPreference::Only(ProviderKind::EmailJs)),
      other => Err(AppError::Config(format!("Unknown MAIL_PROVIDER '{}'", other))),
    }
  }
}

/// An order email, rendered once and handed to whichever provider sends it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEmail {
  pub to: String,
  pub customer_name: String,
  pub order_id: String,
  pub total: Decimal,
  pub address: String,
  pub status: String,
  pub subject: String,
  pub html: String,
}

impl OrderEmail {
  /// `None` when the order has no customer email.
  pub fn for_order(order: &Order) -> Option<Self> {
    let to = order.user_email.clone()?;
    let customer_name = order.customer.name.clone().unwrap_or_else(|| "Customer".to_string());
    let address = order.customer.address.clone().unwrap_or_default();
    let order_id = order.display_id();
    let status = order.status.to_string();
    let html = format!(
      "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
       <h2>Order Update: {order_id}</h2>\
       <p>Hello {customer_name},</p>\
       <p>Status: <strong>{status}</strong></p>\
       <p>Total: {total} BDT</p>\
       <p>Address: {address}</p>\
       </div>",
      order_id = order_id,
      customer_name = customer_name,
      status = status,
      total = order.totals.total,
      address = address,
    );
    Some(Self {
      to,
      subject: format!("Order Update: {}", order_id),
      customer_name,
      order_id,
      total: order.totals.total,
      address,
      status,
      html,
    })
  }
}

#[async_trait]
pub trait MailProvider: Send + Sync {
  fn kind(&self) -> ProviderKind;

  async fn send(&self, email: &OrderEmail) -> AppResult<()>;
}

pub struct ResendProvider {
  client: reqwest::Client,
  api_key: Option<String>,
  from: String,
  endpoint: String,
}

impl ResendProvider {
  pub fn new(client: reqwest::Client, api_key: Option<String>, from: impl Into<String>) -> Self {
    Self {
      client,
      api_key,
      from: from.into(),
      endpoint: "https://api.resend.com/emails".to_string(),
    }
  }
}

#[async_trait]
impl MailProvider for ResendProvider {
  fn kind(&self) -> ProviderKind {
    ProviderKind::Resend
  }

  async fn send(&self, email: &OrderEmail) -> AppResult<()> {
    let api_key = self
      .api_key
      .as_deref()
      .ok_or_else(|| AppError::Mail("Resend API key missing".to_string()))?;
    let response = self
      .client
      .post(&self.endpoint)
      .bearer_auth(api_key)
      .json(&json!({
        "from": self.from,
        "to": [email.to],
        "subject": email.subject,
        "html": email.html,
      }))
      .send()
      .await?;
    if !response.status().is_success() {
      let detail = response.text().await.unwrap_or_default();
      return Err(AppError::Mail(format!("Resend rejected the message: {}", detail)));
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Default)]
pub struct EmailJsCredentials {
  pub service_id: Option<String>,
  pub template_id: Option<String>,
  pub public_key: Option<String>,
  pub private_key: Option<String>,
}

pub struct EmailJsProvider {
  client: reqwest::Client,
  credentials: EmailJsCredentials,
  endpoint: String,
}

impl EmailJsProvider {
  pub fn new(client: reqwest::Client, credentials: EmailJsCredentials) -> Self {
    Self {
      client,
      credentials,
      endpoint: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
    }
  }
}

#[async_trait]
impl MailProvider for EmailJsProvider {
  fn kind(&self) -> ProviderKind {
    ProviderKind::EmailJs
  }

  async fn send(&self, email: &OrderEmail) -> AppResult<()> {
    let creds = &self.credentials;
    let (Some(public_key), Some(private_key)) = (&creds.public_key, &creds.private_key) else {
      return Err(AppError::Mail("EmailJS keys missing".to_string()));
    };
    let response = self
      .client
      .post(&self.endpoint)
      .json(&json!({
        "service_id": creds.service_id,
        "template_id": creds.template_id.as_deref().unwrap_or("order_confirmation"),
        "user_id": public_key,
        "accessToken": private_key,
        "template_params": {
          "to_email": email.to,
          "customer_name": email.customer_name,
          "order_id": email.order_id,
          "total_price": email.total.to_string(),
          "delivery_address": email.address,
          "status": email.status,
          "subject": email.subject,
        }
      }))
      .send()
      .await?;
    if !response.status().is_success() {
      let detail = response.text().await.unwrap_or_default();
      return Err(AppError::Mail(format!("EmailJS rejected the message: {}", detail)));
    }
    Ok(())
  }
}

/// Ordered provider table plus the configured preference.
pub struct MailRouter {
  providers: Vec<Arc<dyn MailProvider>>,
  preference: MailPreference,
}

impl MailRouter {
  /// `providers` are kept in the given order, which is the fallback order.
  pub fn new(providers: Vec<Arc<dyn MailProvider>>, preference: MailPreference) -> Self {
    Self { providers, preference }
  }

  /// The providers a request will try, in order.
  pub fn resolve(&self) -> Vec<Arc<dyn MailProvider>> {
    self
      .providers
      .iter()
      .filter(|p| match self.preference {
        MailPreference::Auto => true,
        MailPreference::Only(kind) => p.kind() == kind,
      })
      .cloned()
      .collect()
  }

  /// Sends through the resolved chain and returns the provider that delivered.
  #[instrument(name = "mail::send", skip(self, email), fields(order_id = %email.order_id), err(Display))]
  pub async fn send(&self, email: &OrderEmail) -> AppResult<ProviderKind> {
    let chain = self.resolve();
    let mut failures = Vec::with_capacity(chain.len());
    for provider in chain {
      match provider.send(email).await {
        Ok(()) => {
          info!(provider = provider.kind().as_str(), "Order email sent.");
          return Ok(provider.kind());
        }
        Err(e) => {
          warn!(provider = provider.kind().as_str(), error = %e, "Mail provider failed; trying next.");
          failures.push(format!("{}: {}", provider.kind().as_str(), e.public_message()));
        }
      }
    }
    if failures.is_empty() {
      return Err(AppError::Mail("No mail provider available".to_string()));
    }
    Err(AppError::Mail(format!("All providers failed ({})", failures.join("; "))))
  }
}
