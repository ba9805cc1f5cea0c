// storefront/src/config.rs

use crate::errors::{AppError, Result};
use crate::services::mail::{EmailJsCredentials, MailPreference};
use crate::services::notifier::TelegramConfig;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use storefront_core::{GatePolicy, TokenValidator, TransitionPolicy};

#[derive(Debug, Clone, Default)]
pub struct RevalidationConfig {
  pub url: Option<String>,
  pub secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
  pub preference: MailPreference,
  pub from: String,
  pub resend_api_key: Option<String>,
  pub emailjs: EmailJsCredentials,
}

impl Default for MailConfig {
  fn default() -> Self {
    Self {
      preference: MailPreference::Auto,
      from: "Storefront <orders@example.com>".to_string(),
      resend_api_key: None,
      emailjs: EmailJsCredentials::default(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  // Unset means the in-memory order store.
  pub database_url: Option<String>,
  pub gate: GatePolicy,
  pub transitions: TransitionPolicy,
  pub telegram: TelegramConfig,
  pub revalidation: RevalidationConfig,
  pub mail: MailConfig,
  pub http_timeout: Duration,
  pub log_json: bool,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: None,
      gate: GatePolicy::default(),
      transitions: TransitionPolicy::default(),
      telegram: TelegramConfig::default(),
      revalidation: RevalidationConfig::default(),
      mail: MailConfig::default(),
      http_timeout: Duration::from_secs(10),
      log_json: false,
    }
  }
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match raw {
    Some(value) => value
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
    None => Ok(default),
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    let config = Self::from_lookup(|name| env::var(name).ok())?;
    tracing::info!(
      host = %config.server_host,
      port = config.server_port,
      persistence = if config.database_url.is_some() { "postgres" } else { "memory" },
      "Application configuration loaded successfully."
    );
    Ok(config)
  }

  /// Builds the configuration from `lookup`; blank values count as unset.
  pub fn from_lookup(mut lookup: impl FnMut(&str) -> Option<String>) -> Result<Self> {
    let mut get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    let defaults = Self::default();

    let server_host = get("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = parse_var("SERVER_PORT", get("SERVER_PORT"), defaults.server_port)?;
    let database_url = get("DATABASE_URL");

    let mut gate = defaults.gate;
    if let Some(login_path) = get("LOGIN_PATH") {
      gate.login_path = login_path;
    }
    gate.validator = TokenValidator {
      min_len: parse_var("SESSION_MIN_TOKEN_LEN", get("SESSION_MIN_TOKEN_LEN"), gate.validator.min_len)?,
    };

    let transitions = parse_var("ORDER_TRANSITIONS", get("ORDER_TRANSITIONS"), defaults.transitions)?;

    let telegram = TelegramConfig {
      bot_token: get("TELEGRAM_BOT_TOKEN"),
      admin_chat_id: get("TELEGRAM_ADMIN_CHAT_ID"),
      ..defaults.telegram
    };

    let revalidation = RevalidationConfig {
      url: get("REVALIDATE_URL"),
      secret: get("REVALIDATE_SECRET"),
    };

    let mail = MailConfig {
      preference: match get("MAIL_PROVIDER") {
        Some(raw) => raw.parse::<MailPreference>()?,
        None => MailPreference::Auto,
      },
      from: get("MAIL_FROM").unwrap_or(defaults.mail.from),
      resend_api_key: get("RESEND_API_KEY"),
      emailjs: EmailJsCredentials {
        service_id: get("EMAILJS_SERVICE_ID"),
        template_id: get("EMAILJS_TEMPLATE_ID"),
        public_key: get("EMAILJS_PUBLIC_KEY"),
        private_key: get("EMAILJS_PRIVATE_KEY"),
      },
    };

    let http_timeout = Duration::from_secs(parse_var(
      "HTTP_TIMEOUT_SECS",
      get("HTTP_TIMEOUT_SECS"),
      defaults.http_timeout.as_secs(),
    )?);
    let log_json = get("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json"));

    Ok(Self {
      server_host,
      server_port,
      database_url,
      gate,
      transitions,
      telegram,
      revalidation,
      mail,
      http_timeout,
      log_json,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
