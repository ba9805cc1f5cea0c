// storefront/src/services/mod.rs

//! Outbound collaborators used by the order flows.

pub mod mail;
pub mod notifier;
pub mod revalidation;

pub use mail::{MailPreference, MailProvider, MailRouter, OrderEmail, ProviderKind};
pub use notifier::{OrderNotifier, TelegramConfig, TelegramNotifier};
pub use revalidation::{CacheInvalidator, HttpRevalidator, LogOnlyInvalidator};
