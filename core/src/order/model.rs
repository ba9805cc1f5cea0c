// core/src/order/model.rs

//! Order records and their wire shape.
//!
//! Internally an order has exactly one lifecycle status. The stored/JSON form
//! ([`OrderDocument`]) carries it twice, as `status` and `orderStatus`, because
//! older admin views still read the second name.

use super::status::{LifecycleStatus, OrderSource, PaymentStatus};
use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub product_id: Option<String>,
  pub name: String,
  pub quantity: u32,
  #[serde(default, with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
  pub unit_price: Option<Decimal>,
  #[serde(default, with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
  pub total: Option<Decimal>,
}

impl LineItem {
  /// Explicit line total, else unit price times quantity, else zero.
  pub fn line_total(&self) -> Decimal {
    self
      .total
      .or_else(|| self.unit_price.map(|p| p * Decimal::from(self.quantity)))
      .unwrap_or(Decimal::ZERO)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
  #[serde(default, with = "rust_decimal::serde::float")]
  pub subtotal: Decimal,
  #[serde(default, with = "rust_decimal::serde::float")]
  pub shipping: Decimal,
  #[serde(default, with = "rust_decimal::serde::float")]
  pub tax: Decimal,
  #[serde(default, alias = "couponDiscount", with = "rust_decimal::serde::float")]
  pub discount: Decimal,
  #[serde(default, with = "rust_decimal::serde::float")]
  pub total: Decimal,
  #[serde(default, with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
  pub due: Option<Decimal>,
}

impl Totals {
  /// Fills subtotal and total from the line items when the caller sent none.
  pub fn fill_missing(&mut self, items: &[LineItem]) {
    if self.subtotal.is_zero() {
      self.subtotal = items.iter().map(LineItem::line_total).sum();
    }
    if self.total.is_zero() {
      self.total = self.subtotal + self.shipping + self.tax - self.discount;
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
  #[serde(default)]
  pub status: PaymentStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub method: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub trx_id: Option<String>,
}

/// Raw order fields as submitted by checkout, the admin console, or a
/// failover import. Anything missing gets a default in [`Order::from_new`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
  #[serde(default)]
  pub invoice_number: Option<String>,
  #[serde(default)]
  pub customer: Customer,
  #[serde(default)]
  pub items: Vec<LineItem>,
  #[serde(default)]
  pub totals: Totals,
  #[serde(default)]
  pub payment: Payment,
  #[serde(default)]
  pub user_email: Option<String>,
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub order_status: Option<String>,
  #[serde(default)]
  pub source: Option<String>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

/// Generates a fresh order identifier.
pub fn generate_order_id() -> String {
  format!("ORD-{}", Uuid::new_v4().simple().to_string().to_uppercase())
}

/// A stored order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "OrderDocument", try_from = "OrderDocument")]
pub struct Order {
  pub id: String,
  pub invoice_number: Option<String>,
  pub customer: Customer,
  pub items: Vec<LineItem>,
  pub totals: Totals,
  pub payment: Payment,
  pub user_email: Option<String>,
  pub status: LifecycleStatus,
  pub source: OrderSource,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Order {
  /// Applies creation defaults to `new`.
  ///
  /// Status comes from `orderStatus`, then `status`, then `Pending`. Source
  /// falls back to `default_source`. `createdAt` falls back to `now`;
  /// `updatedAt` is always `now`.
  ///
  /// Shopper checkouts (`default_source` of [`OrderSource::Checkout`]) ignore
  /// any submitted status, source and `createdAt`: they always start
  /// `Pending`, sourced `Checkout`, created `now`.
  pub fn from_new(new: NewOrder, id: String, default_source: OrderSource, now: DateTime<Utc>) -> CoreResult<Self> {
    let new = if default_source == OrderSource::Checkout {
      NewOrder {
        status: None,
        order_status: None,
        source: None,
        created_at: None,
        ..new
      }
    } else {
      new
    };
    let status = match new.order_status.as_deref().or(new.status.as_deref()) {
      Some(raw) if !raw.trim().is_empty() => raw.parse::<LifecycleStatus>()?,
      _ => LifecycleStatus::Pending,
    };
    let source = match new.source.as_deref() {
      Some(raw) if !raw.trim().is_empty() => raw.parse::<OrderSource>()?,
      _ => default_source,
    };
    let mut totals = new.totals;
    totals.fill_missing(&new.items);

    Ok(Order {
      id,
      invoice_number: new.invoice_number.filter(|s| !s.trim().is_empty()),
      customer: new.customer,
      items: new.items,
      totals,
      payment: new.payment,
      user_email: new.user_email.filter(|s| !s.trim().is_empty()),
      status,
      source,
      created_at: new.created_at.unwrap_or(now),
      updated_at: now,
    })
  }

  /// Identifier shown to staff in notifications: `MAN-<invoice>` for orders
  /// with an invoice number, otherwise the order id.
  pub fn display_id(&self) -> String {
    match &self.invoice_number {
      Some(invoice) => format!("MAN-{}", invoice),
      None => self.id.clone(),
    }
  }
}

/// Serialized order. `status` and `orderStatus` are always written equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDocument {
  pub id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub invoice_number: Option<String>,
  #[serde(default)]
  pub customer: Customer,
  #[serde(default)]
  pub items: Vec<LineItem>,
  #[serde(default)]
  pub totals: Totals,
  #[serde(default)]
  pub payment: Payment,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user_email: Option<String>,
  #[serde(default)]
  pub status: Option<LifecycleStatus>,
  #[serde(default)]
  pub order_status: Option<LifecycleStatus>,
  #[serde(default)]
  pub source: Option<OrderSource>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderDocument {
  fn from(order: Order) -> Self {
    OrderDocument {
      id: order.id,
      invoice_number: order.invoice_number,
      customer: order.customer,
      items: order.items,
      totals: order.totals,
      payment: order.payment,
      user_email: order.user_email,
      status: Some(order.status),
      order_status: Some(order.status),
      source: Some(order.source),
      created_at: order.created_at,
      updated_at: order.updated_at,
    }
  }
}

impl TryFrom<OrderDocument> for Order {
  type Error = CoreError;

  fn try_from(doc: OrderDocument) -> Result<Self, Self::Error> {
    if doc.id.trim().is_empty() {
      return Err(CoreError::Internal("order document has an empty id".to_string()));
    }
    Ok(Order {
      id: doc.id,
      invoice_number: doc.invoice_number,
      customer: doc.customer,
      items: doc.items,
      totals: doc.totals,
      payment: doc.payment,
      user_email: doc.user_email,
      status: doc.order_status.or(doc.status).unwrap_or(LifecycleStatus::Pending),
      source: doc.source.unwrap_or(OrderSource::Manual),
      created_at: doc.created_at,
      updated_at: doc.updated_at,
    })
  }
}

/// A status write: both stored status fields take `status` together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
  pub status: LifecycleStatus,
  pub updated_at: DateTime<Utc>,
}

impl StatusChange {
  pub fn now(status: LifecycleStatus) -> Self {
    Self {
      status,
      updated_at: Utc::now(),
    }
  }

  pub fn apply(&self, order: &mut Order) {
    order.status = self.status;
    order.updated_at = self.updated_at;
  }
}
