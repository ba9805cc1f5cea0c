// storefront/src/services/notifier.rs

//! Staff notification for new orders via the Telegram Bot API.

use crate::errors::{AppError, Result as AppResult};
use async_trait::async_trait;
use serde_json::json;
use storefront_core::Order;
use tracing::{debug, info, instrument};

/// Tells staff that an order came in. Callers treat failures as non-fatal.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
  async fn notify_new_order(&self, order: &Order) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
  pub bot_token: Option<String>,
  pub admin_chat_id: Option<String>,
  pub api_base: String,
}

impl Default for TelegramConfig {
  fn default() -> Self {
    Self {
      bot_token: None,
      admin_chat_id: None,
      api_base: "https://api.telegram.org".to_string(),
    }
  }
}

pub struct TelegramNotifier {
  client: reqwest::Client,
  config: TelegramConfig,
}

impl TelegramNotifier {
  pub fn new(client: reqwest::Client, config: TelegramConfig) -> Self {
    Self { client, config }
  }
}

/// Escapes the characters Telegram's legacy Markdown treats as entity markers.
fn escape_markdown(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for ch in text.chars() {
    if matches!(ch, '_' | '*' | '`' | '[') {
      out.push('\\');
    }
    out.push(ch);
  }
  out
}

/// Code spans cannot hold escapes, so backticks are dropped instead.
fn code_span(text: &str) -> String {
  format!("`{}`", text.replace('`', ""))
}

/// Markdown summary posted to the staff chat. Customer-supplied text is
/// escaped so it cannot open or close an entity.
pub fn format_order_message(order: &Order) -> String {
  let items = order
    .items
    .iter()
    .map(|item| {
      format!(
        "• {}\n  Qty: {} | Price: ৳{}",
        escape_markdown(&item.name),
        item.quantity,
        item.line_total()
      )
    })
    .collect::<Vec<_>>()
    .join("\n\n");

  let payment_line = match &order.payment.trx_id {
    Some(trx) => format!("TxnID: {}", code_span(trx)),
    None => "Status: Cash on Delivery".to_string(),
  };
  let or_dash = |v: &Option<String>| v.as_deref().map(escape_markdown).unwrap_or_else(|| "-".to_string());

  format!(
    "🔔 *NEW ORDER*\n\
     ---------------------------------------\n\
     🆔 Order ID: {id}\n\n\
     🛒 *Product Details:*\n{items}\n\n\
     💰 *Financial Summary:*\n\
     Subtotal: ৳{subtotal}\n\
     Vat/Tax: ৳{tax}\n\
     Coupon: -৳{discount}\n\
     *Grand Total: ৳{total}*\n\n\
     👤 *Customer Info:*\n\
     Name: {name}\n\
     Phone: {phone}\n\
     Address: {address}\n\n\
     💳 *Payment:*\n\
     Method: {method}\n\
     {payment_line}\n\n\
     ---------------------------------------\n\
     *Process this order?*",
    id = code_span(&order.display_id()),
    items = items,
    subtotal = order.totals.subtotal,
    tax = order.totals.tax,
    discount = order.totals.discount,
    total = order.totals.total,
    name = or_dash(&order.customer.name),
    phone = or_dash(&order.customer.phone),
    address = or_dash(&order.customer.address),
    method = escape_markdown(&order.payment.method.as_deref().unwrap_or("cod").to_uppercase()),
    payment_line = payment_line,
  )
}

#[async_trait]
impl OrderNotifier for TelegramNotifier {
  #[instrument(name = "telegram::notify_new_order", skip(self, order), fields(order_id = %order.id), err(Display))]
  async fn notify_new_order(&self, order: &Order) -> AppResult<()> {
    let (Some(token), Some(chat_id)) = (&self.config.bot_token, &self.config.admin_chat_id) else {
      debug!("Telegram bot token or chat id not configured; skipping notification.");
      return Ok(());
    };

    let display_id = order.display_id();
    let body = json!({
      "chat_id": chat_id,
      "text": format_order_message(order),
      "parse_mode": "Markdown",
      "reply_markup": {
        "inline_keyboard": [[
          { "text": "✅ Accept", "callback_data": format!("accept_{}", display_id) },
          { "text": "❌ Reject", "callback_data": format!("reject_{}", display_id) }
        ]]
      }
    });

    let url = format!("{}/bot{}/sendMessage", self.config.api_base.trim_end_matches('/'), token);
    let response = self.client.post(url).json(&body).send().await?;
    if !response.status().is_success() {
      let status = response.status();
      let detail = response.text().await.unwrap_or_default();
      return Err(AppError::Notification(format!("Telegram responded {}: {}", status, detail)));
    }
    info!("Staff notified of new order {}.", display_id);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use storefront_core::order::{Customer, LineItem};
  use storefront_core::{NewOrder, OrderSource};

  #[test]
  fn escapes_customer_text_in_markdown() {
    let input = NewOrder {
      invoice_number: Some("10`42".to_string()),
      customer: Customer {
        name: Some("mr_*bold*".to_string()),
        phone: None,
        address: Some("House [7], Road_2".to_string()),
      },
      items: vec![LineItem {
        product_id: None,
        name: "T_shirt".to_string(),
        quantity: 1,
        unit_price: None,
        total: None,
      }],
      ..Default::default()
    };
    let order = Order::from_new(input, "ORD-1".to_string(), OrderSource::Manual, chrono::Utc::now()).unwrap();
    let text = format_order_message(&order);

    assert!(text.contains("Name: mr\\_\\*bold\\*"));
    assert!(text.contains("Address: House \\[7], Road\\_2"));
    assert!(text.contains("• T\\_shirt"));
    assert!(text.contains("Phone: -"));
    assert!(text.contains("Order ID: `MAN-1042`"));
  }
}
