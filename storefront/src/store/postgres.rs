// storefront/src/store/postgres.rs

//! PostgreSQL order store. Nested order parts live in JSONB columns; the
//! lifecycle status is kept in both `status` and `order_status`.

use super::{OrderFilter, OrderStore};
use crate::errors::{AppError, Result as AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use storefront_core::order::{Customer, LineItem, Payment, Totals};
use storefront_core::{LifecycleStatus, Order, OrderSource, StatusChange};
use tracing::{error, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
  id TEXT PRIMARY KEY,
  invoice_number TEXT,
  customer JSONB NOT NULL DEFAULT '{}'::jsonb,
  items JSONB NOT NULL DEFAULT '[]'::jsonb,
  totals JSONB NOT NULL DEFAULT '{}'::jsonb,
  payment JSONB NOT NULL DEFAULT '{}'::jsonb,
  user_email TEXT,
  status TEXT NOT NULL,
  order_status TEXT NOT NULL,
  source TEXT NOT NULL,
  created_at TIMESTAMPTZ NOT NULL,
  updated_at TIMESTAMPTZ NOT NULL,
  CONSTRAINT orders_status_fields_match CHECK (status = order_status)
)
"#;

const SELECT_COLUMNS: &str = "id, invoice_number, customer, items, totals, payment, user_email, status, \
                              order_status, source, created_at, updated_at";

#[derive(Debug, FromRow)]
struct OrderRow {
  id: String,
  invoice_number: Option<String>,
  customer: Json<Customer>,
  items: Json<Vec<LineItem>>,
  totals: Json<Totals>,
  payment: Json<Payment>,
  user_email: Option<String>,
  status: String,
  order_status: String,
  source: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
  type Error = AppError;

  fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
    let status = row
      .order_status
      .parse::<LifecycleStatus>()
      .or_else(|_| row.status.parse::<LifecycleStatus>())?;
    Ok(Order {
      id: row.id,
      invoice_number: row.invoice_number,
      customer: row.customer.0,
      items: row.items.0,
      totals: row.totals.0,
      payment: row.payment.0,
      user_email: row.user_email,
      status,
      source: row.source.parse::<OrderSource>()?,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[derive(Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Creates the `orders` table when it does not exist yet.
  pub async fn ensure_schema(&self) -> AppResult<()> {
    sqlx::query(SCHEMA).execute(&self.pool).await?;
    info!("Order table schema ensured.");
    Ok(())
  }
}

#[async_trait]
impl OrderStore for PgOrderStore {
  fn backend(&self) -> &'static str {
    "postgres"
  }

  #[instrument(name = "pg::insert_order", skip(self, order), fields(order_id = %order.id), err(Display))]
  async fn insert(&self, order: &Order) -> AppResult<()> {
    let status = order.status.as_str();
    sqlx::query(
      "INSERT INTO orders (id, invoice_number, customer, items, totals, payment, user_email, status, \
       order_status, source, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8, $9, $10, $11)",
    )
    .bind(&order.id)
    .bind(&order.invoice_number)
    .bind(Json(&order.customer))
    .bind(Json(&order.items))
    .bind(Json(&order.totals))
    .bind(Json(&order.payment))
    .bind(&order.user_email)
    .bind(status)
    .bind(order.source.to_string())
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      error!("Failed to insert order {}: {}", order.id, e);
      AppError::Sqlx(e)
    })?;
    Ok(())
  }

  async fn get(&self, id: &str) -> AppResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!("SELECT {} FROM orders WHERE id = $1", SELECT_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    row.map(Order::try_from).transpose()
  }

  async fn list(&self, filter: &OrderFilter) -> AppResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
      "SELECT {} FROM orders WHERE ($1::TEXT IS NULL OR order_status = $1) ORDER BY created_at DESC LIMIT $2",
      SELECT_COLUMNS
    ))
    .bind(filter.status.map(LifecycleStatus::as_str))
    .bind(i64::try_from(filter.limit).unwrap_or(i64::MAX))
    .fetch_all(&self.pool)
    .await?;
    rows.into_iter().map(Order::try_from).collect()
  }

  #[instrument(name = "pg::update_status", skip(self, change), fields(order_id = %id, status = %change.status), err(Display))]
  async fn update_status(&self, id: &str, change: StatusChange) -> AppResult<bool> {
    let result = sqlx::query("UPDATE orders SET status = $2, order_status = $2, updated_at = $3 WHERE id = $1")
      .bind(id)
      .bind(change.status.as_str())
      .bind(change.updated_at)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}
