// storefront/src/store/mod.rs

//! Order persistence behind the `OrderStore` trait.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryOrderStore;
pub use postgres::PgOrderStore;

use crate::errors::Result as AppResult;
use async_trait::async_trait;
use storefront_core::order::generate_order_id;
use storefront_core::{LifecycleStatus, Order, StatusChange};

/// Selection for order listings. Results are always newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderFilter {
  pub status: Option<LifecycleStatus>,
  pub limit: usize,
}

impl OrderFilter {
  pub const DEFAULT_LIMIT: usize = 200;

  pub fn with_status(status: LifecycleStatus) -> Self {
    Self {
      status: Some(status),
      ..Self::default()
    }
  }
}

impl Default for OrderFilter {
  fn default() -> Self {
    Self {
      status: None,
      limit: Self::DEFAULT_LIMIT,
    }
  }
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  fn backend(&self) -> &'static str;

  /// A fresh identifier for a new order.
  fn allocate_id(&self) -> String {
    generate_order_id()
  }

  async fn insert(&self, order: &Order) -> AppResult<()>;

  async fn get(&self, id: &str) -> AppResult<Option<Order>>;

  async fn list(&self, filter: &OrderFilter) -> AppResult<Vec<Order>>;

  /// Writes both stored status fields and `updatedAt` in one update.
  /// Returns `false` when no order has `id`.
  async fn update_status(&self, id: &str, change: StatusChange) -> AppResult<bool>;
}
