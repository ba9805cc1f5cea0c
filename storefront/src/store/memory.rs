// storefront/src/store/memory.rs

use super::{OrderFilter, OrderStore};
use crate::errors::{AppError, Result as AppResult};
use async_trait::async_trait;
use std::collections::HashMap;
use storefront_core::{Order, StatusChange};
use tokio::sync::RwLock;

/// Process-local order store for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
  orders: RwLock<HashMap<String, Order>>,
}

impl InMemoryOrderStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// A store preloaded with `orders`.
  pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
    let map = orders.into_iter().map(|o| (o.id.clone(), o)).collect();
    Self {
      orders: RwLock::new(map),
    }
  }

  pub async fn len(&self) -> usize {
    self.orders.read().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.orders.read().await.is_empty()
  }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
  fn backend(&self) -> &'static str {
    "memory"
  }

  async fn insert(&self, order: &Order) -> AppResult<()> {
    let mut orders = self.orders.write().await;
    if orders.contains_key(&order.id) {
      return Err(AppError::Conflict(format!("Order {} already exists", order.id)));
    }
    orders.insert(order.id.clone(), order.clone());
    Ok(())
  }

  async fn get(&self, id: &str) -> AppResult<Option<Order>> {
    Ok(self.orders.read().await.get(id).cloned())
  }

  async fn list(&self, filter: &OrderFilter) -> AppResult<Vec<Order>> {
    let orders = self.orders.read().await;
    let mut selected: Vec<Order> = orders
      .values()
      .filter(|o| filter.status.map_or(true, |s| o.status == s))
      .cloned()
      .collect();
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    selected.truncate(filter.limit);
    Ok(selected)
  }

  async fn update_status(&self, id: &str, change: StatusChange) -> AppResult<bool> {
    let mut orders = self.orders.write().await;
    match orders.get_mut(id) {
      Some(order) => {
        change.apply(order);
        Ok(true)
      }
      None => Ok(false),
    }
  }
}
