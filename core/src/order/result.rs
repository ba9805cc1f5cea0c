// core/src/order/result.rs

use serde::{Deserialize, Serialize};

/// Outcome of an order action as reported to the admin console:
/// `{"success":true,"id":"..."}` or `{"success":false,"error":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
  pub success: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl ActionResult {
  pub fn ok() -> Self {
    Self {
      success: true,
      id: None,
      error: None,
    }
  }

  pub fn created(id: impl Into<String>) -> Self {
    Self {
      success: true,
      id: Some(id.into()),
      error: None,
    }
  }

  pub fn failed(error: impl Into<String>) -> Self {
    Self {
      success: false,
      id: None,
      error: Some(error.into()),
    }
  }
}
